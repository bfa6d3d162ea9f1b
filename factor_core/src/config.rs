//! Tunable constants for factor ranking.
//!
//! Loaded from `ranking_config.json`; `RANKING_CONFIG_PATH` overrides the
//! location.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vars::{OutputKind, Var};

pub const BUILTIN_RANKING_CONFIG: &str = include_str!("data/ranking_config.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Flat contentedness bonus shown as "Post-Revolution Optimism".
    pub optimism_bonus: f32,
    /// Share of starting land set aside as nature preserves.
    pub nature_preserve_fraction: f32,
    pub process_pressure_divisor: f32,
    pub industry_pressure_divisor: f32,
    pub intensity: IntensityTable,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            optimism_bonus: 30.,
            nature_preserve_fraction: 0.1,
            process_pressure_divisor: 3e16,
            industry_pressure_divisor: 1e4,
            intensity: IntensityTable::default(),
        }
    }
}

impl RankingConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_RANKING_CONFIG)
                .expect("builtin ranking config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, RankingConfigError> {
        let config: RankingConfig = serde_json::from_str(json)?;
        config.intensity.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, RankingConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| RankingConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }
}

/// Four ascending thresholds separating the five intensity bands.
pub type Stops = [f32; 4];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopPair {
    pub energy: Stops,
    pub calories: Stops,
}

impl StopPair {
    pub fn get(&self, kind: OutputKind) -> &Stops {
        match kind {
            OutputKind::Energy => &self.energy,
            OutputKind::Calories => &self.calories,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntensityTable {
    pub land: StopPair,
    pub energy: StopPair,
    pub water: StopPair,
    pub emissions: StopPair,
    pub biodiversity: StopPair,
}

impl Default for IntensityTable {
    fn default() -> Self {
        Self {
            land: StopPair {
                energy: [0., 0.001, 0.01, 0.1],
                calories: [0., 0.001, 0.002, 0.01],
            },
            energy: StopPair {
                energy: [0., 0.001, 0.01, 0.1],
                calories: [0., 0.00015, 0.0005, 0.001],
            },
            water: StopPair {
                energy: [0., 1., 2., 5.],
                calories: [0., 1., 2., 3.],
            },
            emissions: StopPair {
                energy: [-2000., 0., 200., 800.],
                calories: [-1., 0., 0.5, 1.],
            },
            biodiversity: StopPair {
                energy: [0., 1e-15, 1e-14, 1.5e-14],
                calories: [0., 1e-16, 1e-15, 1e-14],
            },
        }
    }
}

impl IntensityTable {
    /// Static stops for `var`; `None` for variables whose stops come from the
    /// snapshot's demand levels.
    pub fn stops(&self, var: Var) -> Option<&StopPair> {
        match var {
            Var::Land => Some(&self.land),
            Var::Energy => Some(&self.energy),
            Var::Water => Some(&self.water),
            Var::Emissions => Some(&self.emissions),
            Var::Biodiversity => Some(&self.biodiversity),
            Var::Contentedness
            | Var::Electricity
            | Var::Fuel
            | Var::PlantCalories
            | Var::AnimalCalories => None,
        }
    }

    fn validate(&self) -> Result<(), RankingConfigError> {
        let named = [
            (Var::Land, &self.land),
            (Var::Energy, &self.energy),
            (Var::Water, &self.water),
            (Var::Emissions, &self.emissions),
            (Var::Biodiversity, &self.biodiversity),
        ];
        for (var, pair) in named {
            for stops in [&pair.energy, &pair.calories] {
                if stops.windows(2).any(|w| w[0] > w[1]) {
                    return Err(RankingConfigError::UnorderedStops { var });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RankingConfigError {
    #[error("failed to parse ranking config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read ranking config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("intensity stops for {var} are not ascending")]
    UnorderedStops { var: Var },
}

/// Load the ranking config from `RANKING_CONFIG_PATH`, falling back to the
/// builtin copy. Returns the path that was used, if any.
pub fn load_ranking_config_from_env() -> (Arc<RankingConfig>, Option<PathBuf>) {
    if let Some(path) = env::var("RANKING_CONFIG_PATH").ok().map(PathBuf::from) {
        match RankingConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "factors::config",
                    path = %path.display(),
                    "ranking_config.loaded=file"
                );
                return (Arc::new(config), Some(path));
            }
            Err(err) => {
                tracing::warn!(
                    target: "factors::config",
                    path = %path.display(),
                    error = %err,
                    "ranking_config.load_failed"
                );
            }
        }
    }

    tracing::info!(target: "factors::config", "ranking_config.loaded=builtin");
    (RankingConfig::builtin(), None)
}
