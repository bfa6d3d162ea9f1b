//! Read-only game-state snapshot produced by the simulation engine.
//!
//! Field names follow the engine's `state()` output. Every field defaults so
//! that partial snapshots (tests, older saves) still deserialize.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::kinds::{ByproductMap, Income, Output, OutputMap, ResourceMap};

pub const BUILTIN_SAMPLE_STATE: &str = include_str!("data/sample_state.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    Inactive,
    Building,
    Active,
    Halted,
    Stalled,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectState {
    pub id: u64,
    pub name: String,
    pub status: ProjectStatus,
    /// Upgrade tier; 0 is the base project.
    pub level: usize,
    pub active_outcome: Option<usize>,
    pub points: u32,
}

impl ProjectState {
    pub fn is_active_or_finished(&self) -> bool {
        matches!(
            self.status,
            ProjectStatus::Active | ProjectStatus::Finished
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Process {
    pub id: u64,
    pub name: String,
    pub output: Option<Output>,
    pub mix_share: u32,
    /// Per-unit resource draw.
    pub resources: ResourceMap,
    /// Per-unit byproducts.
    pub byproducts: ByproductMap,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Industry {
    pub id: u64,
    pub name: String,
    pub resources: ResourceMap,
    pub byproducts: ByproductMap,
    /// Units demanded this year, filled in from the engine's industry demand.
    pub demand: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    pub id: u64,
    pub name: String,
    pub income: Income,
    /// Income level plus development progress, 0.0..=4.0.
    pub income_level: f32,
    pub population: f32,
    pub outlook: f32,
    pub habitability: f32,
    /// Absolute output demand of this region.
    pub demand: OutputMap,
    /// Per-capita demand level (1..=5) for each output.
    pub demand_levels: OutputMap,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct World {
    pub year: u32,
    pub temperature: f32,
    pub sea_level_rise: f32,
    pub extinction_rate: f32,
    pub outlook: f32,
    pub temp_outlook: f32,
    pub shortages_outlook: f32,
    /// Annual emissions in Gt CO2eq.
    pub emissions: f32,
    pub starting_resources: ResourceMap,
    pub regions: Vec<Region>,
}

impl World {
    /// Extinction contribution from warming.
    pub fn tgav_extinction_rate(&self) -> f32 {
        self.temperature.powi(2)
    }

    /// Extinction contribution from sea level rise.
    pub fn slr_extinction_rate(&self) -> f32 {
        self.sea_level_rise.powi(2)
    }

    pub fn mean_income_level(&self) -> f32 {
        if self.regions.is_empty() {
            return 0.;
        }
        self.regions.iter().map(|r| r.income_level).sum::<f32>() / self.regions.len() as f32
    }

    pub fn mean_demand_level(&self, output: Output) -> f32 {
        if self.regions.is_empty() {
            return 0.;
        }
        self.regions
            .iter()
            .map(|r| r.demand_levels[output])
            .sum::<f32>()
            / self.regions.len() as f32
    }
}

/// An event that occurred (or is queued) this planning cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    pub event_id: u64,
    #[serde(default)]
    pub region_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub world: World,
    pub projects: Vec<ProjectState>,
    pub processes: Vec<Process>,
    pub produced_by_process: Vec<f32>,
    pub industries: Vec<Industry>,
    /// Events that occurred this planning cycle.
    pub events: Vec<EventRef>,
    pub output_demand: OutputMap,
    pub output_demand_modifier: OutputMap,
    pub resources_demand: ResourceMap,
    pub resources: ResourceMap,
    /// Per-capita output demand for each of the four income levels.
    pub demand_levels: [OutputMap; 4],
    /// Aggregate world outlook shown on the contentedness card.
    pub contentedness: f32,
}

impl GameState {
    pub fn builtin_sample() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_SAMPLE_STATE)
                .expect("builtin sample state should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn produced_by(&self, process_index: usize) -> f32 {
        self.produced_by_process
            .get(process_index)
            .copied()
            .unwrap_or(0.)
    }

    /// Per-capita demand for `output` by income level, lowest first.
    pub fn demand_by_income_levels(&self, output: Output) -> [f32; 4] {
        self.demand_levels.map(|levels| levels[output])
    }

    pub fn output_modifier(&self, output: Output) -> f32 {
        let modifier = self.output_demand_modifier[output];
        if modifier == 0. {
            1.
        } else {
            modifier
        }
    }
}
