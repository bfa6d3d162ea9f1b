use serde::{Deserialize, Serialize};

use crate::config::{RankingConfig, Stops};
use crate::state::GameState;
use crate::vars::{OutputKind, Var};

pub const N_PIPS: u8 = 5;

const BASE_WORLD_OUTLOOK: f32 = 20.;
const BASE_REGIONAL_OUTLOOK: f32 = 10.;
const BASE_REGIONAL_HABITABILITY: f32 = 10.;

/// Qualitative band, always within `1..=N_PIPS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: Intensity = Intensity(1);
    pub const MAX: Intensity = Intensity(N_PIPS);

    /// Clamps into the valid band range.
    pub fn new(band: usize) -> Self {
        Self(band.clamp(1, N_PIPS as usize) as u8)
    }

    /// One more than the number of stops at or below `value`.
    pub fn from_stops(value: f32, stops: &Stops) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        let reached = stops.iter().filter(|stop| **stop <= value).count();
        Self::new(reached + 1)
    }

    pub fn band(self) -> u8 {
        self.0
    }

    pub fn color(self, invert: bool) -> &'static str {
        let level = if invert {
            N_PIPS + 1 - self.0
        } else {
            self.0
        };
        match level {
            0 | 1 => "#2FE863",
            2 => "#FBC011",
            3 => "#f28435",
            _ => "#EF3838",
        }
    }

    pub fn describe(self) -> &'static str {
        match self.0 {
            0 | 1 => "Very Low",
            2 => "Low",
            3 => "Moderate",
            4 => "High",
            _ => "Very High",
        }
    }
}

impl TryFrom<u8> for Intensity {
    type Error = String;

    fn try_from(band: u8) -> Result<Self, Self::Error> {
        if (1..=N_PIPS).contains(&band) {
            Ok(Self(band))
        } else {
            Err(format!("intensity band {band} outside 1..={N_PIPS}"))
        }
    }
}

impl From<Intensity> for u8 {
    fn from(intensity: Intensity) -> Self {
        intensity.0
    }
}

/// Classify a per-unit `value` of `var` for a producer of `kind`.
///
/// Output variables are classified against the per-capita demand of each
/// income level in the current snapshot.
pub fn intensity(
    value: f32,
    var: Var,
    kind: OutputKind,
    state: &GameState,
    config: &RankingConfig,
) -> Intensity {
    if let Some(pair) = config.intensity.stops(var) {
        return Intensity::from_stops(value, pair.get(kind));
    }
    match var.as_output() {
        Some(output) => Intensity::from_stops(value, &state.demand_by_income_levels(output)),
        None => Intensity::MIN,
    }
}

/// Pip scales used by region and world summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleKind {
    Outlook,
    Extinction,
    Habitability,
    WorldOutlook,
    Warming,
}

pub fn scale(value: f32, kind: ScaleKind) -> usize {
    let pips = match kind {
        ScaleKind::Outlook => (value / BASE_REGIONAL_OUTLOOK * 4.).round().max(1.),
        ScaleKind::Extinction => (value / 100. * 4.).round().max(0.),
        ScaleKind::Habitability => (value / BASE_REGIONAL_HABITABILITY * 4.).round().max(0.),
        ScaleKind::WorldOutlook => (value / (BASE_REGIONAL_OUTLOOK + BASE_WORLD_OUTLOOK) * 4.)
            .round()
            .max(1.),
        ScaleKind::Warming => value.floor() + 1.,
    };
    // Negative warming floors below zero; saturate instead of wrapping.
    pips.max(0.) as usize
}
