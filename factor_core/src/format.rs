//! Display strings for factor amounts.

use crate::kinds::{Output, ResourceMap};
use crate::vars::Var;

pub fn percent(p: f32, round: bool) -> String {
    let percent = p * 100.;
    if percent > 0. && percent < 1. {
        "<1%".to_string()
    } else if round {
        format!("{:.0}%", percent.round())
    } else {
        format!("{percent:.1}%")
    }
}

/// Percent with an explicit sign, used for demand modifiers.
pub fn signed_percent(p: f32, round: bool) -> String {
    let sign = if p < 0. { '-' } else { '+' };
    format!("{sign}{}", percent(p.abs(), round))
}

pub fn demand_percent(demand: f32, total_demand: f32, round: bool) -> String {
    let total = if total_demand == 0. { 1. } else { total_demand };
    percent(demand / total, round)
}

/// Outputs in display units: thousands of TWh for energy, 20k Tcal for food.
pub fn output(amount: f32, output: Output) -> f32 {
    let scale = match output {
        Output::Fuel | Output::Electricity => 1e-9 / 1e3,
        Output::PlantCalories | Output::AnimalCalories => 1e-9 / 2e4,
    };
    (amount * scale).round()
}

pub fn twh(amount: f32) -> f32 {
    (amount * 1e-9).round()
}

pub fn land_use_percent(m2: f32, starting: &ResourceMap) -> f32 {
    share_of(m2, starting.land) * 100.
}

pub fn water_use_percent(l: f32, starting: &ResourceMap) -> f32 {
    share_of(l, starting.water) * 100.
}

fn share_of(amount: f32, total: f32) -> f32 {
    if total == 0. {
        0.
    } else {
        amount / total
    }
}

/// Unit-formatted impact of a producer on `var`.
pub fn format_impact(var: Var, value: f32, starting: &ResourceMap) -> String {
    match var {
        Var::Land => percent(land_use_percent(value, starting) / 100., true),
        Var::Water => percent(water_use_percent(value, starting) / 100., true),
        Var::Emissions => format!("{:.1}Gt", value * 1e-15),
        Var::Biodiversity => format!("{value:.0}"),
        Var::Energy | Var::Electricity | Var::Fuel => format!("{:.1}TWh", value * 1e-9),
        Var::Contentedness | Var::PlantCalories | Var::AnimalCalories => format!("{value:.0}"),
    }
}
