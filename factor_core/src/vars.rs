use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::kinds::{Output, Resource};

/// A tracked world variable that factors are ranked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Var {
    Land,
    Water,
    Energy,
    Emissions,
    Biodiversity,
    Contentedness,
    Electricity,
    Fuel,
    PlantCalories,
    AnimalCalories,
}

impl Var {
    pub const ALL: [Var; 10] = [
        Var::Land,
        Var::Water,
        Var::Energy,
        Var::Emissions,
        Var::Biodiversity,
        Var::Contentedness,
        Var::Electricity,
        Var::Fuel,
        Var::PlantCalories,
        Var::AnimalCalories,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Var::Land => "land",
            Var::Water => "water",
            Var::Energy => "energy",
            Var::Emissions => "emissions",
            Var::Biodiversity => "biodiversity",
            Var::Contentedness => "contentedness",
            Var::Electricity => "electricity",
            Var::Fuel => "fuel",
            Var::PlantCalories => "plant_calories",
            Var::AnimalCalories => "animal_calories",
        }
    }

    /// Demand-tracked outputs, broken down by region instead of by event.
    pub fn as_output(self) -> Option<Output> {
        match self {
            Var::Electricity => Some(Output::Electricity),
            Var::Fuel => Some(Output::Fuel),
            Var::PlantCalories => Some(Output::PlantCalories),
            Var::AnimalCalories => Some(Output::AnimalCalories),
            _ => None,
        }
    }

    pub fn as_resource(self) -> Option<Resource> {
        match self {
            Var::Land => Some(Resource::Land),
            Var::Water => Some(Resource::Water),
            Var::Electricity => Some(Resource::Electricity),
            Var::Fuel => Some(Resource::Fuel),
            _ => None,
        }
    }

    /// Variables whose project contributions are shown as a share of demand.
    pub fn is_demand_var(self) -> bool {
        matches!(self, Var::Energy) || self.as_output().is_some()
    }

    /// Purely demand-side variables have no per-process production footprint.
    pub fn has_production_factors(self) -> bool {
        !matches!(
            self,
            Var::Contentedness | Var::PlantCalories | Var::AnimalCalories
        )
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Var {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Var::ALL
            .into_iter()
            .find(|var| var.key() == s)
            .ok_or_else(|| format!("unknown variable `{s}`"))
    }
}

/// Which intensity table a producer is classified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Energy,
    Calories,
}

impl From<Output> for OutputKind {
    fn from(output: Output) -> Self {
        match output {
            Output::Fuel | Output::Electricity => OutputKind::Energy,
            Output::PlantCalories | Output::AnimalCalories => OutputKind::Calories,
        }
    }
}
