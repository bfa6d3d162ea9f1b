use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Production outputs tracked by the simulation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Output {
    Fuel,
    Electricity,
    PlantCalories,
    AnimalCalories,
}

impl Output {
    pub const ALL: [Output; 4] = [
        Output::Fuel,
        Output::Electricity,
        Output::PlantCalories,
        Output::AnimalCalories,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Fuel" => Some(Output::Fuel),
            "Electricity" => Some(Output::Electricity),
            "PlantCalories" => Some(Output::PlantCalories),
            "AnimalCalories" => Some(Output::AnimalCalories),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Output::Fuel => "Fuel",
            Output::Electricity => "Electricity",
            Output::PlantCalories => "PlantCalories",
            Output::AnimalCalories => "AnimalCalories",
        }
    }
}

/// Resources drawn on by processes and industries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resource {
    Land,
    Water,
    Electricity,
    Fuel,
}

impl Resource {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Land" => Some(Resource::Land),
            "Water" => Some(Resource::Water),
            "Electricity" => Some(Resource::Electricity),
            "Fuel" => Some(Resource::Fuel),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Resource::Land => "Land",
            Resource::Water => "Water",
            Resource::Electricity => "Electricity",
            Resource::Fuel => "Fuel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputMap {
    pub fuel: f32,
    pub electricity: f32,
    pub plant_calories: f32,
    pub animal_calories: f32,
}

impl OutputMap {
    pub fn energy(&self) -> f32 {
        self.electricity + self.fuel
    }
}

impl Index<Output> for OutputMap {
    type Output = f32;

    fn index(&self, output: Output) -> &f32 {
        match output {
            Output::Fuel => &self.fuel,
            Output::Electricity => &self.electricity,
            Output::PlantCalories => &self.plant_calories,
            Output::AnimalCalories => &self.animal_calories,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceMap {
    pub land: f32,
    pub water: f32,
    pub electricity: f32,
    pub fuel: f32,
}

impl ResourceMap {
    pub fn energy(&self) -> f32 {
        self.electricity + self.fuel
    }
}

impl Index<Resource> for ResourceMap {
    type Output = f32;

    fn index(&self, resource: Resource) -> &f32 {
        match resource {
            Resource::Land => &self.land,
            Resource::Water => &self.water,
            Resource::Electricity => &self.electricity,
            Resource::Fuel => &self.fuel,
        }
    }
}

/// Byproducts emitted per unit of production.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ByproductMap {
    pub co2: f32,
    pub ch4: f32,
    pub n2o: f32,
    pub biodiversity: f32,
}

impl ByproductMap {
    /// CO2-equivalent grams using 100-year warming potentials.
    pub fn co2eq(&self) -> f32 {
        self.co2 + self.ch4 * 36. + self.n2o * 298.
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Income {
    #[default]
    Low,
    LowerMiddle,
    UpperMiddle,
    High,
}

impl Income {
    pub fn level(self) -> usize {
        match self {
            Income::Low => 0,
            Income::LowerMiddle => 1,
            Income::UpperMiddle => 2,
            Income::High => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn co2eq_weights_methane_and_nitrous_oxide() {
        let byproducts = ByproductMap {
            co2: 10.,
            ch4: 1.,
            n2o: 1.,
            biodiversity: 0.,
        };
        assert_eq!(byproducts.co2eq(), 10. + 36. + 298.);
    }

    #[test]
    fn output_tags_round_trip() {
        for output in Output::ALL {
            assert_eq!(Output::from_tag(output.tag()), Some(output));
        }
        assert_eq!(Output::from_tag("Steel"), None);
    }
}
