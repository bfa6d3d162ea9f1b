//! Content-authored effect records.
//!
//! Content JSON describes effects as loose `{type, subtype, param, entity}`
//! records. They are parsed into [`EffectKind`] so every consumer matches on a
//! closed set of variants; anything the display layer does not know about
//! lands in [`EffectKind::Other`] instead of failing the whole catalog.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kinds::{Output, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorldVariable {
    Year,
    Population,
    Emissions,
    ExtinctionRate,
    Outlook,
    Temperature,
    WaterStress,
    SeaLevelRise,
    SeaLevelRiseRate,
    Precipitation,
    PopulationGrowth,
}

impl WorldVariable {
    const ALL: [WorldVariable; 11] = [
        WorldVariable::Year,
        WorldVariable::Population,
        WorldVariable::Emissions,
        WorldVariable::ExtinctionRate,
        WorldVariable::Outlook,
        WorldVariable::Temperature,
        WorldVariable::WaterStress,
        WorldVariable::SeaLevelRise,
        WorldVariable::SeaLevelRiseRate,
        WorldVariable::Precipitation,
        WorldVariable::PopulationGrowth,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            WorldVariable::Year => "Year",
            WorldVariable::Population => "Population",
            WorldVariable::Emissions => "Emissions",
            WorldVariable::ExtinctionRate => "ExtinctionRate",
            WorldVariable::Outlook => "Outlook",
            WorldVariable::Temperature => "Temperature",
            WorldVariable::WaterStress => "WaterStress",
            WorldVariable::SeaLevelRise => "SeaLevelRise",
            WorldVariable::SeaLevelRiseRate => "SeaLevelRiseRate",
            WorldVariable::Precipitation => "Precipitation",
            WorldVariable::PopulationGrowth => "PopulationGrowth",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|var| var.tag() == tag)
    }
}

/// The `(type, subtype)` pair of an effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EffectKind {
    WorldVariable(WorldVariable),
    Resource(Resource),
    Demand(Output),
    DemandAmount(Output),
    Output(Output),
    ProtectLand,
    IncomeOutlookChange,
    DemandOutlookChange(Output),
    /// A kind the display layer has no evaluation for. Contributes nothing.
    Other {
        kind: String,
        subtype: Option<String>,
    },
}

impl EffectKind {
    pub fn parse(kind: &str, subtype: Option<&str>) -> Self {
        let parsed = match (kind, subtype) {
            ("WorldVariable", Some(sub)) => {
                WorldVariable::from_tag(sub).map(EffectKind::WorldVariable)
            }
            ("Resource", Some(sub)) => Resource::from_tag(sub).map(EffectKind::Resource),
            ("Demand", Some(sub)) => Output::from_tag(sub).map(EffectKind::Demand),
            ("DemandAmount", Some(sub)) => Output::from_tag(sub).map(EffectKind::DemandAmount),
            ("Output", Some(sub)) => Output::from_tag(sub).map(EffectKind::Output),
            ("DemandOutlookChange", Some(sub)) => {
                Output::from_tag(sub).map(EffectKind::DemandOutlookChange)
            }
            ("ProtectLand", _) => Some(EffectKind::ProtectLand),
            ("IncomeOutlookChange", _) => Some(EffectKind::IncomeOutlookChange),
            _ => None,
        };
        parsed.unwrap_or_else(|| EffectKind::Other {
            kind: kind.to_string(),
            subtype: subtype.map(str::to_string),
        })
    }

    pub fn type_tag(&self) -> &str {
        match self {
            EffectKind::WorldVariable(_) => "WorldVariable",
            EffectKind::Resource(_) => "Resource",
            EffectKind::Demand(_) => "Demand",
            EffectKind::DemandAmount(_) => "DemandAmount",
            EffectKind::Output(_) => "Output",
            EffectKind::ProtectLand => "ProtectLand",
            EffectKind::IncomeOutlookChange => "IncomeOutlookChange",
            EffectKind::DemandOutlookChange(_) => "DemandOutlookChange",
            EffectKind::Other { kind, .. } => kind,
        }
    }

    pub fn subtype_tag(&self) -> Option<&str> {
        match self {
            EffectKind::WorldVariable(var) => Some(var.tag()),
            EffectKind::Resource(resource) => Some(resource.tag()),
            EffectKind::Demand(output)
            | EffectKind::DemandAmount(output)
            | EffectKind::Output(output)
            | EffectKind::DemandOutlookChange(output) => Some(output.tag()),
            EffectKind::ProtectLand | EffectKind::IncomeOutlookChange => None,
            EffectKind::Other { subtype, .. } => subtype.as_deref(),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subtype_tag() {
            Some(sub) => write!(f, "{}:{}", self.type_tag(), sub),
            None => f.write_str(self.type_tag()),
        }
    }
}

/// Raw content record, as authored.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EffectRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtype: Option<String>,
    #[serde(default)]
    param: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entity: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EffectRecord", into = "EffectRecord")]
pub struct Effect {
    pub kind: EffectKind,
    pub param: f32,
    pub entity: Option<u64>,
}

impl Effect {
    pub fn new(kind: EffectKind, param: f32) -> Self {
        Self {
            kind,
            param,
            entity: None,
        }
    }

    /// Identity of the exact record, used to tell agreeing outcomes apart
    /// from ones that only share a `(type, subtype)` key.
    pub(crate) fn fingerprint(&self) -> (EffectKind, u32, Option<u64>) {
        (self.kind.clone(), self.param.to_bits(), self.entity)
    }
}

impl From<EffectRecord> for Effect {
    fn from(record: EffectRecord) -> Self {
        // Non-numeric params (flags, names) carry no magnitude for ranking.
        let param = record.param.as_f64().map(|value| value as f32).unwrap_or(0.);
        Self {
            kind: EffectKind::parse(&record.kind, record.subtype.as_deref()),
            param,
            entity: record.entity,
        }
    }
}

impl From<Effect> for EffectRecord {
    fn from(effect: Effect) -> Self {
        let param = serde_json::Number::from_f64(f64::from(effect.param))
            .map(Value::Number)
            .unwrap_or(Value::Null);
        Self {
            kind: effect.kind.type_tag().to_string(),
            subtype: effect.kind.subtype_tag().map(str::to_string),
            param,
            entity: effect.entity,
        }
    }
}

/// Magnitude of a resolved effect; `Uncertain` when outcomes disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Param {
    Known(f32),
    Uncertain,
}

impl Param {
    pub fn known(self) -> Option<f32> {
        match self {
            Param::Known(value) => Some(value),
            Param::Uncertain => None,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Known(value) => write!(f, "{value}"),
            Param::Uncertain => f.write_str("?"),
        }
    }
}

/// An effect as it currently applies to a project, event or process.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEffect {
    pub kind: EffectKind,
    pub param: Param,
    pub entity: Option<u64>,
    pub probability: Option<f32>,
    /// Whether the effect depends on which outcome gets rolled.
    pub random: bool,
}

impl From<&Effect> for ResolvedEffect {
    fn from(effect: &Effect) -> Self {
        Self {
            kind: effect.kind.clone(),
            param: Param::Known(effect.param),
            entity: effect.entity,
            probability: None,
            random: false,
        }
    }
}
