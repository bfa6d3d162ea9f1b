//! Factor ranking: which projects, events, regions and producers push each
//! tracked variable, and by how much.
//!
//! Everything here is a pure function of the snapshot, the content catalog
//! and the ranking config. Malformed or unknown content contributes nothing
//! instead of failing the whole ranking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::RankingConfig;
use crate::content::ContentCatalog;
use crate::effects::{EffectKind, ResolvedEffect, WorldVariable};
use crate::format;
use crate::intensity::{intensity, Intensity};
use crate::kinds::{ByproductMap, Output, Resource, ResourceMap};
use crate::projects::active_effects;
use crate::state::{GameState, World};
use crate::vars::{OutputKind, Var};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Factor {
    Project {
        name: String,
        amount: f32,
        display: Option<String>,
        /// Shown as a signed share of demand rather than a contribution.
        modifies_demand: bool,
    },
    Event {
        name: String,
        amount: f32,
        display: Option<String>,
    },
    Region {
        name: String,
        amount: f32,
        display: String,
        intensity: Intensity,
    },
    Process {
        name: String,
        amount: f32,
        display: String,
        intensity: Intensity,
        output: Option<Output>,
        produced: f32,
        display_produced: String,
    },
    Industry {
        name: String,
        amount: f32,
        display: String,
        intensity: Intensity,
        produced: f32,
    },
}

impl Factor {
    pub fn name(&self) -> &str {
        match self {
            Factor::Project { name, .. }
            | Factor::Event { name, .. }
            | Factor::Region { name, .. }
            | Factor::Process { name, .. }
            | Factor::Industry { name, .. } => name,
        }
    }

    pub fn amount(&self) -> f32 {
        match self {
            Factor::Project { amount, .. }
            | Factor::Event { amount, .. }
            | Factor::Region { amount, .. }
            | Factor::Process { amount, .. }
            | Factor::Industry { amount, .. } => *amount,
        }
    }

    /// Display text, if the factor has one beyond its plain amount.
    pub fn display(&self) -> Option<&str> {
        match self {
            Factor::Project { display, .. } | Factor::Event { display, .. } => display.as_deref(),
            Factor::Region { display, .. }
            | Factor::Process { display, .. }
            | Factor::Industry { display, .. } => Some(display),
        }
    }

    pub fn intensity(&self) -> Option<Intensity> {
        match self {
            Factor::Region { intensity, .. }
            | Factor::Process { intensity, .. }
            | Factor::Industry { intensity, .. } => Some(*intensity),
            Factor::Project { .. } | Factor::Event { .. } => None,
        }
    }

    /// Modifiers scale demand instead of making up a share of it, so they are
    /// listed ahead of contributors and never re-sorted.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Factor::Project {
                modifies_demand: true,
                ..
            }
        )
    }
}

/// Ranked factors for every tracked variable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rankings(pub BTreeMap<Var, Vec<Factor>>);

impl Rankings {
    pub fn get(&self, var: Var) -> &[Factor] {
        self.0.get(&var).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Var, &[Factor])> {
        self.0.iter().map(|(var, factors)| (*var, factors.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How much a set of effects moves `var`.
pub fn effects_factor(var: Var, effects: &[ResolvedEffect], world: &World) -> f32 {
    effects
        .iter()
        .map(|effect| match effect.param.known() {
            Some(value) => effect_contribution(var, &effect.kind, value, world),
            None => 0.,
        })
        .sum()
}

fn effect_contribution(var: Var, kind: &EffectKind, value: f32, world: &World) -> f32 {
    let applies = match kind {
        EffectKind::WorldVariable(variable) => matches!(
            (var, variable),
            (Var::Emissions, WorldVariable::Emissions)
                | (Var::Contentedness, WorldVariable::Outlook)
                | (Var::Biodiversity, WorldVariable::ExtinctionRate)
        ),
        EffectKind::Resource(resource) => var == Var::Water && *resource == Resource::Water,
        EffectKind::ProtectLand => var == Var::Land,
        EffectKind::DemandAmount(output) => {
            var.as_output() == Some(*output)
                || (var == Var::Energy
                    && matches!(output, Output::Electricity | Output::Fuel))
        }
        EffectKind::IncomeOutlookChange => {
            return if var == Var::Contentedness {
                (world.mean_income_level() * value).round()
            } else {
                0.
            };
        }
        EffectKind::DemandOutlookChange(output) => {
            return if var == Var::Contentedness {
                (world.mean_demand_level(*output) * value).round()
            } else {
                0.
            };
        }
        EffectKind::Demand(_) | EffectKind::Output(_) | EffectKind::Other { .. } => false,
    };
    if applies {
        value
    } else {
        0.
    }
}

fn demand_for(var: Var, state: &GameState) -> Option<f32> {
    if !var.is_demand_var() {
        return None;
    }
    Some(match var.as_output() {
        Some(output) => state.output_demand[output],
        None => state.output_demand.energy(),
    })
}

/// Factors for projects that are active or finished.
pub fn project_factors(var: Var, state: &GameState, catalog: &ContentCatalog) -> Vec<Factor> {
    state
        .projects
        .iter()
        .filter(|project| project.is_active_or_finished())
        .filter_map(|project| {
            let Some(def) = catalog.project(project.id) else {
                tracing::debug!(
                    target: "factors::rank",
                    project = project.id,
                    "project.unknown"
                );
                return None;
            };
            let effects = active_effects(project, def);
            let amount = effects_factor(var, &effects, &state.world);
            let (display, modifies_demand) = match demand_for(var, state) {
                Some(demand) => {
                    let demand = if demand == 0. { 1. } else { demand };
                    (Some(format::signed_percent(amount / demand, true)), true)
                }
                None => (None, false),
            };
            Some(Factor::Project {
                name: def.name.clone(),
                amount,
                display,
                modifies_demand,
            })
        })
        .collect()
}

/// Factors for events that occurred this cycle.
pub fn event_factors(var: Var, state: &GameState, catalog: &ContentCatalog) -> Vec<Factor> {
    state
        .events
        .iter()
        .filter_map(|event_ref| {
            let Some(event) = catalog.event(event_ref.event_id) else {
                tracing::debug!(
                    target: "factors::rank",
                    event = event_ref.event_id,
                    "event.unknown"
                );
                return None;
            };
            let effects: Vec<ResolvedEffect> =
                event.effects.iter().map(ResolvedEffect::from).collect();
            Some(Factor::Event {
                name: event.name.clone(),
                amount: effects_factor(var, &effects, &state.world),
                display: None,
            })
        })
        .collect()
}

/// Each region's demand for `output`, in display units.
pub fn regional_factors(output: Output, state: &GameState) -> Vec<Factor> {
    let total = state.output_demand[output];
    state
        .world
        .regions
        .iter()
        .map(|region| {
            let demand = region.demand[output];
            Factor::Region {
                name: region.name.clone(),
                amount: format::output(demand, output),
                display: format::demand_percent(demand, total, true),
                intensity: Intensity::new(region.income.level() + 1),
            }
        })
        .collect()
}

struct Footprint<'a> {
    resources: &'a ResourceMap,
    byproducts: &'a ByproductMap,
    pressure_divisor: f32,
}

impl Footprint<'_> {
    /// Per-unit impact on `var`.
    fn base(&self, var: Var, starting: &ResourceMap) -> f32 {
        if let Some(resource) = var.as_resource() {
            return self.resources[resource];
        }
        match var {
            Var::Land | Var::Water | Var::Electricity | Var::Fuel => 0.,
            Var::Energy => self.resources.energy(),
            Var::Emissions => self.byproducts.co2eq(),
            Var::Biodiversity => {
                let land_share = if starting.land == 0. {
                    0.
                } else {
                    self.resources.land / starting.land
                };
                (self.byproducts.biodiversity / self.pressure_divisor + land_share) * 100.
            }
            Var::Contentedness | Var::PlantCalories | Var::AnimalCalories => 0.,
        }
    }
}

struct Impact {
    base: f32,
    total: f32,
    display: String,
}

fn impact(footprint: &Footprint<'_>, var: Var, demand: f32, state: &GameState) -> Impact {
    let base = footprint.base(var, &state.world.starting_resources);
    let modifier = var
        .as_output()
        .map(|output| state.output_modifier(output))
        .unwrap_or(1.);
    let total = base * demand * modifier;
    let display = match demand_for(var, state) {
        Some(total_demand) => format::demand_percent(total, total_demand, true),
        None => format::format_impact(var, total, &state.world.starting_resources),
    };
    Impact {
        base,
        total,
        display,
    }
}

/// Per-process and per-industry contributions to `var`.
pub fn production_factors(var: Var, state: &GameState, config: &RankingConfig) -> Vec<Factor> {
    let processes = state.processes.iter().enumerate().map(|(idx, process)| {
        let produced = state.produced_by(idx);
        let footprint = Footprint {
            resources: &process.resources,
            byproducts: &process.byproducts,
            pressure_divisor: config.process_pressure_divisor,
        };
        let Impact {
            base,
            total,
            display,
        } = impact(&footprint, var, produced, state);
        let kind = process
            .output
            .map(OutputKind::from)
            .unwrap_or(OutputKind::Energy);
        let display_produced = process
            .output
            .map(|output| format::demand_percent(produced, state.output_demand[output], true))
            .unwrap_or_default();
        Factor::Process {
            name: process.name.clone(),
            amount: total,
            display,
            intensity: intensity(base, var, kind, state, config),
            output: process.output,
            produced,
            display_produced,
        }
    });

    let industries = state.industries.iter().map(|industry| {
        let footprint = Footprint {
            resources: &industry.resources,
            byproducts: &industry.byproducts,
            pressure_divisor: config.industry_pressure_divisor,
        };
        let Impact {
            base,
            total,
            display,
        } = impact(&footprint, var, industry.demand, state);
        Factor::Industry {
            name: industry.name.clone(),
            amount: total,
            display,
            intensity: intensity(base, var, OutputKind::Energy, state, config),
            produced: industry.demand,
        }
    });

    processes.chain(industries).collect()
}

/// World-level factors that are not tied to any project or event.
pub fn structural_factors(var: Var, state: &GameState, config: &RankingConfig) -> Vec<Factor> {
    let event = |name: &str, amount: f32, display: Option<String>| Factor::Event {
        name: name.to_string(),
        amount,
        display,
    };
    let world = &state.world;
    match var {
        Var::Contentedness => vec![
            event("Temperature Change", world.temp_outlook.round(), None),
            event("Production Shortages", world.shortages_outlook.round(), None),
            event("Post-Revolution Optimism", config.optimism_bonus, None),
        ],
        Var::Land => vec![event(
            "Nature Preserves",
            config.nature_preserve_fraction * world.starting_resources.land,
            Some(format::percent(config.nature_preserve_fraction, true)),
        )],
        Var::Biodiversity => vec![
            event("Sea Level Rise", world.slr_extinction_rate().round(), None),
            event("Temperature Change", world.tgav_extinction_rate().round(), None),
        ],
        Var::Water
        | Var::Energy
        | Var::Emissions
        | Var::Electricity
        | Var::Fuel
        | Var::PlantCalories
        | Var::AnimalCalories => Vec::new(),
    }
}

/// Drop empty factors, then list modifiers in input order followed by
/// contributors by descending magnitude.
pub fn order_factors(factors: Vec<Factor>) -> Vec<Factor> {
    let (modifiers, mut contributors): (Vec<_>, Vec<_>) = factors
        .into_iter()
        .filter(|factor| factor.amount() != 0. && factor.amount().is_finite())
        .partition(Factor::is_modifier);
    contributors.sort_by(|a, b| b.amount().abs().total_cmp(&a.amount().abs()));
    modifiers.into_iter().chain(contributors).collect()
}

/// Factors contributing to `var`, ranked.
pub fn rank_var(
    var: Var,
    state: &GameState,
    catalog: &ContentCatalog,
    config: &RankingConfig,
) -> Vec<Factor> {
    let mut factors = Vec::new();
    if var.has_production_factors() {
        factors.extend(production_factors(var, state, config));
    }
    match var.as_output() {
        Some(output) => factors.extend(regional_factors(output, state)),
        None => factors.extend(event_factors(var, state, catalog)),
    }
    factors.extend(project_factors(var, state, catalog));
    factors.extend(structural_factors(var, state, config));
    order_factors(factors)
}

/// Rank factors for every tracked variable.
pub fn rank(state: &GameState, catalog: &ContentCatalog, config: &RankingConfig) -> Rankings {
    let rankings = Rankings(
        Var::ALL
            .into_iter()
            .map(|var| (var, rank_var(var, state, catalog, config)))
            .collect(),
    );
    tracing::debug!(
        target: "factors::rank",
        year = state.world.year,
        factors = rankings.len(),
        "rank.computed"
    );
    rankings
}

/// Headline number for a variable's tooltip card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorsCard {
    pub var: Var,
    /// Name of the factor the card was opened from, if any.
    pub current: Option<String>,
    pub total: f32,
    pub display_total: String,
}

pub fn factors_card(var: Var, state: &GameState, current: Option<String>) -> FactorsCard {
    let starting = &state.world.starting_resources;
    let output_total = |output: Output| {
        let amount = format::output(state.output_demand[output], output);
        (amount, format!("{amount:.0}"))
    };
    let (total, display_total) = match var {
        Var::Emissions => {
            let gt = state.world.emissions;
            (gt, format!("{gt:.1}Gt"))
        }
        Var::Biodiversity => {
            let rate = state.world.extinction_rate.round().max(0.);
            (rate, format!("{rate:.0}"))
        }
        Var::Land => {
            let used = format::land_use_percent(state.resources_demand.land, starting);
            (used, format!("{:.0}%", used.round()))
        }
        Var::Water => {
            let used = if state.resources.water == 0. {
                0.
            } else {
                state.resources_demand.water / state.resources.water * 100.
            };
            (used, format!("{:.0}%", used.round()))
        }
        Var::Energy => {
            let twh = format::twh(state.output_demand.energy());
            (twh, format!("{twh:.0}TWh"))
        }
        Var::Contentedness => {
            let outlook = state.contentedness.round();
            (outlook, format!("{outlook:.0}"))
        }
        Var::Electricity => output_total(Output::Electricity),
        Var::Fuel => output_total(Output::Fuel),
        Var::PlantCalories => output_total(Output::PlantCalories),
        Var::AnimalCalories => output_total(Output::AnimalCalories),
    };
    FactorsCard {
        var,
        current,
        total,
        display_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Outcome, ProjectDef, ProjectKind};
    use crate::effects::Effect;
    use crate::kinds::{Income, OutputMap};
    use crate::state::{EventRef, Industry, Process, ProjectState, ProjectStatus, Region};

    fn event_factor(name: &str, amount: f32) -> Factor {
        Factor::Event {
            name: name.into(),
            amount,
            display: None,
        }
    }

    fn modifier(name: &str, amount: f32) -> Factor {
        Factor::Project {
            name: name.into(),
            amount,
            display: Some(format::signed_percent(amount, true)),
            modifies_demand: true,
        }
    }

    #[test]
    fn ordering_puts_modifiers_first_then_magnitude() {
        let ordered = order_factors(vec![
            event_factor("small", 1.),
            modifier("mod-b", -0.2),
            event_factor("zero", 0.),
            event_factor("big-negative", -9.),
            modifier("mod-a", 0.4),
            event_factor("nan", f32::NAN),
            event_factor("mid", 3.),
            event_factor("mid-tie", -3.),
        ]);
        let names: Vec<_> = ordered.iter().map(Factor::name).collect();
        assert_eq!(
            names,
            vec!["mod-b", "mod-a", "big-negative", "mid", "mid-tie", "small"]
        );
    }

    #[test]
    fn unknown_and_uncertain_effects_contribute_nothing() {
        let world = World::default();
        let effects = vec![
            ResolvedEffect::from(&Effect::new(
                EffectKind::Other {
                    kind: "Migration".into(),
                    subtype: None,
                },
                5.,
            )),
            ResolvedEffect {
                param: crate::effects::Param::Uncertain,
                ..ResolvedEffect::from(&Effect::new(
                    EffectKind::Resource(Resource::Water),
                    5.,
                ))
            },
        ];
        for var in Var::ALL {
            assert_eq!(effects_factor(var, &effects, &world), 0.);
        }
    }

    #[test]
    fn energy_sums_electricity_and_fuel_demand_amounts() {
        let world = World::default();
        let effects: Vec<_> = [
            Effect::new(EffectKind::DemandAmount(Output::Electricity), 2.),
            Effect::new(EffectKind::DemandAmount(Output::Fuel), 3.),
            Effect::new(EffectKind::DemandAmount(Output::PlantCalories), 7.),
        ]
        .iter()
        .map(ResolvedEffect::from)
        .collect();
        assert_eq!(effects_factor(Var::Energy, &effects, &world), 5.);
        assert_eq!(effects_factor(Var::Fuel, &effects, &world), 3.);
        assert_eq!(effects_factor(Var::PlantCalories, &effects, &world), 7.);
    }

    #[test]
    fn income_outlook_scales_with_mean_income_level() {
        let world = World {
            regions: vec![
                Region {
                    income_level: 1.,
                    ..Default::default()
                },
                Region {
                    income_level: 2.,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let effects = vec![ResolvedEffect::from(&Effect::new(
            EffectKind::IncomeOutlookChange,
            3.,
        ))];
        assert_eq!(effects_factor(Var::Contentedness, &effects, &world), 5.);
    }

    fn scenario() -> (GameState, ContentCatalog) {
        let catalog = ContentCatalog {
            projects: vec![ProjectDef {
                id: 1,
                name: "Wind Subsidies".into(),
                kind: ProjectKind::Policy,
                effects: vec![Effect::new(EffectKind::DemandAmount(Output::Fuel), -50.)],
                outcomes: vec![Outcome {
                    effects: vec![Effect::new(
                        EffectKind::WorldVariable(WorldVariable::Outlook),
                        2.,
                    )],
                    probability: 1.,
                }],
                upgrades: vec![],
            }],
            events: vec![],
        };
        let state = GameState {
            world: crate::state::World {
                starting_resources: ResourceMap {
                    land: 1000.,
                    water: 1000.,
                    ..Default::default()
                },
                regions: vec![Region {
                    name: "Andes".into(),
                    income: Income::UpperMiddle,
                    demand: OutputMap {
                        fuel: 1e12,
                        ..Default::default()
                    },
                    ..Default::default()
                }],
                ..Default::default()
            },
            projects: vec![ProjectState {
                id: 1,
                status: ProjectStatus::Active,
                active_outcome: Some(0),
                ..Default::default()
            }],
            processes: vec![Process {
                name: "Oil Wells".into(),
                output: Some(Output::Fuel),
                resources: ResourceMap {
                    land: 0.5,
                    water: 2.,
                    ..Default::default()
                },
                ..Default::default()
            }],
            produced_by_process: vec![100.],
            industries: vec![Industry {
                name: "Steel".into(),
                resources: ResourceMap {
                    water: 1.,
                    ..Default::default()
                },
                demand: 10.,
                ..Default::default()
            }],
            output_demand: OutputMap {
                fuel: 1000.,
                ..Default::default()
            },
            ..Default::default()
        };
        (state, catalog)
    }

    #[test]
    fn production_factors_scale_by_demand() {
        let (state, _) = scenario();
        let factors = production_factors(Var::Water, &state, &RankingConfig::default());
        assert_eq!(factors.len(), 2);
        assert_eq!(factors[0].amount(), 200.);
        assert_eq!(factors[0].display(), Some("20%"));
        assert_eq!(factors[1].amount(), 10.);
        assert_eq!(factors[0].intensity(), Some(Intensity::new(4)));
    }

    fn footprint_state() -> GameState {
        GameState {
            world: World {
                temperature: 3.,
                sea_level_rise: 2.,
                starting_resources: ResourceMap {
                    land: 1000.,
                    ..Default::default()
                },
                ..Default::default()
            },
            processes: vec![Process {
                name: "Coal".into(),
                output: Some(Output::Fuel),
                resources: ResourceMap {
                    land: 1.,
                    fuel: 5.,
                    ..Default::default()
                },
                byproducts: ByproductMap {
                    co2: 1.,
                    ch4: 1.,
                    n2o: 1.,
                    biodiversity: 3e16,
                },
                ..Default::default()
            }],
            produced_by_process: vec![2.],
            industries: vec![Industry {
                name: "Steel".into(),
                byproducts: ByproductMap {
                    biodiversity: 1e4,
                    ..Default::default()
                },
                demand: 1.,
                ..Default::default()
            }],
            output_demand: OutputMap {
                fuel: 100.,
                ..Default::default()
            },
            output_demand_modifier: OutputMap {
                fuel: 1.5,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn emissions_weight_byproducts_by_production() {
        let state = footprint_state();
        let factors = production_factors(Var::Emissions, &state, &RankingConfig::default());
        assert_eq!(factors[0].name(), "Coal");
        assert_eq!(factors[0].amount(), 670.);
        assert_eq!(factors[1].amount(), 0.);
    }

    #[test]
    fn biodiversity_pressure_uses_per_producer_divisor() {
        let state = footprint_state();
        let factors = production_factors(Var::Biodiversity, &state, &RankingConfig::default());
        // Coal: (3e16 / 3e16 + 1 / 1000) * 100 per unit, two units.
        assert!((factors[0].amount() - 200.2).abs() < 1e-3);
        // Steel: 1e4 / 1e4 * 100, one unit.
        assert_eq!(factors[1].name(), "Steel");
        assert_eq!(factors[1].amount(), 100.);
    }

    #[test]
    fn fuel_production_applies_demand_modifier() {
        let state = footprint_state();
        let factors = production_factors(Var::Fuel, &state, &RankingConfig::default());
        assert_eq!(factors[0].amount(), 15.);
        assert_eq!(factors[0].display(), Some("15%"));

        let land = production_factors(Var::Land, &state, &RankingConfig::default());
        assert_eq!(land[0].amount(), 2.);
    }

    #[test]
    fn biodiversity_ranking_includes_warming_and_sea_level() {
        let state = footprint_state();
        let factors = rank_var(
            Var::Biodiversity,
            &state,
            &ContentCatalog::default(),
            &RankingConfig::default(),
        );
        let amount_of = |name: &str| {
            factors
                .iter()
                .find(|factor| factor.name() == name)
                .map(Factor::amount)
        };
        assert_eq!(amount_of("Temperature Change"), Some(9.));
        assert_eq!(amount_of("Sea Level Rise"), Some(4.));
        assert_eq!(factors[0].name(), "Coal");
    }

    #[test]
    fn fuel_ranking_has_modifier_and_regions() {
        let (state, catalog) = scenario();
        let factors = rank_var(Var::Fuel, &state, &catalog, &RankingConfig::default());
        assert!(factors[0].is_modifier());
        assert_eq!(factors[0].display(), Some("-5%"));
        let region = factors
            .iter()
            .find(|factor| factor.name() == "Andes")
            .expect("region factor");
        assert_eq!(region.amount(), 1.);
        assert_eq!(region.intensity(), Some(Intensity::new(3)));
    }

    #[test]
    fn structural_factors_are_included() {
        let (state, catalog) = scenario();
        let config = RankingConfig::default();
        let rankings = rank(&state, &catalog, &config);

        let land = rankings.get(Var::Land);
        let preserves = land
            .iter()
            .find(|factor| factor.name() == "Nature Preserves")
            .expect("nature preserves");
        assert_eq!(preserves.amount(), 100.);
        assert_eq!(preserves.display(), Some("10%"));

        let contentedness = rankings.get(Var::Contentedness);
        assert!(contentedness
            .iter()
            .any(|factor| factor.name() == "Post-Revolution Optimism"
                && factor.amount() == 30.));
        // Active policy outcome adds outlook.
        assert!(contentedness
            .iter()
            .any(|factor| factor.name() == "Wind Subsidies" && factor.amount() == 2.));
    }

    #[test]
    fn no_zero_amounts_anywhere() {
        let (state, catalog) = scenario();
        let rankings = rank(&state, &catalog, &RankingConfig::default());
        for (_, factors) in rankings.iter() {
            assert!(factors.iter().all(|factor| factor.amount() != 0.));
        }
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let (mut state, catalog) = scenario();
        state.projects.push(ProjectState {
            id: 99,
            status: ProjectStatus::Finished,
            ..Default::default()
        });
        state.events.push(EventRef {
            event_id: 42,
            region_id: None,
        });
        let factors = rank_var(Var::Water, &state, &catalog, &RankingConfig::default());
        assert!(factors.iter().all(|factor| !matches!(factor, Factor::Event { .. })));
    }

    #[test]
    fn card_totals_use_display_units() {
        let (mut state, _) = scenario();
        state.resources_demand.land = 250.;
        state.world.emissions = 36.44;
        let land = factors_card(Var::Land, &state, None);
        assert_eq!(land.display_total, "25%");
        let emissions = factors_card(Var::Emissions, &state, Some("Oil Wells".into()));
        assert_eq!(emissions.display_total, "36.4Gt");
        assert_eq!(emissions.current.as_deref(), Some("Oil Wells"));
    }
}
