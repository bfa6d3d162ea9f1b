//! Effects ranking for the planning game's presentation layer.
//!
//! Decomposes what contributes how much to each tracked world variable by
//! replaying project, event and process effects against an engine snapshot.
//! Entry point is [`rank`]; [`AppState`] wraps the simulation engine and
//! re-ranks on demand.

pub mod app_state;
pub mod config;
pub mod content;
mod effects;
pub mod factors;
mod fingerprint;
pub mod format;
pub mod intensity;
mod kinds;
pub mod persist;
mod projects;
pub mod state;
mod vars;

pub use app_state::{AppState, EngineError, Phase, Points, Session, SimulationEngine};
pub use config::{load_ranking_config_from_env, RankingConfig, RankingConfigError};
pub use content::{ContentCatalog, ContentCatalogError, EventDef, Outcome, ProjectDef, ProjectKind};
pub use effects::{Effect, EffectKind, Param, ResolvedEffect, WorldVariable};
pub use factors::{factors_card, rank, rank_var, Factor, FactorsCard, Rankings};
pub use fingerprint::{fingerprint, fnv1a};
pub use intensity::{intensity, scale, Intensity, ScaleKind};
pub use kinds::{ByproductMap, Income, Output, OutputMap, Resource, ResourceMap};
pub use persist::{SaveData, SaveStore, SaveStoreError, Settings};
pub use projects::{active_effects, merge_outcome_effects};
pub use state::{EventRef, GameState, ProjectState, ProjectStatus};
pub use vars::{OutputKind, Var};
