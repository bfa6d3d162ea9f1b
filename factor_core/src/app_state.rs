//! Explicit application state wrapped around the simulation engine.
//!
//! The engine owns the rules. `AppState` keeps the latest snapshot plus the
//! session bookkeeping the engine does not track (phase, event log, points,
//! cycle comparisons), and re-reads the snapshot after every mutation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RankingConfig;
use crate::content::ContentCatalog;
use crate::factors::{factors_card, rank, rank_var, Factor, FactorsCard, Rankings};
use crate::format;
use crate::persist::{SaveData, Settings};
use crate::state::{EventRef, GameState};
use crate::vars::Var;

/// Calls into the external simulation engine.
pub trait SimulationEngine {
    /// Advance one year; returns ids of projects completed during the step.
    fn step(&mut self) -> Vec<u64>;
    fn apply_event(&mut self, event_id: u64, region_id: Option<u64>);
    fn set_project_points(&mut self, project_id: u64, points: u32);
    fn start_project(&mut self, project_id: u64);
    fn stop_project(&mut self, project_id: u64);
    fn upgrade_project(&mut self, project_id: u64);
    fn downgrade_project(&mut self, project_id: u64);
    fn change_process_mix_share(&mut self, process_id: u64, amount: i32);
    /// Research points accrued since the last call.
    fn collect_research_points(&mut self) -> u32;
    fn industry_demand(&self, industry_id: u64) -> f32;
    fn state(&self) -> GameState;
    fn save_state(&self) -> String;
    fn load_state(&mut self, save: &str) -> Result<(), EngineError>;
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine rejected save state: {0}")]
    InvalidSave(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    Intro,
    #[default]
    Planning,
    Events,
    Report,
    Break,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Points {
    pub research: u32,
    pub initiative: u32,
}

/// World figures captured at the start of a planning cycle, for the report.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleStart {
    pub year: u32,
    pub emissions: f32,
    pub extinction_rate: f32,
    pub contentedness: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct History {
    pub emissions: Vec<f32>,
    /// Land use as a percent of starting land.
    pub land_use: Vec<f32>,
}

/// Everything about a run that is saved alongside the engine's own state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub phase: Phase,
    pub start_year: u32,
    pub events: Vec<EventRef>,
    pub points: Points,
    pub cycle_start: CycleStart,
    pub history: History,
}

pub struct AppState<E> {
    engine: E,
    catalog: Arc<ContentCatalog>,
    config: Arc<RankingConfig>,
    snapshot: GameState,
    session: Session,
    settings: Settings,
}

impl<E: SimulationEngine> AppState<E> {
    pub fn new(engine: E, catalog: Arc<ContentCatalog>, config: Arc<RankingConfig>) -> Self {
        let mut app = Self {
            engine,
            catalog,
            config,
            snapshot: GameState::default(),
            session: Session::default(),
            settings: Settings::default(),
        };
        app.refresh();
        app.session.start_year = app.snapshot.world.year;
        app.begin_cycle();
        app
    }

    /// Resume a saved run. The engine is restored before the first refresh.
    pub fn resume(
        mut engine: E,
        catalog: Arc<ContentCatalog>,
        config: Arc<RankingConfig>,
        save: SaveData,
    ) -> Result<Self, EngineError> {
        engine.load_state(&save.game)?;
        let mut app = Self {
            engine,
            catalog,
            config,
            snapshot: GameState::default(),
            session: save.state,
            settings: Settings::default(),
        };
        app.refresh();
        tracing::info!(
            target: "factors::app_state",
            year = app.snapshot.world.year,
            version = %save.version,
            "session.resumed"
        );
        Ok(app)
    }

    pub fn snapshot(&self) -> &GameState {
        &self.snapshot
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        tracing::debug!(
            target: "factors::app_state",
            from = ?self.session.phase,
            to = ?phase,
            "phase.changed"
        );
        self.session.phase = phase;
    }

    pub fn points(&self) -> Points {
        self.session.points
    }

    pub fn points_mut(&mut self) -> &mut Points {
        &mut self.session.points
    }

    /// Start a new planning cycle: remember where the world stood and forget
    /// last cycle's events.
    pub fn begin_cycle(&mut self) {
        let world = &self.snapshot.world;
        self.session.cycle_start = CycleStart {
            year: world.year,
            emissions: world.emissions,
            extinction_rate: world.extinction_rate,
            contentedness: self.snapshot.contentedness,
        };
        self.session.events.clear();
        self.snapshot.events.clear();
    }

    pub fn step(&mut self) -> Vec<u64> {
        let completed = self.engine.step();
        self.refresh();
        let land_use = format::land_use_percent(
            self.snapshot.resources_demand.land,
            &self.snapshot.world.starting_resources,
        );
        self.session.history.emissions.push(self.snapshot.world.emissions);
        self.session.history.land_use.push(land_use);
        completed
    }

    pub fn apply_event(&mut self, event_id: u64, region_id: Option<u64>) {
        self.engine.apply_event(event_id, region_id);
        self.session.events.push(EventRef {
            event_id,
            region_id,
        });
        self.refresh();
    }

    pub fn apply_events(&mut self, events: &[EventRef]) {
        for event in events {
            self.engine.apply_event(event.event_id, event.region_id);
            self.session.events.push(*event);
        }
        self.refresh();
    }

    pub fn set_project_points(&mut self, project_id: u64, points: u32) {
        self.engine.set_project_points(project_id, points);
        self.refresh();
    }

    pub fn start_project(&mut self, project_id: u64) {
        self.engine.start_project(project_id);
        self.refresh();
    }

    pub fn stop_project(&mut self, project_id: u64) {
        self.engine.stop_project(project_id);
        self.refresh();
    }

    pub fn upgrade_project(&mut self, project_id: u64) {
        self.engine.upgrade_project(project_id);
        self.refresh();
    }

    pub fn downgrade_project(&mut self, project_id: u64) {
        self.engine.downgrade_project(project_id);
        self.refresh();
    }

    pub fn change_process_mix_share(&mut self, process_id: u64, amount: i32) {
        self.engine.change_process_mix_share(process_id, amount);
        self.refresh();
    }

    pub fn factors(&self) -> Rankings {
        rank(&self.snapshot, &self.catalog, &self.config)
    }

    pub fn factors_for(&self, var: Var) -> Vec<Factor> {
        rank_var(var, &self.snapshot, &self.catalog, &self.config)
    }

    pub fn factors_card(&self, var: Var, current: Option<String>) -> FactorsCard {
        factors_card(var, &self.snapshot, current)
    }

    pub fn save_data(&self, version: &str, version_timestamp: u64) -> SaveData {
        SaveData {
            state: self.session.clone(),
            version: version.to_string(),
            version_timestamp,
            game: self.engine.save_state(),
        }
    }

    fn refresh(&mut self) {
        let mut snapshot = self.engine.state();
        for industry in &mut snapshot.industries {
            industry.demand = self.engine.industry_demand(industry.id);
        }
        snapshot.events = self.session.events.clone();
        self.session.points.research += self.engine.collect_research_points();
        tracing::trace!(
            target: "factors::app_state",
            year = snapshot.world.year,
            events = snapshot.events.len(),
            "snapshot.refreshed"
        );
        self.snapshot = snapshot;
    }
}
