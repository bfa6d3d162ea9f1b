use std::fs;
use std::sync::Arc;

use anyhow::Result;
use factor_core::persist::{
    clear_save, has_save, load_game, load_settings, save_game, save_settings, EXPIRED_TIMESTAMP,
    GAME_DATA_KEY,
};
use factor_core::{
    AppState, ContentCatalog, EngineError, EventRef, GameState, Phase, RankingConfig, SaveStore,
    Settings, SimulationEngine, Var,
};

/// Engine double that advances the bundled sample snapshot year by year.
struct SampleEngine {
    state: GameState,
}

impl SampleEngine {
    fn new() -> Self {
        Self {
            state: (*GameState::builtin_sample()).clone(),
        }
    }

    fn blank() -> Self {
        Self {
            state: GameState::default(),
        }
    }
}

impl SimulationEngine for SampleEngine {
    fn step(&mut self) -> Vec<u64> {
        self.state.world.year += 1;
        self.state.world.emissions *= 1.01;
        Vec::new()
    }
    fn apply_event(&mut self, _event_id: u64, _region_id: Option<u64>) {}
    fn set_project_points(&mut self, _project_id: u64, _points: u32) {}
    fn start_project(&mut self, _project_id: u64) {}
    fn stop_project(&mut self, _project_id: u64) {}
    fn upgrade_project(&mut self, _project_id: u64) {}
    fn downgrade_project(&mut self, _project_id: u64) {}
    fn change_process_mix_share(&mut self, _process_id: u64, _amount: i32) {}
    fn collect_research_points(&mut self) -> u32 {
        0
    }
    fn industry_demand(&self, industry_id: u64) -> f32 {
        self.state
            .industries
            .iter()
            .find(|industry| industry.id == industry_id)
            .map_or(0., |industry| industry.demand)
    }
    fn state(&self) -> GameState {
        self.state.clone()
    }
    fn save_state(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_default()
    }
    fn load_state(&mut self, save: &str) -> Result<(), EngineError> {
        self.state =
            serde_json::from_str(save).map_err(|err| EngineError::InvalidSave(err.to_string()))?;
        Ok(())
    }
}

fn temp_store(name: &str) -> SaveStore {
    let dir = std::env::temp_dir().join(format!(
        "integration-save-store-{name}-{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    SaveStore::new(dir)
}

fn new_app() -> AppState<SampleEngine> {
    AppState::new(
        SampleEngine::new(),
        ContentCatalog::builtin(),
        Arc::new(RankingConfig::default()),
    )
}

#[test]
fn saved_run_resumes_with_identical_rankings() -> Result<()> {
    let store = temp_store("resume");
    let mut app = new_app();
    app.apply_event(0, Some(2));
    app.step();
    app.set_phase(Phase::Report);
    let before = app.factors();

    save_game(&store, &app.save_data("1.2.0", EXPIRED_TIMESTAMP + 1))?;
    assert!(has_save(&store));

    let save = load_game(&store).expect("fresh save should load");
    let resumed = AppState::resume(
        SampleEngine::blank(),
        ContentCatalog::builtin(),
        Arc::new(RankingConfig::default()),
        save,
    )?;

    assert_eq!(resumed.phase(), Phase::Report);
    assert_eq!(resumed.snapshot().world.year, 2023);
    assert_eq!(
        resumed.session().events,
        vec![EventRef {
            event_id: 0,
            region_id: Some(2)
        }]
    );
    assert_eq!(resumed.factors(), before);
    assert_eq!(resumed.session().history.emissions.len(), 1);
    Ok(())
}

#[test]
fn resume_rejects_unreadable_engine_state() -> Result<()> {
    let mut save = new_app().save_data("1.2.0", EXPIRED_TIMESTAMP + 1);
    save.game = "not an engine save".into();

    let result = AppState::resume(
        SampleEngine::blank(),
        ContentCatalog::builtin(),
        Arc::new(RankingConfig::default()),
        save,
    );
    assert!(matches!(result, Err(EngineError::InvalidSave(_))));
    Ok(())
}

#[test]
fn expired_and_corrupt_saves_are_skipped() -> Result<()> {
    let store = temp_store("stale");
    let app = new_app();

    save_game(&store, &app.save_data("0.9.0", EXPIRED_TIMESTAMP - 1))?;
    assert!(load_game(&store).is_none());

    store.set_item(GAME_DATA_KEY, "{\"state\":")?;
    assert!(!has_save(&store));

    save_game(&store, &app.save_data("1.2.0", EXPIRED_TIMESTAMP))?;
    assert!(has_save(&store));
    clear_save(&store)?;
    assert!(!has_save(&store));
    Ok(())
}

#[test]
fn settings_survive_a_cleared_game() -> Result<()> {
    let store = temp_store("settings");
    let settings = Settings {
        hide_help: true,
        sound: true,
    };
    save_settings(&store, &settings)?;
    save_game(&store, &new_app().save_data("1.2.0", EXPIRED_TIMESTAMP))?;
    clear_save(&store)?;

    let app = new_app().with_settings(load_settings(&store));
    assert_eq!(app.settings(), settings);
    Ok(())
}

#[test]
fn app_state_card_reflects_snapshot() {
    let app = new_app();
    let card = app.factors_card(Var::Fuel, Some("Fuel".into()));
    assert_eq!(card.var, Var::Fuel);
    assert_eq!(card.total, 3600.);
    assert_eq!(card.display_total, "3600");
    assert!(!app.factors_for(Var::Fuel).is_empty());
}
