#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;

use factor_core::{
    ContentCatalog, Effect, EffectKind, GameState, Outcome, ProjectDef, ProjectKind, ProjectState,
    ProjectStatus, Resource, WorldVariable,
};

static INIT: Once = Once::new();

pub fn ensure_test_config() {
    INIT.call_once(|| {
        let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("test_ranking_config.json");

        debug_assert!(
            config_path.exists(),
            "missing test ranking config at {}",
            config_path.display()
        );

        std::env::set_var("RANKING_CONFIG_PATH", &config_path);
    });
}

pub fn water(param: f32) -> Effect {
    Effect::new(EffectKind::Resource(Resource::Water), param)
}

pub fn outlook(param: f32) -> Effect {
    Effect::new(EffectKind::WorldVariable(WorldVariable::Outlook), param)
}

pub fn outcome(effects: Vec<Effect>, probability: f32) -> Outcome {
    Outcome {
        effects,
        probability,
    }
}

pub fn project_def(id: u64, name: &str, kind: ProjectKind) -> ProjectDef {
    ProjectDef {
        id,
        name: name.into(),
        kind,
        ..Default::default()
    }
}

pub fn project_state(id: u64, status: ProjectStatus) -> ProjectState {
    ProjectState {
        id,
        status,
        ..Default::default()
    }
}

pub fn sample() -> (GameState, ContentCatalog) {
    (
        (*GameState::builtin_sample()).clone(),
        (*ContentCatalog::builtin()).clone(),
    )
}
