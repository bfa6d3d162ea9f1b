use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::effects::Effect;

pub const BUILTIN_CONTENT: &str = include_str!("data/content.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectKind {
    Policy,
    #[default]
    Project,
    Research,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Outcome {
    pub effects: Vec<Effect>,
    pub probability: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Upgrade {
    pub cost: usize,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDef {
    pub id: u64,
    pub name: String,
    pub kind: ProjectKind,
    pub effects: Vec<Effect>,
    pub outcomes: Vec<Outcome>,
    pub upgrades: Vec<Upgrade>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventDef {
    pub id: u64,
    pub name: String,
    pub effects: Vec<Effect>,
}

/// Static project and event definitions, keyed by integer id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentCatalog {
    pub projects: Vec<ProjectDef>,
    pub events: Vec<EventDef>,
}

impl ContentCatalog {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_CONTENT).expect("builtin content catalog should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, ContentCatalogError> {
        let catalog: ContentCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self, ContentCatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| ContentCatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn project(&self, id: u64) -> Option<&ProjectDef> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn event(&self, id: u64) -> Option<&EventDef> {
        self.events.iter().find(|event| event.id == id)
    }

    fn validate(&self) -> Result<(), ContentCatalogError> {
        let mut seen = HashSet::new();
        for project in &self.projects {
            if !seen.insert(project.id) {
                return Err(ContentCatalogError::DuplicateProject { id: project.id });
            }
        }
        seen.clear();
        for event in &self.events {
            if !seen.insert(event.id) {
                return Err(ContentCatalogError::DuplicateEvent { id: event.id });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ContentCatalogError {
    #[error("failed to parse content catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read content catalog from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("duplicate project id {id}")]
    DuplicateProject { id: u64 },
    #[error("duplicate event id {id}")]
    DuplicateEvent { id: u64 },
}
