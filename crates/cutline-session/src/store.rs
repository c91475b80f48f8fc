//! Persistence collaborator for the editor session.

use std::collections::HashMap;
use std::sync::Mutex;

use cutline_core::{CutlineError, Result};
use cutline_timeline::ProjectFile;
use uuid::Uuid;

/// Project load/save, supplied by the surrounding system (database, file
/// tree, whatever). The session calls it on demand and from the auto-save
/// tick; drafts are flagged so the store can treat them differently.
pub trait ProjectStore: Send + Sync {
    /// Load a project by ID.
    fn load(&self, project_id: &str) -> Result<ProjectFile>;

    /// Persist a project state, returning its ID.
    fn save(&self, project_id: Option<&str>, file: &ProjectFile) -> Result<String>;
}

/// In-memory store for tests and headless use.
#[derive(Default)]
pub struct MemoryProjectStore {
    projects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored projects.
    pub fn len(&self) -> usize {
        self.projects.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProjectStore for MemoryProjectStore {
    fn load(&self, project_id: &str) -> Result<ProjectFile> {
        let projects = self
            .projects
            .lock()
            .map_err(|_| CutlineError::Transport("project store lock poisoned".into()))?;
        let data = projects
            .get(project_id)
            .ok_or_else(|| CutlineError::NotFound(project_id.to_string()))?;
        ProjectFile::from_json(data)
    }

    fn save(&self, project_id: Option<&str>, file: &ProjectFile) -> Result<String> {
        let id = project_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let data = file.to_json()?;
        self.projects
            .lock()
            .map_err(|_| CutlineError::Transport("project store lock poisoned".into()))?
            .insert(id.clone(), data);
        Ok(id)
    }
}
