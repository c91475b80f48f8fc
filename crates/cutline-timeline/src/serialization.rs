//! Project serialization with versioning and migration.
//!
//! Uses JSON with a schema version field for forward-compatible persistence.
//! Auto-saved states carry a `draft` flag so the persistence collaborator
//! can distinguish them from explicit saves.

use cutline_core::{CutlineError, Result};
use serde::{Deserialize, Serialize};

use crate::timeline::Timeline;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned project file wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Schema version for migration.
    pub version: u32,
    /// The timeline data.
    pub timeline: Timeline,
    /// True for auto-saved drafts, false for explicit saves.
    #[serde(default)]
    pub draft: bool,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl ProjectFile {
    /// Wrap a timeline for persistence.
    pub fn new(timeline: Timeline, draft: bool) -> Self {
        Self {
            version: CURRENT_VERSION,
            timeline,
            draft,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| CutlineError::Serialization(format!("Failed to serialize project: {e}")))
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| CutlineError::Serialization(format!("Invalid JSON: {e}")))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
        if version > CURRENT_VERSION {
            return Err(CutlineError::Serialization(format!(
                "Project file version {version} is newer than supported version {CURRENT_VERSION}"
            )));
        }

        let migrated = migrate(raw, version)?;
        serde_json::from_value(migrated)
            .map_err(|e| CutlineError::Serialization(format!("Failed to parse project: {e}")))
    }

    /// Save project to a file path.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load project from a file path.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

/// Apply sequential migrations from `from_version` to [`CURRENT_VERSION`].
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: the entire value was the bare timeline
                if data.get("version").is_none() {
                    data = serde_json::json!({
                        "version": 1,
                        "timeline": data,
                        "draft": false,
                        "app_version": "0.1.0",
                    });
                }
                version = 1;
            }
            _ => {
                return Err(CutlineError::Serialization(format!(
                    "No migration path from version {version}"
                )));
            }
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{Clip, MediaRef};
    use cutline_core::FrameRate;

    fn sample_timeline() -> Timeline {
        let mut tl = Timeline::new(FrameRate::FPS_30);
        tl.add_clip(Clip::new("intro", MediaRef::new("media-1", 240), 0, 0));
        tl
    }

    #[test]
    fn project_roundtrip() {
        let timeline = sample_timeline();
        let file = ProjectFile::new(timeline.clone(), false);

        let json = file.to_json().unwrap();
        let loaded = ProjectFile::from_json(&json).unwrap();

        assert_eq!(loaded.version, CURRENT_VERSION);
        assert!(!loaded.draft);
        assert_eq!(loaded.timeline, timeline);
    }

    #[test]
    fn draft_flag_survives_roundtrip() {
        let file = ProjectFile::new(sample_timeline(), true);
        let loaded = ProjectFile::from_json(&file.to_json().unwrap()).unwrap();
        assert!(loaded.draft);
    }

    #[test]
    fn migration_from_bare_timeline() {
        let raw = serde_json::to_vec(&sample_timeline()).unwrap();
        let loaded = ProjectFile::from_json(&raw).unwrap();
        assert_eq!(loaded.version, CURRENT_VERSION);
        assert_eq!(loaded.timeline.clips.len(), 1);
    }

    #[test]
    fn future_version_rejected() {
        let json = serde_json::json!({
            "version": 999,
            "timeline": {},
            "app_version": "99.0.0",
        });
        let data = serde_json::to_vec(&json).unwrap();
        assert!(ProjectFile::from_json(&data).is_err());
    }
}
