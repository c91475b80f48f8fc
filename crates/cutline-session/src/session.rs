//! The editor session: one object owning the whole editing state.
//!
//! Components reach each other through this session rather than through
//! module-level globals; collaborators arrive via constructor injection.
//! Exposes the query surface the surrounding UI reads and the command
//! surface toolbars and shortcut handlers drive.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};
use uuid::Uuid;

use cutline_core::{FrameRate, Result, Viewport};
use cutline_timeline::{
    Clip, ClipEngine, History, MediaRef, ProjectFile, Segment, Timeline,
};

use crate::commands::{command_for_key, EditorCommand, Modifiers};
use crate::geometry::{PointerPos, TimelineGeometry};
use crate::gesture::{GestureController, GestureResolution};
use crate::playback::PlaybackController;
use crate::store::ProjectStore;

/// How often dirty state is auto-saved as a draft.
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// The editor session.
pub struct EditorSession {
    timeline: Timeline,
    engine: ClipEngine,
    history: History,
    playback: PlaybackController,
    viewport: Viewport,
    geometry: TimelineGeometry,
    gesture: GestureController,
    store: Arc<dyn ProjectStore>,
    project_id: Option<String>,
    dirty: bool,
    last_autosave: Option<Instant>,
}

impl EditorSession {
    /// Create a session over an empty timeline.
    pub fn new(frame_rate: FrameRate, viewport_width_px: f32, store: Arc<dyn ProjectStore>) -> Self {
        let timeline = Timeline::new(frame_rate);
        let history = History::new(timeline.clone());
        Self {
            timeline,
            engine: ClipEngine::new(),
            history,
            playback: PlaybackController::new(),
            viewport: Viewport::new(viewport_width_px),
            geometry: TimelineGeometry::new(),
            gesture: GestureController::new(),
            store,
            project_id: None,
            dirty: false,
            last_autosave: None,
        }
    }

    /// Load an existing project from the store.
    pub fn load(
        project_id: &str,
        viewport_width_px: f32,
        store: Arc<dyn ProjectStore>,
    ) -> Result<Self> {
        let file = store.load(project_id)?;
        let mut session = Self::new(file.timeline.frame_rate, viewport_width_px, store);
        session.timeline = file.timeline;
        session.history.reset(session.timeline.clone());
        session.project_id = Some(project_id.to_string());
        session.refit();
        debug!(project_id, "Project loaded");
        Ok(session)
    }

    // ── Query surface ───────────────────────────────────────────────

    /// Ordered exportable segments (gaps skipped).
    pub fn segments(&self) -> Vec<Segment> {
        self.timeline.segments()
    }

    /// All clips on the timeline.
    pub fn timeline_clips(&self) -> &[Clip] {
        &self.timeline.clips
    }

    /// Content duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.timeline.duration_secs()
    }

    /// Displayed timeline length in seconds (content plus trailing room).
    pub fn total_duration_secs(&self) -> f64 {
        self.viewport.length_secs()
    }

    /// Playhead position in seconds.
    pub fn current_time_secs(&self) -> f64 {
        self.timeline
            .frame_rate
            .frames_to_secs(self.timeline.current_frame)
    }

    /// Playhead as `MM:SS:FF` timecode.
    pub fn current_timecode(&self) -> String {
        cutline_core::format_timecode(self.timeline.current_frame, self.timeline.frame_rate)
    }

    /// Whether playback is running.
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Currently selected clip, if any.
    pub fn selected_clip_id(&self) -> Option<Uuid> {
        self.timeline.selected_clip
    }

    /// The timeline aggregate (read-only).
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The viewport (read-only).
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── Command surface ─────────────────────────────────────────────

    /// Dispatch a named command.
    pub fn dispatch(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::Play => {
                if PlaybackController::has_video(&self.timeline) {
                    self.playback.play();
                }
            }
            EditorCommand::Pause => self.playback.pause(),
            EditorCommand::TogglePlayback => {
                if self.playback.is_playing() {
                    self.playback.pause();
                } else if PlaybackController::has_video(&self.timeline) {
                    self.playback.play();
                }
            }
            EditorCommand::Seek { seconds } => {
                let frame = self.timeline.frame_rate.secs_to_frames(seconds);
                let total_frames = self.total_frames();
                self.playback
                    .seek(&mut self.timeline, frame, total_frames);
            }
            EditorCommand::SplitAtPlayhead => self.split_selected_at_playhead(),
            EditorCommand::DeleteSelected => self.delete_selected(),
            EditorCommand::Deselect => self.timeline.deselect(),
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::StepForward { large } => {
                let total_frames = self.total_frames();
                self.playback
                    .step(&mut self.timeline, 1, large, total_frames);
            }
            EditorCommand::StepBack { large } => {
                let total_frames = self.total_frames();
                self.playback
                    .step(&mut self.timeline, -1, large, total_frames);
            }
        }
    }

    /// Resolve and dispatch a key press. Returns whether it was handled.
    pub fn key_input(&mut self, key: &str, mods: Modifiers, in_text_field: bool) -> bool {
        match command_for_key(key, mods, in_text_field) {
            Some(cmd) => {
                self.dispatch(cmd);
                true
            }
            None => false,
        }
    }

    // ── Direct edit calls ───────────────────────────────────────────

    /// Import a clip at the given frame on a track. Commits history.
    pub fn import_clip(
        &mut self,
        name: &str,
        source: MediaRef,
        track_index: usize,
        start_frame: i64,
    ) -> Uuid {
        let id = self
            .timeline
            .add_clip(Clip::new(name, source, track_index, start_frame));
        self.commit("Import clip");
        id
    }

    /// Move a clip (toolbar/API path). Commits history when it applied.
    pub fn move_clip(&mut self, id: Uuid, new_start: i64, new_track: Option<usize>) {
        if self
            .engine
            .move_clip(&mut self.timeline, id, new_start, new_track)
        {
            self.commit("Move clip");
        }
    }

    /// Trim a clip's in point. Commits history when it applied.
    pub fn trim_clip_start(&mut self, id: Uuid, new_in: i64) {
        if self.engine.trim_start(&mut self.timeline, id, new_in) {
            self.commit("Trim clip");
        }
    }

    /// Trim a clip's out point. Commits history when it applied.
    pub fn trim_clip_end(&mut self, id: Uuid, new_out: i64) {
        if self.engine.trim_end(&mut self.timeline, id, new_out) {
            self.commit("Trim clip");
        }
    }

    /// Split a clip at a timeline frame. Commits history when it applied.
    pub fn split_clip(&mut self, id: Uuid, at_frame: i64) -> Option<Uuid> {
        let right = self.engine.split(&mut self.timeline, id, at_frame);
        if right.is_some() {
            self.commit("Split clip");
        }
        right
    }

    /// Delete a clip. Commits history when it existed.
    pub fn delete_clip(&mut self, id: Uuid) {
        if self.engine.delete(&mut self.timeline, id).is_some() {
            self.commit("Delete clip");
        }
    }

    /// Seek to a time in seconds.
    pub fn seek_secs(&mut self, seconds: f64) {
        self.dispatch(EditorCommand::Seek { seconds });
    }

    fn split_selected_at_playhead(&mut self) {
        let Some(id) = self.timeline.selected_clip else {
            return;
        };
        let at = self.timeline.current_frame;
        self.split_clip(id, at);
    }

    fn delete_selected(&mut self) {
        if let Some(id) = self.timeline.selected_clip {
            self.delete_clip(id);
        }
    }

    // ── Pointer input ───────────────────────────────────────────────

    pub fn pointer_down(&mut self, pos: PointerPos) {
        self.gesture
            .pointer_down(&mut self.timeline, &self.geometry, &self.viewport, pos);
    }

    pub fn pointer_move(&mut self, pos: PointerPos) {
        self.gesture.pointer_move(
            &mut self.timeline,
            &self.engine,
            &self.geometry,
            &self.viewport,
            pos,
        );
    }

    pub fn pointer_up(&mut self, pos: PointerPos, mods: Modifiers) -> GestureResolution {
        let resolution = self.gesture.pointer_up(
            &mut self.timeline,
            &self.engine,
            &self.viewport,
            &mut self.history,
            pos,
            mods.any(),
        );
        if resolution == GestureResolution::Drag {
            self.dirty = true;
            self.refit();
        }
        resolution
    }

    // ── History ─────────────────────────────────────────────────────

    /// Undo the last committed action.
    pub fn undo(&mut self) {
        if let Some(snapshot) = self.history.undo() {
            self.timeline = snapshot.clone();
            self.dirty = true;
            self.refit();
        }
    }

    /// Redo the last undone action.
    pub fn redo(&mut self) {
        if let Some(snapshot) = self.history.redo() {
            self.timeline = snapshot.clone();
            self.dirty = true;
            self.refit();
        }
    }

    fn commit(&mut self, label: &str) {
        self.history.commit(label, self.timeline.clone());
        self.dirty = true;
        self.refit();
    }

    fn refit(&mut self) {
        self.viewport.fit_content(self.timeline.duration_secs());
    }

    fn total_frames(&self) -> i64 {
        self.viewport.total_frames(self.timeline.frame_rate)
    }

    // ── Persistence & polling ───────────────────────────────────────

    /// Explicitly save the project. Returns the project ID.
    pub fn save(&mut self) -> Result<String> {
        let file = ProjectFile::new(self.timeline.clone(), false);
        let id = self.store.save(self.project_id.as_deref(), &file)?;
        self.project_id = Some(id.clone());
        self.dirty = false;
        debug!(project_id = %id, "Project saved");
        Ok(id)
    }

    /// Drive playback advancement and periodic draft auto-save. Call on a
    /// fixed interval (~100 ms).
    pub fn tick(&mut self, now: Instant) {
        let total = self.total_frames();
        self.playback.tick(&mut self.timeline, now, total);

        if !self.dirty {
            return;
        }
        let due = match self.last_autosave {
            Some(prev) => now.duration_since(prev) >= AUTOSAVE_INTERVAL,
            None => true,
        };
        if due {
            self.last_autosave = Some(now);
            let file = ProjectFile::new(self.timeline.clone(), true);
            match self.store.save(self.project_id.as_deref(), &file) {
                Ok(id) => {
                    self.project_id = Some(id);
                    self.dirty = false;
                    debug!("Draft auto-saved");
                }
                // Surfaced as retryable: state stays dirty for the next tick.
                Err(err) => warn!(%err, "Auto-save failed"),
            }
        }
    }

    /// Notify the session of a viewport resize.
    pub fn set_viewport_width(&mut self, width_px: f32) {
        self.viewport.set_viewport_width(width_px);
        self.refit();
    }

    /// Adjust zoom by a factor, clamped to the valid range.
    pub fn zoom_by(&mut self, factor: f32) {
        self.viewport.zoom_by(factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryProjectStore;

    fn session() -> EditorSession {
        EditorSession::new(FrameRate::FPS_30, 960.0, Arc::new(MemoryProjectStore::new()))
    }

    fn session_with_clip() -> (EditorSession, Uuid) {
        let mut s = session();
        let id = s.import_clip("clip", MediaRef::new("media-1", 300), 0, 0);
        (s, id)
    }

    #[test]
    fn import_then_query_surface() {
        let (s, id) = session_with_clip();
        assert_eq!(s.timeline_clips().len(), 1);
        assert_eq!(s.duration_secs(), 10.0);
        assert!(s.total_duration_secs() >= 20.0); // content + trailing room
        assert_eq!(s.selected_clip_id(), None);
        assert_eq!(s.segments()[0].media_id, "media-1");
        assert_eq!(s.current_timecode(), "00:00:00");
        assert!(s.timeline().clip(id).is_some());
    }

    #[test]
    fn dispatch_split_and_delete() {
        let (mut s, id) = session_with_clip();
        s.timeline.select_clip(Some(id));
        s.seek_secs(4.0); // frame 120

        s.dispatch(EditorCommand::SplitAtPlayhead);
        assert_eq!(s.timeline_clips().len(), 2);

        s.dispatch(EditorCommand::DeleteSelected);
        assert_eq!(s.timeline_clips().len(), 1);
        assert_eq!(s.selected_clip_id(), None);
    }

    #[test]
    fn undo_redo_roundtrip_via_commands() {
        let (mut s, id) = session_with_clip();
        let before = s.timeline().clone();

        s.move_clip(id, 150, None);
        let after = s.timeline().clone();
        assert_ne!(before, after);

        s.dispatch(EditorCommand::Undo);
        assert_eq!(*s.timeline(), before);

        s.dispatch(EditorCommand::Redo);
        assert_eq!(*s.timeline(), after);
    }

    #[test]
    fn move_commit_after_undo_discards_redo() {
        let (mut s, id) = session_with_clip();
        s.move_clip(id, 150, None);
        s.undo();
        assert!(s.can_redo());
        s.move_clip(id, 600, None);
        assert!(!s.can_redo());
    }

    #[test]
    fn rejected_move_commits_nothing() {
        let (mut s, id) = session_with_clip();
        s.import_clip("other", MediaRef::new("media-2", 300), 0, 600);
        let undo_before = s.history.undo_count();
        // Lands inside the other clip's span → rejected, no history entry
        s.move_clip(id, 650, None);
        assert_eq!(s.history.undo_count(), undo_before);
    }

    #[test]
    fn playback_toggle_requires_content() {
        let mut s = session();
        s.dispatch(EditorCommand::TogglePlayback);
        assert!(!s.is_playing());

        s.import_clip("clip", MediaRef::new("m", 30), 0, 0);
        s.dispatch(EditorCommand::TogglePlayback);
        assert!(s.is_playing());
        s.dispatch(EditorCommand::Pause);
        assert!(!s.is_playing());
    }

    #[test]
    fn seek_clamps_to_displayed_length() {
        let (mut s, _) = session_with_clip();
        s.seek_secs(-5.0);
        assert_eq!(s.current_time_secs(), 0.0);
        s.seek_secs(10_000.0);
        assert!(s.current_time_secs() <= s.total_duration_secs());
    }

    #[test]
    fn keyboard_undo_suppressed_in_text_field() {
        let (mut s, id) = session_with_clip();
        s.move_clip(id, 150, None);

        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        assert!(!s.key_input("z", ctrl, true));
        assert_eq!(s.timeline().clip(id).unwrap().start_frame, 150);

        assert!(s.key_input("z", ctrl, false));
        assert_eq!(s.timeline().clip(id).unwrap().start_frame, 0);
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let store = Arc::new(MemoryProjectStore::new());
        let mut s = EditorSession::new(FrameRate::FPS_30, 960.0, store.clone());
        s.import_clip("clip", MediaRef::new("m", 300), 0, 60);
        let id = s.save().unwrap();

        let reloaded = EditorSession::load(&id, 960.0, store).unwrap();
        assert_eq!(*reloaded.timeline(), *s.timeline());
        assert!(!reloaded.can_undo()); // history reseeded on load
    }

    #[test]
    fn autosave_writes_draft_when_dirty() {
        let store = Arc::new(MemoryProjectStore::new());
        let mut s = EditorSession::new(FrameRate::FPS_30, 960.0, store.clone());
        s.import_clip("clip", MediaRef::new("m", 300), 0, 0);

        assert!(store.is_empty());
        s.tick(Instant::now());
        assert_eq!(store.len(), 1);
        let id = s.project_id.clone().unwrap();
        assert!(store.load(&id).unwrap().draft);

        // Clean state: the next tick does not save again
        s.tick(Instant::now() + AUTOSAVE_INTERVAL * 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn zoom_interaction_stays_clamped() {
        let (mut s, _) = session_with_clip();
        for _ in 0..20 {
            s.zoom_by(1.5);
        }
        assert!(s.viewport().zoom() <= cutline_core::MAX_ZOOM);
        for _ in 0..40 {
            s.zoom_by(0.5);
        }
        assert!(s.viewport().zoom() >= s.viewport().min_zoom() - f32::EPSILON);
    }
}
