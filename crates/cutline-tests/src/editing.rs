//! Integration tests for the editing core.
//!
//! Exercises cross-crate interactions between cutline-core,
//! cutline-timeline, and cutline-session.

use std::sync::Arc;

use cutline_core::FrameRate;
use cutline_session::{EditorCommand, EditorSession, MemoryProjectStore};
use cutline_timeline::{ClipEngine, History, MediaRef, Timeline};
use uuid::Uuid;

// ── Helpers ────────────────────────────────────────────────────

fn session() -> EditorSession {
    EditorSession::new(
        FrameRate::FPS_30,
        960.0,
        Arc::new(MemoryProjectStore::new()),
    )
}

fn session_with_clips() -> (EditorSession, Vec<Uuid>) {
    let mut s = session();
    let ids = vec![
        s.import_clip("intro", MediaRef::new("media-a", 30), 0, 0),
        s.import_clip("body", MediaRef::new("media-b", 30), 0, 60),
        s.import_clip("outro", MediaRef::new("media-c", 180), 0, 120),
    ];
    (s, ids)
}

// ── Snapping exactness (playhead 150, tolerance 3) ─────────────

#[test]
fn move_landing_near_playhead_snaps_exactly() {
    for candidate in [148i64, 149, 150, 151, 152] {
        let mut tl = Timeline::new(FrameRate::FPS_30);
        let id = tl.add_clip(cutline_timeline::Clip::new(
            "c",
            MediaRef::new("m", 60),
            0,
            500,
        ));
        tl.set_playhead(150);

        ClipEngine::new().move_clip(&mut tl, id, candidate, None);
        assert_eq!(
            tl.clip(id).unwrap().start_frame,
            150,
            "candidate {candidate} should snap to the playhead"
        );
    }
}

#[test]
fn move_far_from_playhead_does_not_snap() {
    let mut tl = Timeline::new(FrameRate::FPS_30);
    let id = tl.add_clip(cutline_timeline::Clip::new(
        "c",
        MediaRef::new("m", 60),
        0,
        500,
    ));
    tl.set_playhead(150);
    ClipEngine::new().move_clip(&mut tl, id, 200, None);
    assert_eq!(tl.clip(id).unwrap().start_frame, 200);
}

// ── Track-kind constraint ──────────────────────────────────────

#[test]
fn video_clip_refused_by_audio_track() {
    let (mut s, ids) = session_with_clips();
    let before = s.timeline().clip(ids[0]).unwrap().track_index;
    // Track 1 is the audio lane of the starting set
    s.move_clip(ids[0], 300, Some(1));
    let clip = s.timeline().clip(ids[0]).unwrap();
    assert_eq!(clip.track_index, before);
    assert_eq!(clip.start_frame, 300); // position still applied
}

// ── Undo/redo across the full aggregate ────────────────────────

#[test]
fn undo_restores_aggregate_deeply_after_each_operation() {
    let (mut s, ids) = session_with_clips();

    let before_trim = s.timeline().clone();
    s.trim_clip_end(ids[2], 120);
    assert_ne!(*s.timeline(), before_trim);

    let before_split = s.timeline().clone();
    s.seek_secs(5.0); // frame 150, inside the outro clip
    s.split_clip(ids[2], 150);
    assert_eq!(s.timeline_clips().len(), 4);

    let before_delete = s.timeline().clone();
    s.delete_clip(ids[0]);
    assert_eq!(s.timeline_clips().len(), 3);

    s.undo();
    assert_eq!(s.timeline().clips, before_delete.clips);
    s.undo();
    assert_eq!(s.timeline().clips, before_split.clips);
    s.undo();
    assert_eq!(s.timeline().clips, before_trim.clips);

    s.redo();
    assert_eq!(s.timeline().clips, before_split.clips);
}

#[test]
fn commit_after_undo_discards_redo_branch() {
    let (mut s, ids) = session_with_clips();
    s.move_clip(ids[0], 200, None);
    s.move_clip(ids[0], 400, None);
    s.undo();
    assert!(s.can_redo());

    s.move_clip(ids[1], 300, None);
    assert!(!s.can_redo());
}

// ── Split conservation via history ─────────────────────────────

#[test]
fn split_then_undo_is_identity() {
    let (mut s, ids) = session_with_clips();
    let before = s.timeline().clone();
    s.split_clip(ids[2], 200);
    assert_eq!(s.timeline_clips().len(), 4);
    s.undo();
    assert_eq!(*s.timeline(), before);
}

#[test]
fn split_halves_rejoin_source_exactly() {
    let mut tl = Timeline::new(FrameRate::FPS_30);
    let id = tl.add_clip(cutline_timeline::Clip::new(
        "c",
        MediaRef::new("m", 240),
        0,
        30,
    ));
    let right = ClipEngine::new().split(&mut tl, id, 130).unwrap();

    let left = tl.clip(id).unwrap();
    let right = tl.clip(right).unwrap();
    assert_eq!(left.source_out, right.source_in);
    assert_eq!(left.end_frame(), right.start_frame);
    assert_eq!(
        left.duration_frames() + right.duration_frames(),
        240
    );
}

// ── History + persistence interplay ────────────────────────────

#[test]
fn history_survives_multistep_editing_session() {
    let mut history = History::new(Timeline::new(FrameRate::FPS_30));
    let engine = ClipEngine::new();
    let mut tl = Timeline::new(FrameRate::FPS_30);

    let id = tl.add_clip(cutline_timeline::Clip::new(
        "c",
        MediaRef::new("m", 300),
        0,
        0,
    ));
    history.commit("Import clip", tl.clone());

    engine.move_clip(&mut tl, id, 90, None);
    history.commit("Move clip", tl.clone());

    engine.trim_end(&mut tl, id, 150);
    history.commit("Trim clip", tl.clone());

    assert_eq!(history.undo_count(), 3);
    let restored = history.undo().unwrap().clone();
    assert_eq!(restored.clip(id).unwrap().source_out, 300);
    assert_eq!(restored.clip(id).unwrap().start_frame, 90);
}

#[test]
fn save_load_then_continue_editing() {
    let store = Arc::new(MemoryProjectStore::new());
    let mut s = EditorSession::new(FrameRate::FPS_30, 960.0, store.clone());
    let id = s.import_clip("clip", MediaRef::new("m", 300), 0, 0);
    s.move_clip(id, 150, None);
    let project_id = s.save().unwrap();

    let mut reloaded = EditorSession::load(&project_id, 960.0, store).unwrap();
    assert_eq!(reloaded.timeline_clips()[0].start_frame, 150);

    // Loaded session edits and undoes independently
    let rid = reloaded.timeline_clips()[0].id;
    reloaded.trim_clip_end(rid, 100);
    reloaded.dispatch(EditorCommand::Undo);
    assert_eq!(reloaded.timeline_clips()[0].source_out, 300);
}
