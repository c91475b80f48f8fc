//! Integration tests for pointer-driven editing through the session.
//!
//! Drives the full stack: geometry hit-testing → gesture state machine →
//! manipulation engine → history, exactly as a host UI would.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cutline_core::FrameRate;
use cutline_session::geometry::{RULER_HEIGHT, TRACK_HEIGHT};
use cutline_session::{
    EditorSession, GestureResolution, MemoryProjectStore, Modifiers, PointerPos,
};
use cutline_timeline::MediaRef;
use uuid::Uuid;

// 50 px per second at zoom 1, 30 fps → 5/3 px per frame.

fn session_with_clip() -> (EditorSession, Uuid) {
    let mut s = EditorSession::new(
        FrameRate::FPS_30,
        960.0,
        Arc::new(MemoryProjectStore::new()),
    );
    let id = s.import_clip("clip", MediaRef::new("media-1", 300), 0, 0);
    (s, id)
}

fn lane_y(lane: usize) -> f32 {
    RULER_HEIGHT + lane as f32 * TRACK_HEIGHT + TRACK_HEIGHT / 2.0
}

fn drag(s: &mut EditorSession, from: PointerPos, to: PointerPos) -> GestureResolution {
    s.pointer_down(from);
    // a mid-gesture sample plus the final position
    s.pointer_move(PointerPos::new((from.x + to.x) / 2.0, to.y));
    s.pointer_move(to);
    s.pointer_up(to, Modifiers::NONE)
}

#[test]
fn click_selects_then_drag_moves_with_single_commit() {
    let (mut s, id) = session_with_clip();

    // Click: select
    s.pointer_down(PointerPos::new(100.0, lane_y(0)));
    let res = s.pointer_up(PointerPos::new(101.0, lane_y(0)), Modifiers::NONE);
    assert_eq!(res, GestureResolution::Click);
    assert_eq!(s.selected_clip_id(), Some(id));
    assert!(!s.can_undo());

    // Drag 300px to the right: 6s → 180 frames
    let res = drag(
        &mut s,
        PointerPos::new(100.0, lane_y(0)),
        PointerPos::new(400.0, lane_y(0)),
    );
    assert_eq!(res, GestureResolution::Drag);
    assert_eq!(s.timeline().clip(id).unwrap().start_frame, 180);
    assert!(s.can_undo());

    s.undo();
    assert_eq!(s.timeline().clip(id).unwrap().start_frame, 0);
    assert!(s.can_redo());
}

#[test]
fn trim_gesture_on_selected_clip_adjusts_out_point() {
    let (mut s, id) = session_with_clip();
    s.pointer_down(PointerPos::new(100.0, lane_y(0)));
    s.pointer_up(PointerPos::new(100.0, lane_y(0)), Modifiers::NONE);
    assert_eq!(s.selected_clip_id(), Some(id));

    // Clip spans 0..500px; grab the right handle and pull left 100px (2s)
    let res = drag(
        &mut s,
        PointerPos::new(499.0, lane_y(0)),
        PointerPos::new(399.0, lane_y(0)),
    );
    assert_eq!(res, GestureResolution::Drag);
    let clip = s.timeline().clip(id).unwrap();
    assert_eq!(clip.source_out, 240);
    assert_eq!(clip.start_frame, 0);
}

#[test]
fn trim_handles_inactive_without_selection() {
    let (mut s, id) = session_with_clip();
    // Same handle-zone drag without selecting first: moves the clip instead
    drag(
        &mut s,
        PointerPos::new(499.0, lane_y(0)),
        PointerPos::new(399.0, lane_y(0)),
    );
    let clip = s.timeline().clip(id).unwrap();
    assert_eq!(clip.source_out, 300); // untouched
    assert_eq!(clip.start_frame, 0); // -100px clamps at 0
}

#[test]
fn empty_lane_click_selects_track_and_clears_clip() {
    let (mut s, id) = session_with_clip();
    s.pointer_down(PointerPos::new(100.0, lane_y(0)));
    s.pointer_up(PointerPos::new(100.0, lane_y(0)), Modifiers::NONE);
    assert_eq!(s.selected_clip_id(), Some(id));

    s.pointer_down(PointerPos::new(800.0, lane_y(1)));
    s.pointer_up(PointerPos::new(800.0, lane_y(1)), Modifiers::NONE);
    assert_eq!(s.selected_clip_id(), None);
    assert_eq!(s.timeline().selected_track, Some(1));
}

#[test]
fn drag_near_playhead_snaps_through_full_stack() {
    let (mut s, id) = session_with_clip();
    s.seek_secs(30.0); // playhead at frame 900
    // 1505px at 50pps/30fps lands within the snap tolerance of frame 900
    drag(
        &mut s,
        PointerPos::new(0.0, lane_y(0)),
        PointerPos::new(1505.0, lane_y(0)),
    );
    assert_eq!(s.timeline().clip(id).unwrap().start_frame, 900);
}

#[test]
fn playback_poll_advances_during_and_after_edit() {
    let (mut s, _) = session_with_clip();
    s.dispatch(cutline_session::EditorCommand::Play);
    assert!(s.is_playing());

    let t0 = Instant::now();
    s.tick(t0);
    s.tick(t0 + Duration::from_millis(500));
    let after_poll = s.current_time_secs();
    assert!((after_poll - 0.5).abs() < 0.05);

    s.dispatch(cutline_session::EditorCommand::Pause);
    s.tick(t0 + Duration::from_secs(2));
    assert_eq!(s.current_time_secs(), after_poll);
}

#[test]
fn frame_step_commands_move_playhead_nominally() {
    let (mut s, _) = session_with_clip();
    s.dispatch(cutline_session::EditorCommand::StepForward { large: false });
    s.dispatch(cutline_session::EditorCommand::StepForward { large: true });
    let frame = s.timeline().current_frame;
    assert_eq!(frame, 11);
    s.dispatch(cutline_session::EditorCommand::StepBack { large: false });
    assert_eq!(s.timeline().current_frame, 10);
}
