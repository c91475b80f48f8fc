//! Integration tests for the export pipeline fed from a real timeline.

use std::sync::Arc;

use cutline_core::{CutlineError, FrameRate};
use cutline_export::{
    planned_duration_secs, DirectoryOutputStore, ExportPhase, ExportPipeline, ExportSettings,
    MemoryMediaStore, NullTranscoder,
};
use cutline_session::{EditorSession, MemoryProjectStore};
use cutline_timeline::MediaRef;

/// Session with three clips covering frames [0,30), [60,90), [120,300)
/// at 30 fps — a 10 s timeline span with 8 s of actual content.
fn session_with_gapped_clips() -> EditorSession {
    let mut s = EditorSession::new(
        FrameRate::FPS_30,
        960.0,
        Arc::new(MemoryProjectStore::new()),
    );
    s.import_clip("a", MediaRef::new("media-a", 30), 0, 0);
    s.import_clip("b", MediaRef::new("media-b", 30), 0, 60);
    s.import_clip("c", MediaRef::new("media-c", 180), 0, 120);
    s
}

fn media_store() -> Arc<MemoryMediaStore> {
    let store = MemoryMediaStore::new();
    store.insert("media-a", b"AA".to_vec(), 30);
    store.insert("media-b", b"BB".to_vec(), 30);
    store.insert("media-c", b"CC".to_vec(), 180);
    Arc::new(store)
}

#[test]
fn gapped_timeline_plans_eight_seconds_not_ten() {
    let s = session_with_gapped_clips();
    assert_eq!(s.duration_secs(), 10.0); // full span including gaps

    let planned = planned_duration_secs(&s.segments(), FrameRate::FPS_30);
    assert_eq!(planned, 8.0); // (30 + 30 + 180) / 30
}

#[tokio::test]
async fn timeline_segments_export_end_to_end() {
    let s = session_with_gapped_clips();
    let out_dir = tempfile::tempdir().unwrap();
    let output = Arc::new(DirectoryOutputStore::new(out_dir.path()));

    let mut pipeline = ExportPipeline::new(
        Arc::new(NullTranscoder::new()),
        media_store(),
        output.clone(),
    );

    let id = pipeline
        .run(s.segments(), FrameRate::FPS_30, ExportSettings::hd_1080())
        .await
        .unwrap();

    // Segments arrive in timeline order regardless of import order
    let artifact = std::fs::read(output.artifact_path(&id)).unwrap();
    assert_eq!(artifact, b"AABBCC");
    assert_eq!(pipeline.poll_progress().unwrap().phase, ExportPhase::Complete);
}

#[test]
fn trimmed_and_split_clips_export_their_source_windows() {
    let mut s = session_with_gapped_clips();
    // Trim the long clip down and split it: still only covered ranges export
    let long = s.timeline_clips()[2].id;
    s.trim_clip_end(long, 120);
    s.split_clip(long, 150);

    let segments = s.segments();
    assert_eq!(segments.len(), 4);
    let planned = planned_duration_secs(&segments, FrameRate::FPS_30);
    assert_eq!(planned, 6.0); // 30 + 30 + 120 source frames remain

    // Source windows of the split halves rejoin exactly
    assert_eq!(segments[2].source_out, segments[3].source_in);
}

#[tokio::test]
async fn missing_media_surfaces_transport_error() {
    let s = session_with_gapped_clips();
    let out_dir = tempfile::tempdir().unwrap();
    let store = MemoryMediaStore::new();
    store.insert("media-a", b"AA".to_vec(), 30); // b and c missing

    let mut pipeline = ExportPipeline::new(
        Arc::new(NullTranscoder::new()),
        Arc::new(store),
        Arc::new(DirectoryOutputStore::new(out_dir.path())),
    );

    let result = pipeline
        .run(s.segments(), FrameRate::FPS_30, ExportSettings::hd_1080())
        .await;

    assert!(matches!(result, Err(CutlineError::Transport(_))));
    assert_eq!(pipeline.poll_progress().unwrap().phase, ExportPhase::Error);
    assert!(std::fs::read_dir(out_dir.path()).unwrap().next().is_none());
    // The timeline itself is untouched by the failed export
    assert_eq!(s.timeline_clips().len(), 3);
}
