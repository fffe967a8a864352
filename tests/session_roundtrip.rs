//! Saving a viewer to a session file and loading it into a fresh one.

use std::path::PathBuf;

use flatmol::color::{ColorDirective, ColorTarget};
use flatmol::session::SessionDocument;
use flatmol::trajectory::{FramePayload, PositionKind};
use flatmol::Viewer;
use serde_json::json;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("flatmol-{}-{name}.json", std::process::id()))
}

fn payload(shift: f32) -> FramePayload {
    FramePayload {
        coordinates: vec![
            [0.0, shift, 0.0],
            [3.8, 0.0, shift],
            [7.6, shift, 0.0],
            [9.0, 1.0, 0.0],
        ],
        confidences: Some(vec![70.0, 80.0, 90.0, 60.0]),
        chain_labels: Some(vec!["A".into(), "A".into(), "A".into(), "L".into()]),
        categories: Some(vec![
            PositionKind::Backbone,
            PositionKind::Backbone,
            PositionKind::Backbone,
            PositionKind::Ligand,
        ]),
        scatter_point: Some(json!([shift, 2.0 * shift])),
        ..FramePayload::default()
    }
}

fn populated() -> Viewer {
    let mut viewer = Viewer::default();
    for k in 0..3 {
        let _ = viewer.append_frame("traj", payload(k as f32 * 0.25), true).unwrap();
    }
    viewer
        .set_color("traj", ColorDirective::parse("plddt").unwrap(), &ColorTarget::default())
        .unwrap();
    viewer.set_contacts("traj", &[json!([0, 2, 1.5, "orange"])]).unwrap();
    let _ = viewer.append_frame("other", payload(1.0), true).unwrap();
    viewer.select_object("traj").unwrap();
    viewer
}

#[test]
fn session_file_restores_objects_and_metadata() {
    let path = temp_path("roundtrip");
    let original = populated();
    original.save_session(&path).unwrap();

    let mut restored = Viewer::default();
    restored.load_session(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(restored.current_object_name(), Some("traj"));
    assert_eq!(restored.store().len(), 2);

    let (a, b) = (
        original.store().object("traj").unwrap(),
        restored.store().object("traj").unwrap(),
    );
    assert_eq!(b.frame_count(), a.frame_count());
    assert_eq!(b.color(), a.color());
    assert_eq!(b.contacts().len(), 1);
    assert!(b.rotation().abs_diff_eq(a.rotation(), 1e-5));
    for (fa, fb) in a.frames().iter().zip(b.frames()) {
        for (pa, pb) in fa.coords().iter().zip(fb.coords()) {
            assert!(pa.abs_diff_eq(*pb, 0.01));
        }
        assert_eq!(fb.chains(), fa.chains());
        assert_eq!(fb.kinds(), fa.kinds());
    }
    assert_eq!(restored.segments().len(), original.segments().len());
}

#[test]
fn shared_per_frame_fields_are_stored_once() {
    let document = SessionDocument::capture(&populated());
    let text = document.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    let traj = &value["objects"][0];
    assert_eq!(traj["name"], "traj");
    assert!(traj["chains"].is_array());
    assert!(traj["frames"][0].get("chains").is_none());
    assert!(traj["frames"][0]["scatter"].is_array());
}

#[test]
fn malformed_session_is_an_error() {
    let path = temp_path("malformed");
    std::fs::write(&path, "{ not json").unwrap();
    let mut viewer = Viewer::default();
    assert!(viewer.load_session(&path).is_err());
    let _ = std::fs::remove_file(&path);
    assert!(viewer.store().is_empty());
}
