use campath::{persist, CameraPose, Keyframe, KeyframeStore, PathError, Trajectory, Vec3};
use std::io::Cursor;

fn pose_at(x: f64) -> CameraPose {
    CameraPose::new(
        Vec3::new(x, 2.0, -3.5),
        Vec3::new(0.0, 0.0, -1.0),
        Vec3::new(0.0, 1.0, 0.0),
    )
}

fn sample_keyframes() -> Vec<Keyframe> {
    let mut b = Keyframe::new("orbit in", pose_at(10.0), 2_000, 1.5);
    b.seam = true;
    vec![Keyframe::new("start", pose_at(0.0), 0, 0.0), b]
}

#[test]
fn test_keyframes_round_trip() {
    let original = sample_keyframes();
    let mut buf = Vec::new();
    persist::write_keyframes(&mut buf, &original).unwrap();

    let loaded = persist::read_keyframes(Cursor::new(buf)).unwrap();
    assert_eq!(loaded.len(), 2);
    for (a, b) in original.iter().zip(&loaded) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.name, b.name);
        assert_eq!(a.position, b.position);
        assert_eq!(a.direction, b.direction);
        assert_eq!(a.up, b.up);
        assert_eq!(a.time, b.time);
        assert_eq!(a.seconds, b.seconds);
        assert_eq!(a.seam, b.seam);
    }
}

#[test]
fn test_malformed_input_fails_without_partial_data() {
    let err = persist::read_keyframes(Cursor::new(b"not json".to_vec())).unwrap_err();
    assert!(matches!(err, PathError::Format { .. }));
    assert_eq!(err.category(), "format");

    // Structurally valid JSON that is not a keyframe list.
    let err = persist::read_keyframes(Cursor::new(br#"{"frames": 3}"#.to_vec())).unwrap_err();
    assert!(matches!(err, PathError::Format { .. }));
}

#[test]
fn test_negative_seconds_rejected_on_load() {
    let mut kfs = sample_keyframes();
    kfs[1].seconds = -2.0;
    let mut buf = Vec::new();
    persist::write_keyframes(&mut buf, &kfs).unwrap();

    let err = persist::read_keyframes(Cursor::new(buf)).unwrap_err();
    assert!(matches!(err, PathError::Format { .. }));
}

#[test]
fn test_camera_script_line_format() {
    let mut store = KeyframeStore::new();
    store.append(None, 0.0, pose_at(0.0), 1_000).unwrap();
    store.append(None, 1.0, pose_at(10.0), 2_000).unwrap();
    let path = Trajectory::generate(&store, 10.0);

    let mut buf = Vec::new();
    persist::write_camera_script(&mut buf, &path).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 10);

    // time_ms px py pz dx dy dz ux uy uz
    let fields: Vec<&str> = lines[0].split_whitespace().collect();
    assert_eq!(fields.len(), 10);
    assert_eq!(fields[0], "1000");
    assert_eq!(fields[1].parse::<f64>().unwrap(), 0.0);
    assert_eq!(fields[2].parse::<f64>().unwrap(), 2.0);
    assert_eq!(fields[3].parse::<f64>().unwrap(), -3.5);
    assert_eq!(fields[6].parse::<f64>().unwrap(), -1.0);
    assert_eq!(fields[8].parse::<f64>().unwrap(), 1.0);

    // Scene times advance monotonically along the export.
    let times: Vec<i64> = lines
        .iter()
        .map(|l| l.split_whitespace().next().unwrap().parse().unwrap())
        .collect();
    assert!(times.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn test_file_save_load_round_trip() {
    let path = std::env::temp_dir().join(format!("campath-test-{}.gkf", std::process::id()));
    let original = sample_keyframes();

    persist::save_keyframes(&path, &original).unwrap();
    let loaded = persist::load_keyframes(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, original);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let err = persist::load_keyframes("/nonexistent/campath.gkf").unwrap_err();
    assert_eq!(err.category(), "io");
}
