use campath::{
    CameraPathSession, CameraPose, PathEvent, PlaybackState, PoseProvider, Vec3,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Stand-in for the hosting application's camera
struct FixedCamera {
    pose: CameraPose,
    time_ms: i64,
}

impl FixedCamera {
    fn at(x: f64, time_ms: i64) -> Self {
        Self {
            pose: CameraPose::new(
                Vec3::new(x, 0.0, 0.0),
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(0.0, 1.0, 0.0),
            ),
            time_ms,
        }
    }
}

impl PoseProvider for FixedCamera {
    fn position(&self) -> Vec3 {
        self.pose.position
    }
    fn direction(&self) -> Vec3 {
        self.pose.direction
    }
    fn up(&self) -> Vec3 {
        self.pose.up
    }
    fn scene_time_ms(&self) -> i64 {
        self.time_ms
    }
}

/// Session with two keyframes one second apart, at 10 fps
fn two_keyframe_session() -> CameraPathSession {
    let mut session = CameraPathSession::new(10.0);
    session
        .add_keyframe(&FixedCamera::at(0.0, 0), None, 0.0)
        .unwrap();
    session
        .add_keyframe(&FixedCamera::at(10.0, 1_000), None, 1.0)
        .unwrap();
    session
}

#[test]
fn test_add_keyframe_captures_provider_pose() {
    let session = {
        let mut s = CameraPathSession::new(10.0);
        s.add_keyframe(&FixedCamera::at(7.0, 42), Some("start"), 0.0)
            .unwrap();
        s
    };
    let kf = session.store().at(0).unwrap();
    assert_eq!(kf.name, "start");
    assert_eq!(kf.position.x, 7.0);
    assert_eq!(kf.time, 42);
    assert_eq!(kf.seconds, 0.0);
}

#[test]
fn test_playback_lifecycle() {
    let mut session = two_keyframe_session();
    assert!(session.is_idle());

    assert!(session.play());
    assert_eq!(session.transport().state(), PlaybackState::Playing);
    assert_eq!(session.trajectory().len(), 10);

    // Ticks advance one frame each; the transport stays on the last
    // frame until the tick after reaching it.
    for expected in 1..10 {
        match session.tick() {
            Some(frame) => assert_eq!(frame, expected),
            None => {
                assert_eq!(expected, 10);
            }
        }
    }
    assert_eq!(session.current_frame(), 9);
    assert_eq!(session.transport().state(), PlaybackState::Playing);

    assert!(session.tick().is_none());
    assert_eq!(session.transport().state(), PlaybackState::Stopped);
    assert_eq!(session.current_frame(), 9);
}

#[test]
fn test_pause_resume_and_restart() {
    let mut session = two_keyframe_session();
    session.play();
    session.tick();
    session.tick();

    assert!(session.pause());
    assert_eq!(session.transport().state(), PlaybackState::Paused);
    assert!(session.tick().is_none());
    assert_eq!(session.current_frame(), 2);

    assert!(session.play());
    assert_eq!(session.transport().state(), PlaybackState::Playing);

    // Stopped on the last frame, play restarts from the top.
    session.skip_to_end();
    assert_eq!(session.current_frame(), 9);
    assert!(session.play());
    assert_eq!(session.current_frame(), 0);
    assert_eq!(session.transport().state(), PlaybackState::Playing);
}

#[test]
fn test_events_fire_on_edit_and_transport() {
    let mut session = CameraPathSession::new(10.0);
    let log: Rc<RefCell<Vec<PathEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let sub = session.subscribe(move |e| sink.borrow_mut().push(*e));

    session
        .add_keyframe(&FixedCamera::at(0.0, 0), None, 0.0)
        .unwrap();
    session
        .add_keyframe(&FixedCamera::at(10.0, 1_000), None, 1.0)
        .unwrap();
    assert_eq!(
        log.borrow().as_slice(),
        &[PathEvent::KeyframesChanged, PathEvent::KeyframesChanged]
    );

    log.borrow_mut().clear();
    session.play();
    assert!(log.borrow().contains(&PathEvent::PlaybackStateChanged {
        state: PlaybackState::Playing
    }));

    log.borrow_mut().clear();
    session.tick();
    assert_eq!(
        log.borrow().as_slice(),
        &[PathEvent::FrameChanged { frame: 1 }]
    );

    log.borrow_mut().clear();
    assert!(session.unsubscribe(sub));
    session.tick();
    assert!(log.borrow().is_empty());
}

#[test]
fn test_edit_while_playing_stops_at_remapped_frame() {
    let mut session = two_keyframe_session();
    session.play();
    for _ in 0..5 {
        session.tick();
    }
    assert_eq!(session.current_frame(), 5);

    // Doubling the segment duration doubles the frame count; the playing
    // transport is stopped at the proportionally equivalent frame.
    let id = session.store().at(1).unwrap().id;
    session.set_keyframe_seconds(id, 2.0).unwrap();

    assert!(session.tick().is_none());
    assert_eq!(session.transport().state(), PlaybackState::Stopped);
    assert_eq!(session.trajectory().len(), 20);
    // Frame 5 of 10 maps proportionally: round(5 * 19 / 9) = 11.
    assert_eq!(session.current_frame(), 11);
}

#[test]
fn test_removing_down_to_one_keyframe_goes_idle() {
    let mut session = two_keyframe_session();
    session.play();
    session.tick();

    let id = session.store().at(1).unwrap().id;
    session.remove_keyframe(id).unwrap();

    assert!(session.trajectory().is_empty());
    assert!(session.is_idle());
    assert_eq!(session.current_frame(), 0);
}

#[test]
fn test_jump_to_keyframe() {
    let mut session = two_keyframe_session();
    session
        .add_keyframe(&FixedCamera::at(30.0, 3_000), None, 2.0)
        .unwrap();

    assert!(session.jump_to_keyframe(1));
    assert_eq!(session.current_frame(), 10);
    assert_eq!(session.transport().state(), PlaybackState::Stopped);

    // The final keyframe's frame is one past the end; seek clamps.
    assert!(session.jump_to_keyframe(2));
    assert_eq!(session.current_frame(), 29);

    assert!(!session.jump_to_keyframe(7));
}

#[test]
fn test_current_sample_follows_playhead() {
    let mut session = two_keyframe_session();
    session.seek(5);
    let sample = session.current_sample().unwrap();
    assert_eq!(sample.frame, 5);
    assert!(sample.position.x > 0.0 && sample.position.x < 10.0);
}

#[test]
fn test_set_frame_rate_regenerates() {
    let mut session = two_keyframe_session();
    assert_eq!(session.trajectory().len(), 10);

    session.set_frame_rate(60.0);
    assert_eq!(session.trajectory().len(), 60);
    assert_eq!(session.frame_rate(), 60.0);
}

#[test]
fn test_check_timings_flags_sub_frame_gaps() {
    let mut session = CameraPathSession::new(10.0);
    session
        .add_keyframe(&FixedCamera::at(0.0, 0), None, 0.0)
        .unwrap();
    session
        .add_keyframe(&FixedCamera::at(1.0, 50), None, 0.05)
        .unwrap();
    session
        .add_keyframe(&FixedCamera::at(10.0, 1_050), None, 1.0)
        .unwrap();

    // 0.05s is shorter than a 10 fps frame period.
    assert_eq!(session.check_timings(), vec![1]);
    session.set_frame_rate(60.0);
    assert!(session.check_timings().is_empty());
}
