//! End-to-end tracking scenario: synthetic frames through the full
//! detection-to-actuation loop, observed via the snapshot channel.

use opencv::core::{self, Mat, Point, Rect, Scalar};
use opencv::imgproc;

use huetrack::control::command::Direction;
use huetrack::io::actuator::{ActuatorCall, RecordingActuator};
use huetrack::io::source::ReplaySource;
use huetrack::system::flight::{FlightCommand, FlightSystem};
use huetrack::tracking::tracker::{Tracker, TrackerConfig};

/// A dark 640x480 frame with a green blob of the given geometry.
fn frame_with_blob(rect: Rect) -> Mat {
    let mut frame = Mat::new_rows_cols_with_default(
        480,
        640,
        core::CV_8UC3,
        Scalar::new(30.0, 30.0, 30.0, 0.0),
    )
    .unwrap();
    imgproc::rectangle(
        &mut frame,
        rect,
        Scalar::new(0.0, 255.0, 0.0, 0.0),
        imgproc::FILLED,
        imgproc::LINE_8,
        0,
    )
    .unwrap();
    frame
}

#[test]
fn test_off_center_blob_drives_right_and_up() {
    // Green blob of area 500 centered at (500, 100): offset (180, 140),
    // both axes outside the 40 px tolerance.
    let frames = vec![frame_with_blob(Rect::new(488, 90, 25, 20)); 3];

    let recorder = RecordingActuator::new();
    let (tx, rx) = crossbeam_channel::bounded(16);
    let mut system = FlightSystem::new(
        Box::new(ReplaySource::new(frames)),
        Box::new(recorder.clone()),
        Tracker::new(TrackerConfig::default()),
    )
    .with_snapshots(tx);

    system.handle(FlightCommand::Takeoff).unwrap();
    system.handle(FlightCommand::Start).unwrap();
    system.handle(FlightCommand::Exit).unwrap();

    // Every processed frame produced a snapshot.
    let snapshots: Vec<_> = rx.iter().collect();
    assert_eq!(snapshots.len(), 3);

    let first = &snapshots[0].report;
    let det = first.detection.unwrap();
    assert_eq!(det.center, Point::new(500, 100));
    assert_eq!(det.area, 500);

    let off = first.offset.unwrap();
    assert_eq!((off.dx, off.dy), (180, 140));

    // Both commanded corrections point right/up with positive magnitude.
    let sends: Vec<_> = recorder
        .calls()
        .iter()
        .filter_map(|c| match c {
            ActuatorCall::Send(cmd) => Some(*cmd),
            _ => None,
        })
        .collect();
    assert!(!sends.is_empty());
    let headings: Vec<_> = sends.iter().map(|c| c.heading()).collect();
    assert!(headings.contains(&"right") && headings.contains(&"up"));
    assert!(sends.iter().all(|c| c.magnitude > 0));
    assert!(sends.iter().all(|c| c.direction == Direction::Positive));
}

#[test]
fn test_centered_blob_sends_nothing() {
    // Blob dead on the frame center: inside the dead-zone on both axes.
    let frames = vec![frame_with_blob(Rect::new(308, 230, 25, 20)); 2];

    let recorder = RecordingActuator::new();
    let mut system = FlightSystem::new(
        Box::new(ReplaySource::new(frames)),
        Box::new(recorder.clone()),
        Tracker::new(TrackerConfig::default()),
    );

    system.handle(FlightCommand::Takeoff).unwrap();
    system.handle(FlightCommand::Start).unwrap();

    let sends = recorder
        .calls()
        .iter()
        .filter(|c| matches!(c, ActuatorCall::Send(_)))
        .count();
    assert_eq!(sends, 0);
}

#[test]
fn test_blobless_stream_sends_nothing_and_lands() {
    let frames = vec![
        Mat::new_rows_cols_with_default(480, 640, core::CV_8UC3, Scalar::default()).unwrap();
        4
    ];

    let recorder = RecordingActuator::new();
    let mut system = FlightSystem::new(
        Box::new(ReplaySource::new(frames)),
        Box::new(recorder.clone()),
        Tracker::new(TrackerConfig::default()),
    );

    system.handle(FlightCommand::Takeoff).unwrap();
    system.handle(FlightCommand::Start).unwrap();

    // No target ever appeared: takeoff, then the end-of-stream landing.
    assert_eq!(recorder.calls(), vec![ActuatorCall::Takeoff, ActuatorCall::Land]);
}
