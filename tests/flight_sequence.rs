//! State-machine sequences exercised end to end against recording doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use opencv::core::Mat;

use huetrack::io::actuator::{ActuatorCall, RecordingActuator};
use huetrack::io::source::{FrameSource, ReplaySource};
use huetrack::system::flight::{FlightCommand, FlightSystem};
use huetrack::system::state::FlightState;
use huetrack::tracking::tracker::{Tracker, TrackerConfig};

/// Wraps a source and counts how many frames were actually pulled.
struct CountingSource {
    inner: ReplaySource,
    pulled: Arc<AtomicUsize>,
}

impl FrameSource for CountingSource {
    fn next_frame(&mut self) -> Option<Mat> {
        let frame = self.inner.next_frame();
        if frame.is_some() {
            self.pulled.fetch_add(1, Ordering::SeqCst);
        }
        frame
    }
}

fn counting_system(n_frames: usize) -> (FlightSystem, RecordingActuator, Arc<AtomicUsize>) {
    let recorder = RecordingActuator::new();
    let pulled = Arc::new(AtomicUsize::new(0));
    let source = CountingSource {
        inner: ReplaySource::new(vec![Mat::default(); n_frames]),
        pulled: pulled.clone(),
    };
    let system = FlightSystem::new(
        Box::new(source),
        Box::new(recorder.clone()),
        Tracker::new(TrackerConfig::default()),
    );
    (system, recorder, pulled)
}

#[test]
fn test_canonical_sequence_lands_exactly_once() {
    let (mut system, recorder, pulled) = counting_system(3);

    // start → takeoff → start → land → exit
    assert!(system.handle(FlightCommand::Start).unwrap());
    assert_eq!(pulled.load(Ordering::SeqCst), 0, "rejected start must not run the loop");

    assert!(system.handle(FlightCommand::Takeoff).unwrap());
    assert!(system.handle(FlightCommand::Start).unwrap());
    assert!(system.handle(FlightCommand::Land).unwrap());
    assert!(!system.handle(FlightCommand::Exit).unwrap());

    let calls = recorder.calls();
    let lands = calls.iter().filter(|c| **c == ActuatorCall::Land).count();
    assert_eq!(lands, 1, "exactly one land before teardown, got {calls:?}");

    // Teardown order: the landing precedes releasing the stream.
    let land_pos = calls.iter().position(|c| *c == ActuatorCall::Land).unwrap();
    let stream_off_pos = calls.iter().position(|c| *c == ActuatorCall::StreamOff).unwrap();
    assert!(land_pos < stream_off_pos);

    // The second start drained the whole stream.
    assert_eq!(pulled.load(Ordering::SeqCst), 3);
    assert_eq!(system.state(), FlightState::Idle);
}

#[test]
fn test_exit_while_airborne_lands_during_teardown() {
    let (mut system, recorder, _) = counting_system(0);

    system.handle(FlightCommand::Takeoff).unwrap();
    assert!(!system.handle(FlightCommand::Exit).unwrap());

    assert_eq!(
        recorder.calls(),
        vec![ActuatorCall::Takeoff, ActuatorCall::Land, ActuatorCall::StreamOff]
    );
}

#[test]
fn test_exit_from_idle_skips_landing() {
    let (mut system, recorder, _) = counting_system(0);

    assert!(!system.handle(FlightCommand::Exit).unwrap());
    assert_eq!(recorder.calls(), vec![ActuatorCall::StreamOff]);
}

#[test]
fn test_drop_is_a_teardown_safety_net() {
    let (system, recorder, _) = counting_system(0);
    drop(system);
    assert_eq!(recorder.calls(), vec![ActuatorCall::StreamOff]);
}

#[test]
fn test_commands_after_exit_are_rejected() {
    let (mut system, recorder, pulled) = counting_system(2);

    assert!(!system.handle(FlightCommand::Exit).unwrap());
    assert!(!system.handle(FlightCommand::Takeoff).unwrap());
    assert!(!system.handle(FlightCommand::Start).unwrap());

    assert_eq!(pulled.load(Ordering::SeqCst), 0);
    assert_eq!(recorder.calls(), vec![ActuatorCall::StreamOff]);
}
