use std::io::{self, BufRead};

use anyhow::Result;
use tracing::warn;

use huetrack::io::actuator::{Actuator, RecordingActuator};
use huetrack::io::source::{FrameSource, VideoSource};
use huetrack::io::tello::{self, TelloActuator};
use huetrack::system::flight::{FlightCommand, FlightSystem};
use huetrack::tracking::tracker::{Tracker, TrackerConfig};
use huetrack::vision::range::{self, HsvRange};
use huetrack::viz::display;

/// UDP endpoint the vehicle publishes its video stream on.
const VIDEO_URL: &str = "udp://0.0.0.0:11111";

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let headless = args.iter().any(|a| a == "--headless");
    let mut positional = args.iter().filter(|a| !a.starts_with("--"));
    let target = positional.next().map(String::as_str).unwrap_or("tello");
    let range_arg = positional.next().map(String::as_str).unwrap_or("green");

    let range = load_range(range_arg);
    let (actuator, source) = open_target(target)?;

    let config = TrackerConfig {
        range,
        ..TrackerConfig::default()
    };
    let mut system = FlightSystem::new(source, actuator, Tracker::new(config));

    let display_handle = if headless {
        None
    } else {
        let (tx, rx) = crossbeam_channel::bounded(2);
        let shared = system.shared();
        system = system.with_snapshots(tx);
        Some(display::spawn(rx, shared))
    };

    println!("commands: takeoff | start | land | exit");
    println!("press 'q' in the tracking window to stop tracking");

    let stdin = io::stdin();
    let mut active = true;
    for line in stdin.lock().lines() {
        let line = line?;
        let cmd = match line.trim() {
            "" => continue,
            "takeoff" => FlightCommand::Takeoff,
            "start" => FlightCommand::Start,
            "land" => FlightCommand::Land,
            "exit" | "quit" => FlightCommand::Exit,
            other => {
                println!("unknown command `{other}`; expected takeoff | start | land | exit");
                continue;
            }
        };
        active = system.handle(cmd)?;
        if !active {
            break;
        }
    }
    if active {
        // stdin closed without an explicit exit; tear down anyway.
        system.handle(FlightCommand::Exit)?;
    }

    if let Some(handle) = display_handle {
        let _ = handle.join();
    }
    Ok(())
}

/// Build the actuator/source pair for the requested target.
///
/// `tello` flies the real vehicle. Anything else — a camera index, a file,
/// a stream URL — is a dry run: frames are processed normally but motion
/// commands are only recorded.
fn open_target(target: &str) -> Result<(Box<dyn Actuator>, Box<dyn FrameSource>)> {
    if target == "tello" {
        let mut actuator = TelloActuator::connect(tello::DEFAULT_ADDR)?;
        // The UDP capture can only open once the vehicle is streaming.
        actuator.stream_on()?;
        let source = VideoSource::open_url(VIDEO_URL)?;
        return Ok((Box::new(actuator), Box::new(source)));
    }

    let mut actuator = RecordingActuator::new();
    actuator.stream_on()?;
    let source = match target.parse::<i32>() {
        Ok(index) => VideoSource::open_index(index)?,
        Err(_) => VideoSource::open_url(target)?,
    };
    Ok((Box::new(actuator), Box::new(source)))
}

/// Resolve the range argument: a `.json` config path (with fallback to the
/// green preset on any problem) or a preset name.
fn load_range(arg: &str) -> HsvRange {
    if arg.ends_with(".json") {
        return HsvRange::load_or_default(arg);
    }
    match range::preset(arg) {
        Some(range) => range,
        None => {
            warn!("unknown preset `{arg}`, using green");
            range::GREEN
        }
    }
}
