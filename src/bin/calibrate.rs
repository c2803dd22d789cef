//! Interactive HSV threshold calibrator.
//!
//! Opens a camera with sliders for the six HSV bounds, shows the original
//! frame, the resulting mask, and the filtered image. `s` saves the
//! current range as JSON (the same file the tracker loads), `q` quits.
//! Slider positions are polled into an explicit `HsvRange` every frame;
//! there is no process-global threshold state.

use anyhow::{Context, Result};
use opencv::core::{self, Mat};
use opencv::highgui;

use huetrack::io::source::{FrameSource, VideoSource};
use huetrack::vision::mask;
use huetrack::vision::range::{HsvRange, GREEN, H_MAX, SV_MAX};

const TRACKBAR_WINDOW: &str = "Thresholds";
const FRAME_WINDOW: &str = "Frame";
const MASK_WINDOW: &str = "Mask";
const FILTERED_WINDOW: &str = "Filtered";

const BARS: [(&str, i32); 6] = [
    ("H low", H_MAX),
    ("S low", SV_MAX),
    ("V low", SV_MAX),
    ("H high", H_MAX),
    ("S high", SV_MAX),
    ("V high", SV_MAX),
];

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let index: i32 = args
        .next()
        .as_deref()
        .unwrap_or("0")
        .parse()
        .context("camera index must be an integer")?;
    let out_path = args.next().unwrap_or_else(|| "hsv_config.json".to_owned());

    let mut source = VideoSource::open_index(index)?;

    highgui::named_window(TRACKBAR_WINDOW, highgui::WINDOW_NORMAL)?;
    let initial = [
        GREEN.lower[0],
        GREEN.lower[1],
        GREEN.lower[2],
        GREEN.upper[0],
        GREEN.upper[1],
        GREEN.upper[2],
    ];
    for (&(name, max), start) in BARS.iter().zip(initial) {
        highgui::create_trackbar(name, TRACKBAR_WINDOW, None, max, None)?;
        highgui::set_trackbar_pos(name, TRACKBAR_WINDOW, start)?;
    }

    loop {
        let frame = match source.next_frame() {
            Some(frame) => frame,
            None => break,
        };

        let range = read_range()?;
        let mask = mask::mask(&frame, &range)?;

        let mut filtered = Mat::default();
        core::bitwise_and(&frame, &frame, &mut filtered, &mask)?;

        highgui::imshow(FRAME_WINDOW, &frame)?;
        highgui::imshow(MASK_WINDOW, &mask)?;
        highgui::imshow(FILTERED_WINDOW, &filtered)?;

        match highgui::wait_key(1)? {
            k if k == 's' as i32 => {
                range.save(&out_path)?;
                println!("saved thresholds to {out_path}");
            }
            k if k == 'q' as i32 => break,
            _ => {}
        }
    }

    highgui::destroy_all_windows()?;
    Ok(())
}

/// Read the current slider positions as a range. While the user drags a
/// lower bound past its upper bound the range is simply empty; validation
/// only applies when loading a saved file.
fn read_range() -> Result<HsvRange> {
    let mut v = [0i32; 6];
    for (slot, &(name, _)) in v.iter_mut().zip(BARS.iter()) {
        *slot = highgui::get_trackbar_pos(name, TRACKBAR_WINDOW)?;
    }
    Ok(HsvRange {
        lower: [v[0], v[1], v[2]],
        upper: [v[3], v[4], v[5]],
    })
}
