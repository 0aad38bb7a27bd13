use std::{fmt, ops::Range, path::PathBuf, str::FromStr};

use plotters::style::{RGBColor, BLUE, RED};
use serde::{Deserialize, Serialize};

/// Directory the companion simulator writes its `positions_NNN.csv` snapshots to
pub const DEFAULT_INPUT_DIR: &str = "./out";
pub const DEFAULT_OUTPUT_PATH: &str = "movie.gif";
pub const DEFAULT_FPS: u32 = 60;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    pub ordering: FrameOrdering,
    /// frames per second of the written animation
    pub fps: u32,
    pub plot: PlotOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            ordering: FrameOrdering::NumericSuffix,
            fps: DEFAULT_FPS,
            plot: Default::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// canvas width in pixels
    pub width: u32,
    /// canvas height in pixels
    pub height: u32,
    pub window: ViewingWindow,
    pub boundary: BoundaryOverlay,
    /// radius of a scatter point in pixels
    pub point_size: u32,
    pub point_colour: RGBColor,
    pub axis_labels: AxisLabels,
    /// TrueType font for axis text, searched for among common system fonts when unset
    pub font_path: Option<PathBuf>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            width: 640,
            height: 480,
            window: Default::default(),
            boundary: Default::default(),
            point_size: 2,
            point_colour: BLUE,
            axis_labels: Default::default(),
            font_path: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
}

impl Default for AxisLabels {
    fn default() -> Self {
        AxisLabels {
            x: "X [unit]".to_owned(),
            y: "Y [unit]".to_owned(),
        }
    }
}

/// Fixed axis limits of the plot, independent of the data range
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ViewingWindow {
    /// lowest x value
    pub x_min: f64,
    /// highest x value
    pub x_max: f64,
    /// lowest y value
    pub y_min: f64,
    /// highest y value
    pub y_max: f64,
}

impl ViewingWindow {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        ViewingWindow {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn x_range(&self) -> Range<f64> {
        self.x_min..self.x_max
    }

    pub fn y_range(&self) -> Range<f64> {
        self.y_min..self.y_max
    }

    /// whether `(x, y)` lies inside the window, edges included
    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }
}

impl Default for ViewingWindow {
    fn default() -> Self {
        ViewingWindow::new(-0.25, 1.25, -0.25, 1.25)
    }
}

/// Static reference rectangle drawn on every frame
#[derive(Debug, Clone, Copy)]
pub struct BoundaryOverlay {
    /// lower left corner
    pub origin: (f64, f64),
    pub width: f64,
    pub height: f64,
    pub colour: RGBColor,
    pub stroke_width: u32,
}

impl BoundaryOverlay {
    /// lower left and upper right corners
    pub fn corners(&self) -> [(f64, f64); 2] {
        let (x, y) = self.origin;
        [(x, y), (x + self.width, y + self.height)]
    }
}

impl Default for BoundaryOverlay {
    fn default() -> Self {
        BoundaryOverlay {
            origin: (0., 0.),
            width: 1.,
            height: 1.,
            colour: RED,
            stroke_width: 1,
        }
    }
}

/// How frame files found in the input directory are put into temporal order.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameOrdering {
    /// plain file name sort, `f10.csv` lands before `f2.csv` unless names are zero-padded
    Lexicographic,
    /// sort by the integer every file stem ends with, e.g. `positions_7.csv` -> 7
    NumericSuffix,
}

impl FromStr for FrameOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lexicographic" => Ok(FrameOrdering::Lexicographic),
            "numeric-suffix" => Ok(FrameOrdering::NumericSuffix),
            other => Err(format!(
                "unknown frame ordering '{other}', expected 'lexicographic' or 'numeric-suffix'"
            )),
        }
    }
}

impl fmt::Display for FrameOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameOrdering::Lexicographic => write!(f, "lexicographic"),
            FrameOrdering::NumericSuffix => write!(f, "numeric-suffix"),
        }
    }
}
