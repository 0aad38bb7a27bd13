use ndarray::ArrayView2;
use plotters::{
    coord::Shift,
    prelude::{
        ChartBuilder, Circle, Color, DrawingArea, DrawingAreaErrorKind, DrawingBackend, RGBColor,
        Rectangle, WHITE,
    },
};

use crate::{
    error::{PlotError, RenderError},
    options::{AxisLabels, BoundaryOverlay, PlotOptions, ViewingWindow},
};

const MARGIN: u32 = 20;
/// room for tick numbers and the axis description, in pixels
const LABEL_AREA_SIZE: u32 = 45;
const FRAME_COLOUR: RGBColor = RGBColor(60, 60, 60);

/// The visual element holding the current entity positions
#[derive(Debug, Clone)]
pub struct ScatterLayer {
    points: Vec<(f64, f64)>,
    /// point radius in pixels
    size: u32,
    colour: RGBColor,
}

impl ScatterLayer {
    pub fn new(size: u32, colour: RGBColor) -> Self {
        ScatterLayer {
            points: Vec::new(),
            size,
            colour,
        }
    }

    /// Replaces the displayed points with the first two columns of `frame`
    pub fn set_offsets(&mut self, frame: ArrayView2<f64>) -> Result<(), PlotError> {
        if frame.ncols() < 2 {
            return Err(PlotError::TooFewColumns {
                found: frame.ncols(),
            });
        }

        self.points.clear();
        self.points
            .extend(frame.outer_iter().map(|row| (row[0], row[1])));

        Ok(())
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A single 2D plot: fixed viewing window, static boundary overlay and one scatter layer
#[derive(Debug, Clone)]
pub struct PlotSurface {
    width: u32,
    height: u32,
    window: ViewingWindow,
    boundary: BoundaryOverlay,
    scatter: ScatterLayer,
    /// axis text, only drawn once a font is registered
    labels: Option<AxisLabels>,
}

impl PlotSurface {
    /// Builds the surface with its scatter layer placed at `frame`'s positions
    pub fn init(frame: ArrayView2<f64>, options: &PlotOptions) -> Result<Self, PlotError> {
        let mut scatter = ScatterLayer::new(options.point_size, options.point_colour);
        scatter.set_offsets(frame)?;

        Ok(PlotSurface {
            width: options.width,
            height: options.height,
            window: options.window,
            boundary: options.boundary,
            scatter,
            labels: None,
        })
    }

    /// Adds tick numbers and axis descriptions, needs a registered font to draw
    pub fn with_axis_labels(mut self, labels: AxisLabels) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn axis_labels(&self) -> Option<&AxisLabels> {
        self.labels.as_ref()
    }

    pub fn scatter(&self) -> &ScatterLayer {
        &self.scatter
    }

    pub fn scatter_mut(&mut self) -> &mut ScatterLayer {
        &mut self.scatter
    }

    pub fn window(&self) -> &ViewingWindow {
        &self.window
    }

    pub fn boundary(&self) -> &BoundaryOverlay {
        &self.boundary
    }

    /// canvas size in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Draws the whole surface onto `root`, clearing it first.
    ///
    /// Text is only drawn when the surface has axis labels. Points outside the viewing
    /// window are left out.
    pub fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(backend_error)?;

        let mut builder = ChartBuilder::on(root);
        builder.margin(MARGIN);
        if self.labels.is_some() {
            builder
                .x_label_area_size(LABEL_AREA_SIZE)
                .y_label_area_size(LABEL_AREA_SIZE);
        }
        let mut chart = builder
            .build_cartesian_2d(self.window.x_range(), self.window.y_range())
            .map_err(backend_error)?;

        let mut mesh = chart.configure_mesh();
        if let Some(labels) = &self.labels {
            mesh.x_desc(labels.x.as_str()).y_desc(labels.y.as_str());
        }
        mesh.draw().map_err(backend_error)?;

        let frame = [
            (self.window.x_min, self.window.y_min),
            (self.window.x_max, self.window.y_max),
        ];
        chart
            .draw_series(std::iter::once(Rectangle::new(
                frame,
                FRAME_COLOUR.stroke_width(1),
            )))
            .map_err(backend_error)?;

        chart
            .draw_series(std::iter::once(Rectangle::new(
                self.boundary.corners(),
                self.boundary.colour.stroke_width(self.boundary.stroke_width),
            )))
            .map_err(backend_error)?;

        // plotters pins out of range points to the plot edge instead of dropping them
        chart
            .draw_series(
                self.scatter
                    .points
                    .iter()
                    .filter(|&&p| self.window.contains(p))
                    .map(|&p| Circle::new(p, self.scatter.size, self.scatter.colour.filled())),
            )
            .map_err(backend_error)?;

        Ok(())
    }
}

fn backend_error<E>(err: DrawingAreaErrorKind<E>) -> RenderError
where
    E: std::error::Error + Send + Sync,
{
    RenderError::Backend(err.to_string())
}
