use std::{mem, path::PathBuf};

use log::{debug, info};
use plotters::prelude::{BitMapBackend, IntoDrawingArea};

use crate::{error::RenderError, plot::PlotSurface, trajectory::Trajectory};

/// Where rendered frames go. Frames are handed over in order, then `finish`
/// is called exactly once to serialize them.
pub trait MediaWriter {
    fn write_frame(&mut self, surface: &PlotSurface) -> Result<(), RenderError>;
    fn finish(&mut self) -> Result<(), RenderError>;
}

/// Steps a plot surface through every frame of a trajectory
pub struct Animation<'a> {
    trajectory: &'a Trajectory,
    surface: PlotSurface,
}

impl<'a> Animation<'a> {
    pub fn new(trajectory: &'a Trajectory, surface: PlotSurface) -> Self {
        Animation {
            trajectory,
            surface,
        }
    }

    /// Replaces the scatter layer's points with frame `frame_index`'s positions
    pub fn update(&mut self, frame_index: usize) -> Result<&PlotSurface, RenderError> {
        self.surface
            .scatter_mut()
            .set_offsets(self.trajectory.frame(frame_index))?;

        Ok(&self.surface)
    }

    /// Renders frames `0..frame_count`, frame 0 included even though the
    /// surface already shows it, then serializes through `writer`.
    ///
    /// Returns the number of frames written.
    pub fn save<W: MediaWriter>(&mut self, writer: &mut W) -> Result<usize, RenderError> {
        let frame_count = self.trajectory.frame_count();

        for frame_index in 0..frame_count {
            let surface = self.update(frame_index)?;
            writer.write_frame(surface)?;
        }

        writer.finish()?;

        Ok(frame_count)
    }

    pub fn surface(&self) -> &PlotSurface {
        &self.surface
    }
}

/// Writes an animated GIF.
///
/// Frames are kept in memory until [`MediaWriter::finish`], which creates
/// (or overwrites) the file, draws every frame into it and closes it.
pub struct GifWriter {
    path: PathBuf,
    fps: u32,
    frames: Vec<PlotSurface>,
}

impl GifWriter {
    pub fn new(path: impl Into<PathBuf>, fps: u32) -> Result<Self, RenderError> {
        if fps == 0 {
            return Err(RenderError::InvalidFrameRate);
        }

        Ok(GifWriter {
            path: path.into(),
            fps,
            frames: Vec::new(),
        })
    }

    /// Per frame delay handed to the encoder, GIF stores it in hundredths
    /// of a second so high frame rates get rounded
    pub fn frame_delay_ms(&self) -> u32 {
        1000 / self.fps
    }

    pub fn buffered_frames(&self) -> usize {
        self.frames.len()
    }
}

impl MediaWriter for GifWriter {
    fn write_frame(&mut self, surface: &PlotSurface) -> Result<(), RenderError> {
        self.frames.push(surface.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        let frames = mem::take(&mut self.frames);
        let first = frames.first().ok_or(RenderError::NoFrames)?;

        info!(
            "writing {} frames to {} at {} fps",
            frames.len(),
            self.path.display(),
            self.fps
        );

        let backend = BitMapBackend::gif(&self.path, first.dimensions(), self.frame_delay_ms())
            .map_err(|e| RenderError::Backend(e.to_string()))?;
        let root = backend.into_drawing_area();

        for (i, frame) in frames.iter().enumerate() {
            frame.draw(&root)?;
            root.present()
                .map_err(|e| RenderError::Backend(e.to_string()))?;
            debug!("encoded frame {i}");
        }

        Ok(())
    }
}
