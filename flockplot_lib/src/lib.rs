use std::path::PathBuf;

use animator::{Animation, GifWriter, MediaWriter};
use log::info;
use options::RenderOptions;
use plot::PlotSurface;

pub mod animator;
pub mod discovery;
pub mod error;
pub mod fonts;
pub mod options;
pub mod plot;
pub mod trajectory;

pub use error::{FlockplotError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub frame_count: usize,
    pub entity_count: usize,
    pub output_path: PathBuf,
}

/// Discovers the frame files, loads them into a trajectory, and animates it through `writer`.
pub fn plot_trajectory<W: MediaWriter>(
    options: &RenderOptions,
    writer: &mut W,
) -> Result<RenderSummary> {
    let files = discovery::frame_files(&options.input_dir, options.ordering)?;
    info!(
        "found {} frame files in {} ({} order)",
        files.len(),
        options.input_dir.display(),
        options.ordering
    );

    let trajectory = trajectory::load_trajectory(&files)?;
    let [frame_count, entity_count, coordinate_count] = trajectory.shape();
    info!("loaded {frame_count} frames of {entity_count} entities x {coordinate_count} coordinates");

    let mut surface = PlotSurface::init(trajectory.frame(0), &options.plot)?;
    if fonts::register_axis_font(options.plot.font_path.as_deref())? {
        surface = surface.with_axis_labels(options.plot.axis_labels.clone());
    }
    let frames_written = Animation::new(&trajectory, surface).save(writer)?;

    Ok(RenderSummary {
        frame_count: frames_written,
        entity_count,
        output_path: options.output_path.clone(),
    })
}

/// [`plot_trajectory`] into an animated GIF at `options.output_path`
pub fn render_gif(options: &RenderOptions) -> Result<RenderSummary> {
    let mut writer = GifWriter::new(&options.output_path, options.fps)?;
    plot_trajectory(options, &mut writer)
}
