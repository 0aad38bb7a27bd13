//! Axis text needs a TrueType font registered with plotters before anything is drawn

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use plotters::style::{register_font, FontStyle};

use crate::error::RenderError;

/// Family plotters asks for when drawing mesh labels
const FAMILY: &str = "sans-serif";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    r"C:\Windows\Fonts\arial.ttf",
];

/// Registers the font for axis text.
///
/// An explicit `font_path` must load. Without one the first readable common system font
/// is used, and `Ok(false)` means none was found so plots are drawn without text.
pub fn register_axis_font(font_path: Option<&Path>) -> Result<bool, RenderError> {
    if let Some(path) = font_path {
        let bytes = fs::read(path).map_err(|err| RenderError::Font {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        register(path, bytes)?;
        return Ok(true);
    }

    match find_system_font() {
        Some((path, bytes)) => {
            register(&path, bytes)?;
            Ok(true)
        }
        None => {
            warn!("no system font found, axis labels are left out");
            Ok(false)
        }
    }
}

pub fn find_system_font() -> Option<(PathBuf, Vec<u8>)> {
    SYSTEM_FONTS.iter().map(PathBuf::from).find_map(|path| {
        let bytes = fs::read(&path).ok()?;
        Some((path, bytes))
    })
}

fn register(path: &Path, bytes: Vec<u8>) -> Result<(), RenderError> {
    // plotters keeps a 'static reference for the rest of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FAMILY, FontStyle::Normal, bytes).map_err(|_| RenderError::Font {
        path: path.to_path_buf(),
        reason: "not a TrueType or OpenType font".to_owned(),
    })?;
    debug!("axis font loaded from {}", path.display());

    Ok(())
}
