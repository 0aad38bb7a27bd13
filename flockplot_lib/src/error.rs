//! Errors, one enum per pipeline stage

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FlockplotError>;

#[derive(Debug, Error)]
pub enum FlockplotError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("can't read frame directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("frame file {path} has no numeric suffix to order it by")]
    MissingFrameIndex { path: PathBuf },

    #[error("frame index {index} used by both {first} and {second}")]
    DuplicateFrameIndex {
        index: u64,
        first: PathBuf,
        second: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no frames to stack")]
    EmptyTrajectory,

    #[error("can't open frame file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed table in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: row {row}, column {column}: '{value}' is not a number")]
    NotNumeric {
        path: PathBuf,
        row: usize,
        column: usize,
        value: String,
    },

    #[error("{path} holds no rows")]
    EmptyFrame { path: PathBuf },

    #[error("{path}: expected a {expected:?} table, found {found:?}")]
    ShapeMismatch {
        path: PathBuf,
        expected: [usize; 2],
        found: [usize; 2],
    },

    #[error("can't lay out trajectory array")]
    Layout(#[from] ndarray::ShapeError),
}

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("a frame needs at least 2 coordinate columns, found {found}")]
    TooFewColumns { found: usize },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("nothing to serialize, no frame was written")]
    NoFrames,

    #[error("frame rate must be positive")]
    InvalidFrameRate,

    #[error("drawing backend failed: {0}")]
    Backend(String),

    #[error("can't use font {path}: {reason}")]
    Font { path: PathBuf, reason: String },

    #[error(transparent)]
    Plot(#[from] PlotError),
}
