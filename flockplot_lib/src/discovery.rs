use std::{
    fs,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use log::debug;

use crate::{error::DiscoveryError, options::FrameOrdering};

/// Lists every entry of `dir`, one per frame, in temporal order.
///
/// No filtering by extension or content is done, anything that is not a
/// readable table will fail later at load time.
pub fn frame_files(dir: &Path, ordering: FrameOrdering) -> Result<Vec<PathBuf>, DiscoveryError> {
    let read_dir_error = |source| DiscoveryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let paths = fs::read_dir(dir)
        .map_err(read_dir_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<PathBuf>, _>>()
        .map_err(read_dir_error)?;

    debug!("found {} entries in {}", paths.len(), dir.display());

    order_frames(paths, ordering)
}

pub fn order_frames(
    paths: Vec<PathBuf>,
    ordering: FrameOrdering,
) -> Result<Vec<PathBuf>, DiscoveryError> {
    match ordering {
        FrameOrdering::Lexicographic => Ok(paths
            .into_iter()
            .sorted_by(|a, b| a.file_name().cmp(&b.file_name()))
            .collect()),
        FrameOrdering::NumericSuffix => order_by_suffix(paths),
    }
}

fn order_by_suffix(paths: Vec<PathBuf>) -> Result<Vec<PathBuf>, DiscoveryError> {
    let indexed: Vec<(u64, PathBuf)> = paths
        .into_iter()
        .map(|path| match frame_index(&path) {
            Some(index) => Ok((index, path)),
            None => Err(DiscoveryError::MissingFrameIndex { path }),
        })
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .sorted_by_key(|(index, _)| *index)
        .collect();

    if let Some(((index, first), (_, second))) = indexed
        .iter()
        .tuple_windows()
        .find(|((a, _), (b, _))| a == b)
    {
        return Err(DiscoveryError::DuplicateFrameIndex {
            index: *index,
            first: first.clone(),
            second: second.clone(),
        });
    }

    Ok(indexed.into_iter().map(|(_, path)| path).collect())
}

/// The integer a file stem ends with, `positions_012.csv` -> 12
pub fn frame_index(path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    // digits are ascii, so char count equals byte count
    let n_digits = stem.chars().rev().take_while(|c| c.is_ascii_digit()).count();

    if n_digits == 0 {
        return None;
    }

    stem[stem.len() - n_digits..].parse().ok()
}
