use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, Trim};
use log::debug;
use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::error::LoadError;

/// Positions of every entity at one time step, `[entity, coordinate]`
pub type Frame = Array2<f64>;

/// All frames of one run stacked along a leading axis, `[frame, entity, coordinate]`.
///
/// Every frame shares the same shape, there is no way to build one otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    positions: Array3<f64>,
}

impl Trajectory {
    /// Stacks frames in the given order. `sources` names each frame for error reporting.
    pub fn from_frames(frames: &[Frame], sources: &[PathBuf]) -> Result<Self, LoadError> {
        let first = frames.first().ok_or(LoadError::EmptyTrajectory)?;
        let expected = [first.nrows(), first.ncols()];

        for (i, frame) in frames.iter().enumerate() {
            let found = [frame.nrows(), frame.ncols()];
            if found != expected {
                return Err(LoadError::ShapeMismatch {
                    path: sources.get(i).cloned().unwrap_or_default(),
                    expected,
                    found,
                });
            }
        }

        let views: Vec<ArrayView2<f64>> = frames.iter().map(|f| f.view()).collect();
        let positions = ndarray::stack(Axis(0), &views)?;

        Ok(Trajectory { positions })
    }

    pub fn frame_count(&self) -> usize {
        self.positions.len_of(Axis(0))
    }

    pub fn entity_count(&self) -> usize {
        self.positions.len_of(Axis(1))
    }

    pub fn coordinate_count(&self) -> usize {
        self.positions.len_of(Axis(2))
    }

    pub fn shape(&self) -> [usize; 3] {
        [
            self.frame_count(),
            self.entity_count(),
            self.coordinate_count(),
        ]
    }

    /// # Panics
    /// when `index` is not below [`Trajectory::frame_count`]
    pub fn frame(&self, index: usize) -> ArrayView2<'_, f64> {
        self.positions.index_axis(Axis(0), index)
    }

    pub fn frames(&self) -> impl Iterator<Item = ArrayView2<'_, f64>> + '_ {
        self.positions.outer_iter()
    }
}

/// Loads every file as one frame, in the order given, and stacks them.
///
/// Any unreadable or malformed file fails the whole load.
pub fn load_trajectory(paths: &[PathBuf]) -> Result<Trajectory, LoadError> {
    if paths.is_empty() {
        return Err(LoadError::EmptyTrajectory);
    }

    let frames = paths
        .iter()
        .map(|path| load_frame(path))
        .collect::<Result<Vec<Frame>, _>>()?;

    let trajectory = Trajectory::from_frames(&frames, paths)?;
    debug!("loaded trajectory of shape {:?}", trajectory.shape());

    Ok(trajectory)
}

pub fn load_frame(path: &Path) -> Result<Frame, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    parse_frame(io::BufReader::new(file), path)
}

/// Parses a header-less, comma delimited table of numbers.
/// Rows are entities, columns are coordinates. `path` is only used in errors.
pub fn parse_frame<R: io::Read>(reader: R, path: &Path) -> Result<Frame, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_reader(reader);

    let mut values: Vec<f64> = Vec::new();
    let mut n_rows = 0;
    let mut n_cols = 0;

    for (row, record) in rdr.records().enumerate() {
        // ragged rows are rejected by the reader itself
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        for (column, field) in record.iter().enumerate() {
            let value = field.parse::<f64>().map_err(|_| LoadError::NotNumeric {
                path: path.to_path_buf(),
                row,
                column,
                value: field.to_owned(),
            })?;
            values.push(value);
        }

        n_cols = record.len();
        n_rows += 1;
    }

    if n_rows == 0 {
        return Err(LoadError::EmptyFrame {
            path: path.to_path_buf(),
        });
    }

    Ok(Array2::from_shape_vec((n_rows, n_cols), values)?)
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        path::{Path, PathBuf},
    };

    use approx::assert_relative_eq;
    use ndarray::array;

    use super::{load_trajectory, parse_frame, Trajectory};
    use crate::error::LoadError;

    fn write_frames(dir: &Path, contents: &[&str]) -> Vec<PathBuf> {
        contents
            .iter()
            .enumerate()
            .map(|(i, content)| {
                let path = dir.join(format!("positions_{i:03}.csv"));
                fs::write(&path, content).unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn parses_positions_table() {
        let frame = parse_frame("0.1,0.2\n0.3,0.4\n".as_bytes(), Path::new("mem")).unwrap();

        assert_eq!(frame, array![[0.1, 0.2], [0.3, 0.4]]);
    }

    #[test]
    fn parses_simulator_output() {
        // as written by the simulator, fixed six decimals, no header
        let frame = parse_frame(
            "0.512345,0.100000\n-0.002000,1.050000\n0.999999,0.000001\n".as_bytes(),
            Path::new("mem"),
        )
        .unwrap();

        assert_eq!(frame.dim(), (3, 2));
        assert_relative_eq!(frame[[1, 0]], -0.002);
        assert_relative_eq!(frame[[2, 1]], 0.000001);
    }

    #[test]
    fn tolerates_whitespace_and_extra_columns() {
        let frame =
            parse_frame(" 1.5 , 2 ,3\n4,5,6\n\n".as_bytes(), Path::new("mem")).unwrap();

        assert_eq!(frame, array![[1.5, 2., 3.], [4., 5., 6.]]);
    }

    #[test]
    fn rejects_non_numeric_field() {
        let err = parse_frame("0.1,0.2\n0.3,abc\n".as_bytes(), Path::new("mem")).unwrap_err();

        match err {
            LoadError::NotNumeric {
                row, column, value, ..
            } => {
                assert_eq!((row, column), (1, 1));
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = parse_frame("0.1,0.2\n0.3\n".as_bytes(), Path::new("mem")).unwrap_err();

        assert!(matches!(err, LoadError::Csv { .. }));
    }

    #[test]
    fn rejects_empty_file() {
        let err = parse_frame("".as_bytes(), Path::new("mem")).unwrap_err();

        assert!(matches!(err, LoadError::EmptyFrame { .. }));
    }

    #[test]
    fn stacks_frames_into_trajectory() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_frames(
            dir.path(),
            &["0,0\n1,1\n", "0.1,0.2\n1.1,1.2\n", "0.2,0.4\n1.2,1.4\n", "0.3,0.6\n1.3,1.6\n"],
        );

        let trajectory = load_trajectory(&paths).unwrap();

        assert_eq!(trajectory.shape(), [4, 2, 2]);
        assert_eq!(trajectory.frame(2), array![[0.2, 0.4], [1.2, 1.4]]);
        for (i, frame) in trajectory.frames().enumerate() {
            assert_relative_eq!(frame[[1, 0]], 1. + 0.1 * i as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn identical_frames_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let content = "0.1,0.2\n0.3,0.4";
        let paths = write_frames(dir.path(), &[content, content, content]);

        let trajectory = load_trajectory(&paths).unwrap();

        assert_eq!(trajectory.shape(), [3, 2, 2]);
        for frame in trajectory.frames() {
            assert_eq!(frame, array![[0.1, 0.2], [0.3, 0.4]]);
        }
    }

    #[test]
    fn entity_count_mismatch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_frames(dir.path(), &["0,0\n1,1\n", "0,0\n1,1\n2,2\n"]);

        let err = load_trajectory(&paths).unwrap_err();

        match err {
            LoadError::ShapeMismatch {
                path,
                expected,
                found,
            } => {
                assert_eq!(path, paths[1]);
                assert_eq!(expected, [2, 2]);
                assert_eq!(found, [3, 2]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn column_count_mismatch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_frames(dir.path(), &["0,0\n1,1\n", "0,0,0\n1,1,1\n"]);

        let err = load_trajectory(&paths).unwrap_err();

        assert!(matches!(err, LoadError::ShapeMismatch { .. }));
    }

    #[test]
    fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = write_frames(dir.path(), &["0,0\n"]);
        paths.push(dir.path().join("gone.csv"));

        let err = load_trajectory(&paths).unwrap_err();

        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[test]
    fn nothing_to_stack() {
        assert!(matches!(
            load_trajectory(&[]),
            Err(LoadError::EmptyTrajectory)
        ));
        assert!(matches!(
            Trajectory::from_frames(&[], &[]),
            Err(LoadError::EmptyTrajectory)
        ));
    }

    #[test]
    fn in_memory_frames_are_shape_checked() {
        let frames = [array![[0., 0.], [1., 1.]], array![[0., 0.]]];

        let err = Trajectory::from_frames(&frames, &[]).unwrap_err();

        assert!(matches!(err, LoadError::ShapeMismatch { found: [1, 2], .. }));
    }
}
