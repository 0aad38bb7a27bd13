use std::{fs, io, path::PathBuf};

use anyhow::Context;
use clap_serde_derive::{
    clap::{self, Parser},
    serde::Serialize,
    ClapSerde,
};
use flockplot_lib::options::{
    FrameOrdering, PlotOptions, RenderOptions, DEFAULT_FPS, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_PATH,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Renders boid position snapshots (one CSV per time step) as an animated scatter plot.
pub struct Args {
    /// Config file, skipped when missing
    #[arg(short, long = "config", default_value = "config.toml")]
    pub config_path: PathBuf,

    /// Rest of arguments
    #[command(flatten)]
    pub config: <Config as ClapSerde>::Opt,
}

#[derive(ClapSerde, Serialize)]
/// Programatic configuration
///
/// Uses defaults, which can be overwritten by a TOML file given with `-c` or `--config`,
/// which in turn is overwritten by command line options
pub struct Config {
    #[default(PathBuf::from(DEFAULT_INPUT_DIR))]
    #[arg(short = 'i', long)]
    /// directory holding one CSV file per frame
    pub input_dir: PathBuf,

    #[default(PathBuf::from(DEFAULT_OUTPUT_PATH))]
    #[arg(short = 'o', long = "output")]
    /// animated GIF to write, overwritten if present
    pub output_path: PathBuf,

    #[default(DEFAULT_FPS)]
    #[arg(long)]
    pub fps: u32,

    #[default(FrameOrdering::NumericSuffix)]
    #[arg(long)]
    /// frame file order, "numeric-suffix" or "lexicographic"
    pub ordering: FrameOrdering,

    #[default(640)]
    #[arg(long)]
    pub width: u32,

    #[default(480)]
    #[arg(long)]
    pub height: u32,

    #[default(2)]
    #[arg(long = "point-size")]
    /// scatter point radius in pixels
    pub point_size: u32,

    #[default(PathBuf::new())]
    #[arg(long)]
    /// TrueType font for axis labels, common system fonts are tried when empty
    pub font: PathBuf,
}

impl Config {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            input_dir: self.input_dir.clone(),
            output_path: self.output_path.clone(),
            ordering: self.ordering,
            fps: self.fps,
            plot: PlotOptions {
                width: self.width,
                height: self.height,
                point_size: self.point_size,
                font_path: (!self.font.as_os_str().is_empty()).then(|| self.font.clone()),
                ..Default::default()
            },
        }
    }
}

/// Merges the config file, if there is one, with the options parsed by clap
pub fn load_config(args: &mut Args) -> anyhow::Result<Config> {
    match fs::read_to_string(&args.config_path) {
        Ok(text) => {
            let file_config = parse_config(&text).with_context(|| {
                format!("Error in configuration file {}", args.config_path.display())
            })?;
            Ok(Config::from(file_config).merge(&mut args.config))
        }
        // If there is no config file return only config parsed from clap
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Config::from(&mut args.config)),
        Err(err) => Err(err).with_context(|| {
            format!("Can't read configuration file {}", args.config_path.display())
        }),
    }
}

fn parse_config(text: &str) -> Result<<Config as ClapSerde>::Opt, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use clap_serde_derive::clap::Parser;
    use flockplot_lib::options::FrameOrdering;

    use super::{load_config, parse_config, Args, Config};

    fn args(cli: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("flockplot").chain(cli.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.toml");
        let mut args = args(&["-c", missing.to_str().unwrap()]);

        let config = load_config(&mut args).unwrap();

        assert_eq!(config.input_dir, PathBuf::from("./out"));
        assert_eq!(config.output_path, PathBuf::from("movie.gif"));
        assert_eq!(config.fps, 60);
        assert_eq!(config.ordering, FrameOrdering::NumericSuffix);
    }

    #[test]
    fn command_line_beats_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "input_dir = \"frames\"\nfps = 24\nordering = \"lexicographic\"\n",
        )
        .unwrap();
        let mut args = args(&["-c", path.to_str().unwrap(), "--fps", "30", "-o", "flock.gif"]);

        let config = load_config(&mut args).unwrap();

        assert_eq!(config.input_dir, PathBuf::from("frames"));
        assert_eq!(config.fps, 30);
        assert_eq!(config.output_path, PathBuf::from("flock.gif"));
        assert_eq!(config.ordering, FrameOrdering::Lexicographic);
        assert_eq!(config.width, 640);
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "fps = \"fast\"\n").unwrap();
        let mut args = args(&["-c", path.to_str().unwrap()]);

        assert!(load_config(&mut args).is_err());
    }

    #[test]
    fn ordering_flag_is_parsed() {
        let mut args = args(&["-c", "/nonexistent/config.toml", "--ordering", "lexicographic"]);

        let options = load_config(&mut args).unwrap().render_options();

        assert_eq!(options.ordering, FrameOrdering::Lexicographic);
        assert_eq!(options.plot.point_size, 2);
        assert_eq!(options.plot.font_path, None);
    }

    #[test]
    fn font_flag_sets_font_path() {
        let mut args = args(&["-c", "/nonexistent/config.toml", "--font", "fonts/Sans.ttf"]);

        let options = load_config(&mut args).unwrap().render_options();

        assert_eq!(options.plot.font_path, Some(PathBuf::from("fonts/Sans.ttf")));
    }

    #[test]
    fn example_config_matches_defaults() {
        let opt = parse_config(include_str!("../../config.example.toml")).unwrap();
        let mut args = args(&["-c", "/nonexistent/config.toml"]);

        let from_file = Config::from(opt);
        let defaults = load_config(&mut args).unwrap();

        assert_eq!(
            toml::to_string(&from_file).unwrap(),
            toml::to_string(&defaults).unwrap()
        );
    }
}
