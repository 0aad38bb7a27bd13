use anyhow::Context;
use clap_serde_derive::clap::Parser;
use log::{debug, info};

mod cliargs;
use cliargs::{load_config, Args};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse whole args with clap, then merge in the config file
    let mut args = Args::parse();
    let config = load_config(&mut args)?;
    debug!("effective configuration:\n{}", toml::to_string(&config)?);

    let options = config.render_options();
    let summary = flockplot_lib::render_gif(&options).with_context(|| {
        format!(
            "Can't render {} from {}",
            options.output_path.display(),
            options.input_dir.display()
        )
    })?;

    info!(
        "wrote {} frames of {} entities to {}",
        summary.frame_count,
        summary.entity_count,
        summary.output_path.display()
    );

    Ok(())
}
