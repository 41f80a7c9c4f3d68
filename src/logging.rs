use anyhow::Context;
use env_logger::{Env, Target, WriteStyle};
use std::fs::OpenOptions;
use std::path::Path;

/// Send log records to the file at `path`, appending to it.  The terminal
/// belongs to the UI, so nothing is logged to stderr.
///
/// The level filter comes from `RUST_LOG` and defaults to `info`.
pub(crate) fn init(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .write_style(WriteStyle::Never)
        .try_init()
        .context("failed to install logger")?;
    Ok(())
}
