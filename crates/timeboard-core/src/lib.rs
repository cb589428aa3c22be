pub mod app;
pub mod cards;
pub mod controller;
pub mod model;
pub mod page;
pub mod persistence;
pub mod source;
pub mod surface;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod commands;
#[cfg(feature = "cli")]
pub mod config;
#[cfg(feature = "cli")]
pub mod render;
#[cfg(feature = "cli")]
pub mod store;

#[cfg(feature = "cli")]
#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<std::ffi::OsString>
) -> anyhow::Result<()> {
  use anyhow::Context;
  use clap::Parser;
  use tracing::{
    debug,
    info
  };

  let pre =
    cli::preprocess_args(&raw_args)?;
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting timeboard CLI"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );

  let state_file = cfg.state_file()?;
  let store =
    store::FileStore::open(&state_file)
      .with_context(|| {
        format!(
          "failed to open state store at \
           {}",
          state_file.display()
        )
      })?;
  let persistence =
    persistence::ModePersistence::with_key(
      store,
      cfg.storage_key()
    )
    .with_default(cfg.default_mode()?);

  let data = cli
    .data
    .unwrap_or_else(|| {
      cfg.data_location()
    });
  debug!(data = %data.display(), "using data file");
  let source = source::FileSource::new(data);

  commands::dispatch(
    &cfg,
    persistence,
    &source,
    cli.command
  )?;

  info!("done");
  Ok(())
}
