use std::fs;
use std::path::Path;

use anyhow::Context;
use futures::executor::block_on;
use tracing::{info, instrument};

use crate::app::Dashboard;
use crate::cards::CardRenderer;
use crate::cli::Command;
use crate::config::Config;
use crate::model::Granularity;
use crate::page::render_page;
use crate::persistence::{KeyValueStore, ModePersistence};
use crate::render::Renderer;
use crate::source::{DataSource, fetch_categories};
use crate::surface::MemorySurface;

#[instrument(skip(cfg, persistence, source, command))]
pub fn dispatch<S, D>(
    cfg: &Config,
    persistence: ModePersistence<S>,
    source: &D,
    command: Command,
) -> anyhow::Result<()>
where
    S: KeyValueStore,
    D: DataSource,
{
    let renderer = CardRenderer::new(cfg.assets_dir());

    match command {
        Command::Render { mode, page, out } => {
            let mode = mode.unwrap_or_else(|| persistence.read());
            let html = render_html(source, &renderer, mode, page);
            write_output(out.as_deref(), &html)?;
        }
        Command::Mode { mode } => {
            let mode = select_or_show(persistence, mode);
            println!("{mode}");
        }
        Command::Summary { mode } => {
            let mode = mode.unwrap_or_else(|| persistence.read());
            let records = block_on(fetch_categories(source)).unwrap_or_default();
            Renderer::new(cfg)?.print_summary(&records, mode)?;
        }
    }

    Ok(())
}

/// Static counterpart of the browser bootstrap. Unreadable data leaves the
/// grid empty.
pub fn render_html<D: DataSource>(
    source: &D,
    renderer: &CardRenderer,
    mode: Granularity,
    page: bool,
) -> String {
    let records = block_on(fetch_categories(source));
    if page {
        render_page(records.as_deref(), mode, renderer)
    } else {
        records
            .map(|records| renderer.render_all(&records))
            .unwrap_or_default()
    }
}

/// Runs the choice through the widget's own click path so the CLI persists
/// exactly what a button press would.
pub fn select_or_show<S: KeyValueStore>(
    persistence: ModePersistence<S>,
    mode: Option<Granularity>,
) -> Granularity {
    let mut dashboard = Dashboard::new(
        MemorySurface::standard(),
        persistence,
        CardRenderer::default(),
    );
    dashboard.wire_buttons();
    let restored = dashboard.restore_mode();

    let Some(mode) = mode else {
        return restored;
    };
    let index = dashboard
        .surface()
        .buttons
        .iter()
        .position(|button| button.mode == Some(mode));
    match index {
        Some(index) => {
            dashboard.click(index);
        }
        None => dashboard.select(mode),
    }
    mode
}

fn write_output(out: Option<&Path>, html: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
            info!(file = %path.display(), "wrote html");
        }
        None => println!("{html}"),
    }
    Ok(())
}
