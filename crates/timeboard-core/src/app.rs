use tracing::{
  debug,
  info,
  warn
};

use crate::cards::CardRenderer;
use crate::controller::{
  apply_mode,
  select_mode
};
use crate::model::{
  CategoryRecord,
  Granularity
};
use crate::persistence::{
  KeyValueStore,
  ModePersistence
};
use crate::source::{
  DataSource,
  fetch_categories
};
use crate::surface::DashboardSurface;

/// What a bootstrap run did.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct BootReport {
  /// Cards injected, or `None` when the
  /// data could not be loaded.
  pub cards_rendered: Option<usize>,
  pub buttons_wired:  usize,
  pub initial_mode:   Granularity
}

/// The widget: a page surface, mode
/// storage, and the click table that
/// routes button presses to
/// `select_mode`.
#[derive(Debug)]
pub struct Dashboard<D, S> {
  surface:     D,
  persistence: ModePersistence<S>,
  renderer:    CardRenderer,
  handlers:    Vec<Option<Granularity>>,
  active:      Option<Granularity>
}

impl<D, S> Dashboard<D, S>
where
  D: DashboardSurface,
  S: KeyValueStore
{
  pub fn new(
    surface: D,
    persistence: ModePersistence<S>,
    renderer: CardRenderer
  ) -> Self {
    Self {
      surface,
      persistence,
      renderer,
      handlers: Vec::new(),
      active: None
    }
  }

  pub fn surface(&self) -> &D {
    &self.surface
  }

  pub fn persistence(
    &self
  ) -> &ModePersistence<S> {
    &self.persistence
  }

  pub fn active(
    &self
  ) -> Option<Granularity> {
    self.active
  }

  pub fn into_parts(
    self
  ) -> (D, ModePersistence<S>) {
    (self.surface, self.persistence)
  }

  /// Fetch, render, wire, restore. A
  /// failed fetch only skips rendering.
  #[tracing::instrument(skip_all)]
  pub async fn bootstrap<F>(
    &mut self,
    source: &F
  ) -> BootReport
  where
    F: DataSource
  {
    let records =
      fetch_categories(source).await;

    let cards_rendered = match records {
      | Some(records) => {
        Some(self.load_cards(&records))
      }
      | None => {
        warn!(
          "no dashboard data; leaving \
           grid untouched"
        );
        None
      }
    };

    let buttons_wired = self.wire_buttons();
    let initial_mode = self.restore_mode();

    info!(
      ?cards_rendered,
      buttons_wired,
      %initial_mode,
      "dashboard ready"
    );

    BootReport {
      cards_rendered,
      buttons_wired,
      initial_mode
    }
  }

  pub fn load_cards(
    &mut self,
    records: &[CategoryRecord]
  ) -> usize {
    let html =
      self.renderer.render_all(records);
    self.surface.inject_cards(&html);
    records.len()
  }

  /// Builds the click table from the
  /// buttons currently on the surface.
  pub fn wire_buttons(&mut self) -> usize {
    self.handlers =
      self.surface.button_modes();
    for (index, mode) in
      self.handlers.iter().enumerate()
    {
      if mode.is_none() {
        warn!(
          index,
          "menu button has no usable \
           mode; clicks will be ignored"
        );
      }
    }
    self.handlers.len()
  }

  /// Applies the persisted mode without
  /// writing it back.
  pub fn restore_mode(
    &mut self
  ) -> Granularity {
    let mode = self.persistence.read();
    apply_mode(mode, &mut self.surface);
    self.active = Some(mode);
    mode
  }

  /// Click on the button at `index`.
  /// Returns the mode it switched to, or
  /// `None` when nothing is bound there.
  pub fn click(
    &mut self,
    index: usize
  ) -> Option<Granularity> {
    let mode =
      self.handlers.get(index).copied()??;
    self.select(mode);
    Some(mode)
  }

  pub fn select(
    &mut self,
    mode: Granularity
  ) {
    debug!(
      from = ?self.active,
      to = %mode,
      "switching mode"
    );
    select_mode(
      mode,
      &mut self.surface,
      &mut self.persistence
    );
    self.active = Some(mode);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::persistence::{
    MODE_STORAGE_KEY,
    MemoryStore
  };
  use crate::surface::MemorySurface;

  fn dashboard(
    store: MemoryStore
  ) -> Dashboard<MemorySurface, MemoryStore>
  {
    Dashboard::new(
      MemorySurface::standard(),
      ModePersistence::new(store),
      CardRenderer::default()
    )
  }

  #[test]
  fn clicks_before_wiring_are_ignored() {
    let mut dash =
      dashboard(MemoryStore::new());
    assert_eq!(dash.click(0), None);
    assert!(
      dash.surface().selected_modes().is_empty()
    );
  }

  #[test]
  fn restore_does_not_persist() {
    let mut dash =
      dashboard(MemoryStore::new());
    dash.wire_buttons();
    assert_eq!(
      dash.restore_mode(),
      Granularity::Weekly
    );
    assert_eq!(
      dash
        .persistence()
        .store()
        .get_item(MODE_STORAGE_KEY)
        .expect("memory store"),
      None
    );
  }

  #[test]
  fn click_routes_to_button_mode() {
    let mut dash = dashboard(
      MemoryStore::new()
        .with_item(MODE_STORAGE_KEY, "monthly")
    );
    dash.wire_buttons();
    dash.restore_mode();
    assert_eq!(
      dash.active(),
      Some(Granularity::Monthly)
    );

    assert_eq!(
      dash.click(0),
      Some(Granularity::Daily)
    );
    assert_eq!(
      dash.active(),
      Some(Granularity::Daily)
    );
    assert_eq!(dash.click(7), None);
    assert_eq!(
      dash.persistence().read(),
      Granularity::Daily
    );
  }
}
