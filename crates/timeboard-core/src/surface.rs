use std::collections::BTreeSet;

use crate::model::Granularity;

/// What the controller may do to the
/// page: flag menu buttons, switch the
/// grid variant, and fill the grid.
pub trait DashboardSurface {
  /// Mode named by each menu button, in
  /// document order. `None` for a button
  /// whose mode attribute is missing or
  /// unknown.
  fn button_modes(
    &self
  ) -> Vec<Option<Granularity>>;

  fn set_selected(
    &mut self,
    index: usize,
    selected: bool
  );

  /// Drops every granularity variant from
  /// the grid and adds the one for `mode`.
  fn set_variant(
    &mut self,
    mode: Granularity
  );

  fn inject_cards(&mut self, html: &str);
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct MemoryButton {
  pub mode:     Option<Granularity>,
  pub selected: bool
}

/// In-memory page used by tests and
/// the static renderer.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
)]
pub struct MemorySurface {
  pub buttons:  Vec<MemoryButton>,
  pub variants: BTreeSet<Granularity>,
  pub cards:    Option<String>
}

impl MemorySurface {
  /// One button per granularity, in menu
  /// order, none selected.
  pub fn standard() -> Self {
    Self::with_buttons(
      Granularity::all()
        .into_iter()
        .map(Some)
    )
  }

  pub fn with_buttons(
    modes: impl IntoIterator<
      Item = Option<Granularity>
    >
  ) -> Self {
    Self {
      buttons: modes
        .into_iter()
        .map(|mode| MemoryButton {
          mode,
          selected: false
        })
        .collect(),
      ..Self::default()
    }
  }

  pub fn selected_modes(
    &self
  ) -> Vec<Option<Granularity>> {
    self
      .buttons
      .iter()
      .filter(|button| button.selected)
      .map(|button| button.mode)
      .collect()
  }
}

impl DashboardSurface for MemorySurface {
  fn button_modes(
    &self
  ) -> Vec<Option<Granularity>> {
    self
      .buttons
      .iter()
      .map(|button| button.mode)
      .collect()
  }

  fn set_selected(
    &mut self,
    index: usize,
    selected: bool
  ) {
    if let Some(button) =
      self.buttons.get_mut(index)
    {
      button.selected = selected;
    }
  }

  fn set_variant(
    &mut self,
    mode: Granularity
  ) {
    self.variants.clear();
    self.variants.insert(mode);
  }

  fn inject_cards(&mut self, html: &str) {
    self.cards = Some(html.to_string());
  }
}
