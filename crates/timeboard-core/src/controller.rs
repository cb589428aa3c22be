use tracing::debug;

use crate::model::Granularity;
use crate::persistence::{
  KeyValueStore,
  ModePersistence
};
use crate::surface::DashboardSurface;

/// Makes `mode` the only selected
/// button and the only grid variant.
/// Every change of selection state goes
/// through here. When several buttons
/// carry the same mode only the first
/// one is selected.
pub fn apply_mode<D>(
  mode: Granularity,
  surface: &mut D
) where
  D: DashboardSurface + ?Sized
{
  let modes = surface.button_modes();
  let chosen = modes
    .iter()
    .position(|button_mode| {
      *button_mode == Some(mode)
    });
  for index in 0..modes.len() {
    surface.set_selected(
      index,
      Some(index) == chosen
    );
  }
  surface.set_variant(mode);
  debug!(%mode, "applied mode");
}

/// Click handler: apply, then persist.
pub fn select_mode<D, S>(
  mode: Granularity,
  surface: &mut D,
  persistence: &mut ModePersistence<S>
) where
  D: DashboardSurface + ?Sized,
  S: KeyValueStore
{
  apply_mode(mode, surface);
  persistence.write(mode);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::persistence::MemoryStore;
  use crate::surface::MemorySurface;

  #[test]
  fn exactly_one_button_selected_for_every_mode(
  ) {
    let mut surface =
      MemorySurface::standard();
    for mode in Granularity::all() {
      apply_mode(mode, &mut surface);
      assert_eq!(
        surface.selected_modes(),
        vec![Some(mode)]
      );
      assert_eq!(
        surface
          .variants
          .iter()
          .copied()
          .collect::<Vec<_>>(),
        vec![mode]
      );
    }
  }

  #[test]
  fn apply_is_idempotent() {
    let mut once = MemorySurface::standard();
    apply_mode(
      Granularity::Monthly,
      &mut once
    );

    let mut twice = once.clone();
    apply_mode(
      Granularity::Monthly,
      &mut twice
    );
    assert_eq!(once, twice);
  }

  #[test]
  fn unknown_buttons_are_never_selected()
  {
    let mut surface =
      MemorySurface::with_buttons([
        Some(Granularity::Daily),
        None,
        Some(Granularity::Weekly)
      ]);
    surface.buttons[1].selected = true;

    apply_mode(
      Granularity::Weekly,
      &mut surface
    );
    let flags: Vec<bool> = surface
      .buttons
      .iter()
      .map(|button| button.selected)
      .collect();
    assert_eq!(
      flags,
      vec![false, false, true]
    );
  }

  #[test]
  fn duplicate_buttons_select_only_the_first(
  ) {
    let mut surface =
      MemorySurface::with_buttons([
        Some(Granularity::Daily),
        Some(Granularity::Weekly),
        Some(Granularity::Daily)
      ]);
    surface.buttons[2].selected = true;

    apply_mode(
      Granularity::Daily,
      &mut surface
    );
    assert_eq!(
      surface.selected_modes(),
      vec![Some(Granularity::Daily)]
    );
    let flags: Vec<bool> = surface
      .buttons
      .iter()
      .map(|button| button.selected)
      .collect();
    assert_eq!(
      flags,
      vec![true, false, false]
    );
  }

  #[test]
  fn select_persists_the_choice() {
    let mut surface =
      MemorySurface::standard();
    let mut persistence =
      ModePersistence::new(MemoryStore::new());

    select_mode(
      Granularity::Daily,
      &mut surface,
      &mut persistence
    );
    assert_eq!(
      surface.selected_modes(),
      vec![Some(Granularity::Daily)]
    );
    assert_eq!(
      persistence.read(),
      Granularity::Daily
    );
  }
}
