use anyhow::anyhow;
use timeboard_core::model::Granularity;
use timeboard_core::page::{
  GRID_ID,
  MENU_BUTTON_CLASS
};
use timeboard_core::surface::DashboardSurface;
use wasm_bindgen::{
  JsCast,
  JsValue
};
use web_sys::{
  Document,
  Element
};

pub fn js_error(err: JsValue) -> anyhow::Error {
  anyhow!("{err:?}")
}

/// The dashboard markup already in the
/// document: menu buttons and the card
/// grid.
pub struct DomSurface {
  buttons: Vec<Element>,
  grid:    Element
}

impl DomSurface {
  pub fn attach(
    document: &Document
  ) -> anyhow::Result<Self> {
    let grid = document
      .get_element_by_id(GRID_ID)
      .ok_or_else(|| {
        anyhow!("missing #{GRID_ID} element")
      })?;

    let nodes = document
      .query_selector_all(&format!(
        ".{MENU_BUTTON_CLASS}"
      ))
      .map_err(js_error)?;
    let buttons: Vec<Element> = (0
      ..nodes.length())
      .filter_map(|index| nodes.get(index))
      .filter_map(|node| {
        node.dyn_into::<Element>().ok()
      })
      .collect();

    tracing::debug!(
      buttons = buttons.len(),
      "attached to dashboard markup"
    );

    Ok(Self { buttons, grid })
  }

  pub fn buttons(&self) -> &[Element] {
    &self.buttons
  }
}

impl DashboardSurface for DomSurface {
  fn button_modes(
    &self
  ) -> Vec<Option<Granularity>> {
    self
      .buttons
      .iter()
      .map(|button| {
        button
          .get_attribute("data-mode")
          .and_then(|raw| raw.parse().ok())
      })
      .collect()
  }

  fn set_selected(
    &mut self,
    index: usize,
    selected: bool
  ) {
    let Some(button) =
      self.buttons.get(index)
    else {
      return;
    };
    let value =
      if selected { "true" } else { "false" };
    if let Err(err) = button
      .set_attribute("aria-selected", value)
    {
      tracing::warn!(
        index,
        error = ?err,
        "failed updating aria-selected"
      );
    }
  }

  fn set_variant(
    &mut self,
    mode: Granularity
  ) {
    let classes = self.grid.class_list();
    for variant in Granularity::all() {
      let _ = classes
        .remove_1(&variant.grid_class());
    }
    if let Err(err) =
      classes.add_1(&mode.grid_class())
    {
      tracing::warn!(
        %mode,
        error = ?err,
        "failed updating grid variant"
      );
    }
  }

  fn inject_cards(&mut self, html: &str) {
    self.grid.set_inner_html(html);
  }
}
