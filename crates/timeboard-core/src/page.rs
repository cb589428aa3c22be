use maud::{
  DOCTYPE,
  Markup,
  PreEscaped,
  html
};

use crate::cards::CardRenderer;
use crate::controller::apply_mode;
use crate::model::{
  CategoryRecord,
  Granularity
};
use crate::surface::{
  DashboardSurface,
  MemorySurface
};

pub const GRID_ID: &str =
  "dashboardGrid";
pub const MENU_BUTTON_CLASS: &str =
  "dashboard__menu-button";

/// Full HTML document for a dashboard in
/// `mode`. `records` of `None` leaves the
/// grid empty, as a failed fetch would.
pub fn render_page(
  records: Option<&[CategoryRecord]>,
  mode: Granularity,
  renderer: &CardRenderer
) -> String {
  let mut surface =
    MemorySurface::standard();
  if let Some(records) = records {
    surface.inject_cards(
      &renderer.render_all(records)
    );
  }
  apply_mode(mode, &mut surface);
  document(&surface).into_string()
}

fn grid_class(
  surface: &MemorySurface
) -> String {
  let mut class =
    String::from("dashboard__grid");
  for mode in &surface.variants {
    class.push(' ');
    class.push_str(&mode.grid_class());
  }
  class
}

fn document(
  surface: &MemorySurface
) -> Markup {
  html! {
    (DOCTYPE)
    html lang="en" {
      head {
        meta charset="UTF-8";
        meta name="viewport" content="width=device-width, initial-scale=1.0";
        title { "Time tracking dashboard" }
        link rel="stylesheet" href="./style.css";
      }
      body {
        main class="dashboard" {
          section class="dashboard__profile" {
            p class="dashboard__report" { "Report for" }
            nav class="dashboard__menu" role="tablist" {
              @for entry in &surface.buttons {
                @if let Some(mode) = entry.mode {
                  button
                    class=(MENU_BUTTON_CLASS)
                    type="button"
                    role="tab"
                    data-mode=(mode.as_key())
                    aria-selected=(if entry.selected { "true" } else { "false" }) {
                    (mode.label())
                  }
                }
              }
            }
          }
          div id=(GRID_ID) class=(grid_class(surface)) {
            @if let Some(cards) = &surface.cards {
              (PreEscaped(cards))
            }
          }
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn records() -> Vec<CategoryRecord> {
    vec![CategoryRecord::new(
      "Work",
      (5.0, 3.0),
      (30.0, 25.0),
      (100.0, 90.0)
    )]
  }

  #[test]
  fn page_marks_only_the_active_button()
  {
    let html = render_page(
      Some(&records()),
      Granularity::Daily,
      &CardRenderer::default()
    );
    assert!(html.contains(
      "data-mode=\"daily\" aria-selected=\"true\""
    ));
    assert!(html.contains(
      "data-mode=\"weekly\" aria-selected=\"false\""
    ));
    assert!(html.contains(
      "data-mode=\"monthly\" aria-selected=\"false\""
    ));
    assert!(html.contains(
      "class=\"dashboard__grid dashboard__grid--daily\""
    ));
    assert!(html.contains("card--work"));
  }

  #[test]
  fn page_without_data_keeps_grid_empty()
  {
    let html = render_page(
      None,
      Granularity::Weekly,
      &CardRenderer::default()
    );
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(!html.contains("card--"));
    assert!(html.contains(
      "class=\"dashboard__grid dashboard__grid--weekly\"></div>"
    ));
  }
}
