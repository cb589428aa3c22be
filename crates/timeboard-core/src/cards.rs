use maud::{
  Markup,
  html
};

use crate::model::{
  CategoryRecord,
  Granularity,
  format_hours
};

pub const DEFAULT_ASSET_DIR: &str =
  "./images";
pub const ELLIPSIS_ICON: &str =
  "icon-ellipsis.svg";

/// CSS-safe identifier for a category:
/// lowercase with spaces turned into
/// hyphens.
pub fn css_identifier(
  title: &str
) -> String {
  title.to_lowercase().replace(' ', "-")
}

pub fn icon_file(
  identifier: &str
) -> String {
  format!("icon-{identifier}.svg")
}

/// Renders category cards as HTML
/// fragments. Rendering never touches
/// anything but its arguments.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct CardRenderer {
  asset_dir: String
}

impl Default for CardRenderer {
  fn default() -> Self {
    Self::new(DEFAULT_ASSET_DIR)
  }
}

impl CardRenderer {
  pub fn new(
    asset_dir: impl Into<String>
  ) -> Self {
    let asset_dir = asset_dir.into();
    Self {
      asset_dir: asset_dir
        .trim_end_matches('/')
        .to_string()
    }
  }

  pub fn asset_dir(&self) -> &str {
    &self.asset_dir
  }

  fn asset(&self, file: &str) -> String {
    if self.asset_dir.is_empty() {
      file.to_string()
    } else {
      format!(
        "{}/{file}",
        self.asset_dir
      )
    }
  }

  pub fn render_one(
    &self,
    record: &CategoryRecord
  ) -> String {
    self.card(record).into_string()
  }

  #[tracing::instrument(
    skip_all,
    fields(count = records.len())
  )]
  pub fn render_all(
    &self,
    records: &[CategoryRecord]
  ) -> String {
    records
      .iter()
      .map(|record| {
        self.render_one(record)
      })
      .collect()
  }

  pub(crate) fn card(
    &self,
    record: &CategoryRecord
  ) -> Markup {
    let id = css_identifier(&record.title);
    let icon = self.asset(&icon_file(&id));
    let ellipsis =
      self.asset(ELLIPSIS_ICON);

    html! {
      article class=(format!("card card--{id}")) data-category=(id) {
        div class="card__header" {
          img class="card__icon" src=(icon) alt="";
        }
        div class="card__body" {
          div class="card__title-row" {
            h2 class="card__title" { (record.title) }
            button class="card__options" type="button" aria-label=(format!("{} options", record.title)) {
              img src=(ellipsis) alt="";
            }
          }
          @for mode in Granularity::all() {
            @let frame = record.timeframes.get(mode);
            div class=(format!("card__stats card__stats--{mode}")) data-mode=(mode.as_key()) {
              p class="card__current" { (format_hours(frame.current)) }
              p class="card__previous" {
                (mode.previous_label()) " - " (format_hours(frame.previous))
              }
            }
          }
        }
      }
    }
  }
}

pub fn render_one(
  record: &CategoryRecord
) -> String {
  CardRenderer::default()
    .render_one(record)
}

pub fn render_all(
  records: &[CategoryRecord]
) -> String {
  CardRenderer::default()
    .render_all(records)
}
