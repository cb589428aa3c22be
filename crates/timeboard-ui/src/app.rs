use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use timeboard_core::app::Dashboard;
use timeboard_core::cards::{
  CardRenderer,
  DEFAULT_ASSET_DIR
};
use timeboard_core::persistence::ModePersistence;
use timeboard_core::source::DEFAULT_DATA_PATH;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
  Element,
  Event
};

use crate::api::HttpSource;
use crate::dom::{
  DomSurface,
  js_error
};
use crate::storage::LocalStore;

type SharedDashboard =
  Rc<RefCell<Dashboard<DomSurface, LocalStore>>>;

pub async fn start() {
  if let Err(error) = mount().await {
    tracing::error!(
      error = %error,
      "dashboard failed to start"
    );
  }
}

async fn mount() -> anyhow::Result<()> {
  let document = web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .ok_or_else(|| {
      anyhow!("no document to mount on")
    })?;

  let surface =
    DomSurface::attach(&document)?;
  let buttons =
    surface.buttons().to_vec();

  let mut dashboard = Dashboard::new(
    surface,
    ModePersistence::new(LocalStore),
    CardRenderer::new(DEFAULT_ASSET_DIR)
  );
  dashboard
    .bootstrap(&HttpSource::new(
      DEFAULT_DATA_PATH
    ))
    .await;

  let dashboard: SharedDashboard =
    Rc::new(RefCell::new(dashboard));
  for (index, button) in
    buttons.iter().enumerate()
  {
    bind_click(
      button,
      index,
      Rc::clone(&dashboard)
    )?;
  }

  Ok(())
}

/// Routes clicks on `button` to the
/// dashboard's click table. The listener
/// lives as long as the page.
fn bind_click(
  button: &Element,
  index: usize,
  dashboard: SharedDashboard
) -> anyhow::Result<()> {
  let on_click = Closure::<
    dyn FnMut(Event)
  >::new(
    move |_event: Event| {
      match dashboard.try_borrow_mut() {
        | Ok(mut dashboard) => {
          if dashboard.click(index).is_none()
          {
            tracing::debug!(
              index,
              "click on unbound menu \
               button"
            );
          }
        }
        | Err(_) => tracing::warn!(
          index,
          "dashboard busy; dropping click"
        )
      }
    }
  );

  button
    .add_event_listener_with_callback(
      "click",
      on_click.as_ref().unchecked_ref()
    )
    .map_err(js_error)?;
  on_click.forget();
  Ok(())
}
