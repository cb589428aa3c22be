use anyhow::anyhow;
use timeboard_core::persistence::KeyValueStore;

/// `window.localStorage`, looked up on
/// every access.
pub struct LocalStore;

fn local_storage()
-> anyhow::Result<web_sys::Storage> {
  web_sys::window()
    .and_then(|window| {
      window
        .local_storage()
        .ok()
        .flatten()
    })
    .ok_or_else(|| {
      anyhow!(
        "local storage unavailable"
      )
    })
}

impl KeyValueStore for LocalStore {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    local_storage()?
      .get_item(key)
      .map_err(|err| {
        anyhow!(
          "local storage read failed: \
           {err:?}"
        )
      })
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    local_storage()?
      .set_item(key, value)
      .map_err(|err| {
        anyhow!(
          "local storage write failed: \
           {err:?}"
        )
      })
  }
}
