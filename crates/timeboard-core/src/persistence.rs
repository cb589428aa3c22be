use std::collections::BTreeMap;

use tracing::{
  debug,
  warn
};

use crate::model::Granularity;

/// Storage key the selected mode lives
/// under.
pub const MODE_STORAGE_KEY: &str =
  "mode";

/// Durable string key-value storage,
/// shaped after `localStorage`.
pub trait KeyValueStore {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>>;

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  items: BTreeMap<String, String>
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_item(
    mut self,
    key: &str,
    value: &str
  ) -> Self {
    self.items.insert(
      key.to_string(),
      value.to_string()
    );
    self
  }
}

impl KeyValueStore for MemoryStore {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    Ok(self.items.get(key).cloned())
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self.items.insert(
      key.to_string(),
      value.to_string()
    );
    Ok(())
  }
}

/// Reads and writes the selected
/// granularity. Storage trouble is
/// logged and never reaches the caller.
#[derive(Debug, Clone)]
pub struct ModePersistence<S> {
  store:   S,
  key:     String,
  default: Granularity
}

impl<S: KeyValueStore>
  ModePersistence<S>
{
  pub fn new(store: S) -> Self {
    Self::with_key(
      store,
      MODE_STORAGE_KEY
    )
  }

  pub fn with_key(
    store: S,
    key: impl Into<String>
  ) -> Self {
    Self {
      store,
      key: key.into(),
      default: Granularity::DEFAULT
    }
  }

  pub fn with_default(
    mut self,
    default: Granularity
  ) -> Self {
    self.default = default;
    self
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn into_store(self) -> S {
    self.store
  }

  pub fn read(&self) -> Granularity {
    let stored = match self
      .store
      .get_item(&self.key)
    {
      | Ok(value) => value,
      | Err(error) => {
        warn!(
          key = %self.key,
          error = %error,
          "failed reading persisted mode"
        );
        None
      }
    };

    match stored {
      | Some(raw) => {
        match raw.parse::<Granularity>() {
          | Ok(mode) => mode,
          | Err(error) => {
            warn!(
              key = %self.key,
              %error,
              "ignoring invalid persisted mode"
            );
            self.default
          }
        }
      }
      | None => {
        debug!(
          key = %self.key,
          default = %self.default,
          "no persisted mode; using default"
        );
        self.default
      }
    }
  }

  pub fn write(
    &mut self,
    mode: Granularity
  ) {
    if let Err(error) = self
      .store
      .set_item(&self.key, mode.as_key())
    {
      warn!(
        key = %self.key,
        %mode,
        error = %error,
        "failed persisting mode"
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use anyhow::anyhow;

  use super::*;

  struct BrokenStore;

  impl KeyValueStore for BrokenStore {
    fn get_item(
      &self,
      _key: &str
    ) -> anyhow::Result<Option<String>>
    {
      Err(anyhow!("storage disabled"))
    }

    fn set_item(
      &mut self,
      _key: &str,
      _value: &str
    ) -> anyhow::Result<()> {
      Err(anyhow!("quota exceeded"))
    }
  }

  #[test]
  fn read_defaults_to_weekly() {
    let persistence =
      ModePersistence::new(MemoryStore::new());
    assert_eq!(
      persistence.read(),
      Granularity::Weekly
    );
  }

  #[test]
  fn read_returns_last_written_mode() {
    let mut persistence =
      ModePersistence::new(MemoryStore::new());
    persistence.write(Granularity::Daily);
    persistence.write(Granularity::Monthly);
    assert_eq!(
      persistence.read(),
      Granularity::Monthly
    );
    assert_eq!(
      persistence
        .store()
        .get_item(MODE_STORAGE_KEY)
        .expect("memory store"),
      Some("monthly".to_string())
    );
  }

  #[test]
  fn invalid_stored_value_falls_back() {
    let persistence = ModePersistence::new(
      MemoryStore::new()
        .with_item(MODE_STORAGE_KEY, "yearly")
    );
    assert_eq!(
      persistence.read(),
      Granularity::Weekly
    );
  }

  #[test]
  fn padded_stored_value_is_not_a_mode() {
    let persistence = ModePersistence::new(
      MemoryStore::new()
        .with_item(MODE_STORAGE_KEY, " daily\n")
    );
    assert_eq!(
      persistence.read(),
      Granularity::Weekly
    );
  }

  #[test]
  fn broken_storage_degrades_silently() {
    let mut persistence =
      ModePersistence::new(BrokenStore);
    persistence.write(Granularity::Daily);
    assert_eq!(
      persistence.read(),
      Granularity::Weekly
    );
  }

  #[test]
  fn custom_key_and_default() {
    let mut persistence =
      ModePersistence::with_key(
        MemoryStore::new(),
        "timePeriod"
      )
      .with_default(Granularity::Monthly);
    assert_eq!(
      persistence.read(),
      Granularity::Monthly
    );
    persistence.write(Granularity::Daily);
    assert_eq!(
      persistence
        .store()
        .get_item("timePeriod")
        .expect("memory store")
        .as_deref(),
      Some("daily")
    );
  }
}
