use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use tempfile::NamedTempFile;
use tracing::{
  debug,
  info
};

use crate::persistence::KeyValueStore;

/// Key-value storage kept in a TOML file.
/// Every write replaces the file
/// atomically.
#[derive(Debug)]
pub struct FileStore {
  path:  PathBuf,
  items: BTreeMap<String, String>
}

impl FileStore {
  #[tracing::instrument(skip(path))]
  pub fn open(
    path: &Path
  ) -> anyhow::Result<Self> {
    let items = if path.exists() {
      let text = fs::read_to_string(path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;
      toml::from_str(&text)
        .with_context(|| {
          format!(
            "failed to parse {}",
            path.display()
          )
        })?
    } else {
      BTreeMap::new()
    };

    info!(
      file = %path.display(),
      keys = items.len(),
      "opened state store"
    );

    Ok(Self {
      path: path.to_path_buf(),
      items
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn save(
    &self,
    items: &BTreeMap<String, String>
  ) -> anyhow::Result<()> {
    debug!(file = %self.path.display(), "saving state atomically");

    let dir = self
      .path
      .parent()
      .filter(|dir| {
        !dir.as_os_str().is_empty()
      })
      .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)
      .with_context(|| {
        format!(
          "failed to create {}",
          dir.display()
        )
      })?;

    let text =
      toml::to_string(items)?;
    let mut temp =
      NamedTempFile::new_in(dir)?;
    temp.write_all(text.as_bytes())?;
    temp.flush()?;
    temp.persist(&self.path).map_err(
      |err| {
        anyhow!(
          "failed to persist {}: {}",
          self.path.display(),
          err
        )
      }
    )?;
    Ok(())
  }
}

impl KeyValueStore for FileStore {
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
    let mut next = self.items.clone();
    next.insert(
      key.to_string(),
      value.to_string()
    );
    self.save(&next)?;
    self.items = next;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn values_survive_reopen() {
    let temp = tempdir().expect("tempdir");
    let path =
      temp.path().join("nested/state.toml");

    let mut store =
      FileStore::open(&path).expect("open");
    assert_eq!(
      store.get_item("mode").expect("get"),
      None
    );
    store
      .set_item("mode", "daily")
      .expect("set");

    let reopened =
      FileStore::open(&path).expect("reopen");
    assert_eq!(
      reopened
        .get_item("mode")
        .expect("get")
        .as_deref(),
      Some("daily")
    );
  }

  #[test]
  fn failed_save_leaves_values_unchanged() {
    let temp = tempdir().expect("tempdir");
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "").expect("write");
    let path = blocker.join("state.toml");

    let mut store =
      FileStore::open(&path).expect("open");
    assert!(
      store.set_item("mode", "daily").is_err()
    );
    assert_eq!(
      store.get_item("mode").expect("get"),
      None
    );
    assert!(!path.exists());
  }

  #[test]
  fn corrupt_file_is_an_error() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("state.toml");
    fs::write(&path, "mode = [").expect("write");
    assert!(FileStore::open(&path).is_err());
  }
}
