use std::collections::BTreeMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  trace,
  warn
};

use crate::cards::DEFAULT_ASSET_DIR;
use crate::model::Granularity;
use crate::persistence::MODE_STORAGE_KEY;
use crate::source::DEFAULT_DATA_PATH;

pub const CONFIG_ENV: &str =
  "TIMEBOARDRC";

#[derive(Debug, Clone)]
pub struct Config {
  map: BTreeMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    let mut map = BTreeMap::new();
    for (key, value) in [
      ("data.location", DEFAULT_DATA_PATH),
      ("storage.key", MODE_STORAGE_KEY),
      ("assets.dir", DEFAULT_ASSET_DIR),
      (
        "default.mode",
        Granularity::DEFAULT.as_key()
      ),
      ("color", "on")
    ] {
      map.insert(
        key.to_string(),
        value.to_string()
      );
    }

    Self {
      map,
      loaded_files: vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    rc_override
  ))]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Config::default();

    let rc = resolve_rc_path(rc_override)?;
    if let Some(path) = rc {
      info!(rc = %path.display(), "loading config");
      cfg.load_file(&path)?;
    } else {
      debug!(
        "no config file found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  pub fn data_location(&self) -> PathBuf {
    let raw = self
      .get("data.location")
      .unwrap_or_else(|| {
        DEFAULT_DATA_PATH.to_string()
      });
    expand_tilde(Path::new(&raw))
  }

  pub fn storage_key(&self) -> String {
    self
      .get("storage.key")
      .filter(|key| !key.trim().is_empty())
      .unwrap_or_else(|| {
        MODE_STORAGE_KEY.to_string()
      })
  }

  pub fn state_file(
    &self
  ) -> anyhow::Result<PathBuf> {
    match self.get("state.file") {
      | Some(raw) => {
        Ok(expand_tilde(Path::new(&raw)))
      }
      | None => default_state_file()
    }
  }

  pub fn assets_dir(&self) -> String {
    self.get("assets.dir").unwrap_or_else(
      || DEFAULT_ASSET_DIR.to_string()
    )
  }

  pub fn default_mode(
    &self
  ) -> anyhow::Result<Granularity> {
    match self.get("default.mode") {
      | Some(raw) => raw
        .parse::<Granularity>()
        .context(
          "invalid default.mode setting"
        ),
      | None => Ok(Granularity::DEFAULT)
    }
  }

  pub fn color(
    &self
  ) -> anyhow::Result<bool> {
    let raw = self
      .get("color")
      .unwrap_or_else(|| "on".to_string());
    match raw
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "on" | "yes" | "true" | "1" => {
        Ok(true)
      }
      | "off" | "no" | "false" | "0" => {
        Ok(false)
      }
      | other => Err(anyhow!(
        "invalid color setting: {other}"
      ))
    }
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    if self.loaded_files.contains(&path)
    {
      warn!(file = %path.display(), "config include cycle; skipping");
      return Ok(());
    }

    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let line = raw_line
        .split_once('#')
        .map_or(raw_line, |(before, _)| {
          before
        })
        .trim();
      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) =
        line.strip_prefix("include ")
      {
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        debug!(
            file = %path.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );

        if include_path.exists() {
          self
            .load_file(&include_path)?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            line_num + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, value = %value, "loaded config key");
      self.map.insert(key, value);
    }

    Ok(())
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_rc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(rc_env) =
    std::env::var(CONFIG_ENV)
  {
    if rc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      rc_env
    )));
  }

  let Some(home) = dirs::home_dir()
  else {
    return Ok(None);
  };
  let candidate =
    home.join(".timeboardrc");
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn default_state_file()
-> anyhow::Result<PathBuf> {
  let home = dirs::home_dir()
    .ok_or_else(|| {
      anyhow!(
        "cannot determine home \
         directory"
      )
    })?;
  Ok(
    home
      .join(".timeboard")
      .join("state.toml")
  )
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let expanded =
    expand_tilde(Path::new(include));
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn defaults_use_canonical_key_and_path()
  {
    let cfg = Config::default();
    assert_eq!(cfg.storage_key(), "mode");
    assert_eq!(
      cfg.data_location(),
      PathBuf::from("./data.json")
    );
    assert_eq!(
      cfg.default_mode().expect("mode"),
      Granularity::Weekly
    );
    assert!(cfg.color().expect("color"));
  }

  #[test]
  fn file_includes_and_overrides() {
    let temp = tempdir().expect("tempdir");
    let extra = temp.path().join("extra.rc");
    fs::write(
      &extra,
      "assets.dir = /static/images\n"
    )
    .expect("write include");

    let rc = temp.path().join("timeboardrc");
    fs::write(
      &rc,
      "# dashboard settings\n\
       data.location = /srv/data.json  # served copy\n\
       default.mode = monthly\n\
       include extra.rc\n\
       include missing.rc\n"
    )
    .expect("write rc");

    let mut cfg =
      Config::load(Some(rc.as_path())).expect("load");
    assert_eq!(cfg.loaded_files.len(), 2);
    assert_eq!(
      cfg.data_location(),
      PathBuf::from("/srv/data.json")
    );
    assert_eq!(
      cfg.assets_dir(),
      "/static/images"
    );
    assert_eq!(
      cfg.default_mode().expect("mode"),
      Granularity::Monthly
    );

    cfg.apply_overrides([(
      "rc.color".to_string(),
      "off".to_string()
    )]);
    assert!(!cfg.color().expect("color"));
  }

  #[test]
  fn state_file_defaults_under_home() {
    let mut cfg = Config::default();
    assert_eq!(cfg.get("state.file"), None);
    if let Some(home) = dirs::home_dir() {
      assert_eq!(
        cfg.state_file().expect("state file"),
        home
          .join(".timeboard")
          .join("state.toml")
      );
    }

    cfg.apply_overrides([(
      "rc.state.file".to_string(),
      "/var/lib/timeboard.toml".to_string()
    )]);
    assert_eq!(
      cfg.state_file().expect("state file"),
      PathBuf::from("/var/lib/timeboard.toml")
    );
  }

  #[test]
  fn malformed_line_is_rejected() {
    let temp = tempdir().expect("tempdir");
    let rc = temp.path().join("timeboardrc");
    fs::write(&rc, "just words\n")
      .expect("write rc");
    let err = Config::load(Some(rc.as_path()))
      .expect_err("should fail");
    assert!(
      err
        .to_string()
        .contains("invalid config line")
    );
  }

  #[test]
  fn unknown_color_setting_is_an_error() {
    let mut cfg = Config::default();
    cfg.apply_overrides([(
      "color".to_string(),
      "maybe".to_string()
    )]);
    assert!(cfg.color().is_err());
  }

  #[test]
  fn bad_mode_setting_is_an_error() {
    let mut cfg = Config::default();
    cfg.apply_overrides([(
      "default.mode".to_string(),
      "hourly".to_string()
    )]);
    assert!(cfg.default_mode().is_err());
  }
}
