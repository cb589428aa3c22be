use std::future::Future;
use std::io;
use std::path::{
  Path,
  PathBuf
};

use tracing::{
  debug,
  error
};

use crate::model::CategoryRecord;

/// Where the dashboard data lives unless
/// configured otherwise.
pub const DEFAULT_DATA_PATH: &str =
  "./data.json";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  #[error("request failed: {0}")]
  Transport(String),
  #[error(
    "unexpected response status \
     {code} {text}"
  )]
  Status { code: u16, text: String },
  #[error("malformed category data: {0}")]
  Malformed(#[from] serde_json::Error)
}

/// Produces the category list. One
/// request per call, no retries.
pub trait DataSource {
  fn fetch(
    &self
  ) -> impl Future<
    Output = Result<
      Vec<CategoryRecord>,
      FetchError
    >
  >;
}

pub fn parse_categories(
  body: &[u8]
) -> Result<Vec<CategoryRecord>, FetchError>
{
  Ok(serde_json::from_slice(body)?)
}

/// Runs one fetch and flattens any
/// failure into `None` after logging it.
pub async fn fetch_categories<D>(
  source: &D
) -> Option<Vec<CategoryRecord>>
where
  D: DataSource
{
  match source.fetch().await {
    | Ok(records) => {
      debug!(
        count = records.len(),
        "fetched categories"
      );
      Some(records)
    }
    | Err(error) => {
      error!(
        %error,
        "failed fetching dashboard data"
      );
      None
    }
  }
}

/// Reads the category list from a file on
/// disk.
#[derive(Debug, Clone)]
pub struct FileSource {
  path: PathBuf
}

impl FileSource {
  pub fn new(
    path: impl Into<PathBuf>
  ) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl DataSource for FileSource {
  async fn fetch(
    &self
  ) -> Result<Vec<CategoryRecord>, FetchError>
  {
    let body = std::fs::read(&self.path)
      .map_err(|err| {
        match err.kind() {
          | io::ErrorKind::NotFound => {
            FetchError::Status {
              code: 404,
              text: format!(
                "{} not found",
                self.path.display()
              )
            }
          }
          | _ => FetchError::Transport(
            format!(
              "{}: {err}",
              self.path.display()
            )
          )
        }
      })?;
    parse_categories(&body)
  }
}
