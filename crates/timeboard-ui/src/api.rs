use gloo::net::http::Request;
use timeboard_core::model::CategoryRecord;
use timeboard_core::source::{
  DataSource,
  FetchError,
  parse_categories
};

/// Fetches the category list over HTTP.
pub struct HttpSource {
  url: String
}

impl HttpSource {
  pub fn new(url: impl Into<String>) -> Self {
    Self { url: url.into() }
  }
}

impl DataSource for HttpSource {
  async fn fetch(
    &self
  ) -> Result<Vec<CategoryRecord>, FetchError>
  {
    let response = Request::get(&self.url)
      .send()
      .await
      .map_err(|err| {
        FetchError::Transport(
          err.to_string()
        )
      })?;

    if !response.ok() {
      return Err(FetchError::Status {
        code: response.status(),
        text: response.status_text()
      });
    }

    let body =
      response.binary().await.map_err(
        |err| {
          FetchError::Transport(
            err.to_string()
          )
        }
      )?;
    parse_categories(&body)
  }
}
