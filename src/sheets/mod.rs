pub mod auth;
pub mod worksheet;

pub use worksheet::{SheetReader, Worksheet};

use crate::fetch::Transport;
use crate::model::{Error, Result, Spreadsheet};
use reqwest::Url;

pub const DEFAULT_API_URL: &str = "https://sheets.googleapis.com/v4";

pub struct SheetsApi<T: Transport> {
    base_url: String,
    transport: T,
    identity: String,
}

impl<T: Transport> SheetsApi<T> {
    /// `identity` is the service account e-mail the sheet must be shared with.
    pub fn new(base_url: &str, transport: T, identity: impl ToString) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            identity: identity.to_string(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    fn titles_url(&self, sheet: &Spreadsheet) -> String {
        format!(
            "{}/spreadsheets/{}?fields=sheets.properties.title",
            self.base_url, sheet.id
        )
    }

    fn values_url(&self, sheet: &Spreadsheet, title: &str) -> Result<String> {
        let range = format!("'{}'", title.replace('\'', "''"));
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Input(format!("invalid sheets API url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| Error::Input(format!("`{}` cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .extend(["spreadsheets", sheet.id.as_str(), "values", range.as_str()]);
        Ok(url.to_string())
    }
}
