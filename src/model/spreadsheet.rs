use crate::model::{Error, Result};

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Spreadsheet {
    pub id: String,
}

impl Spreadsheet {
    /// Accepts a sheet URL (`.../spreadsheets/d/{id}/edit#gid=0`) or a bare id.
    pub fn parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        let id = match reference.split_once("/spreadsheets/d/") {
            Some((_, rest)) => rest
                .split(['/', '?', '#'])
                .next()
                .unwrap_or_default(),
            None if reference.contains('/') => {
                return Err(Error::Input(format!(
                    "`{reference}` is not a Google Sheets URL"
                )))
            }
            None => reference,
        };
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        {
            return Err(Error::Input(format!(
                "`{reference}` does not contain a spreadsheet id"
            )));
        }
        Ok(Self { id: id.to_string() })
    }
}
