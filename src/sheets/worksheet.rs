use crate::fetch::{fetch_once, CallKind, FetchCache, FetchKey, Transport};
use crate::model::{Error, Result, Spreadsheet, SprintTaskRecord};
use crate::sheets::SheetsApi;
use indexmap::IndexMap;
use serde_json::Value;

pub const TASK_NAME: &str = "TASK_NAME";
pub const ASSIGNEE: &str = "ASSIGNEE";
pub const ESTIMATE: &str = "ESTIMATE";
pub const ACTUAL: &str = "ACTUAL";
pub const RISKS: &str = "RISKS";
const REQUIRED_COLUMNS: [&str; 5] = [TASK_NAME, ASSIGNEE, ESTIMATE, ACTUAL, RISKS];

#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    pub title: String,
    pub titles: Vec<String>,
    pub tasks: Vec<SprintTaskRecord>,
}

pub type MessageProgress<'a> = Box<dyn FnMut(String) + 'a>;

pub trait SheetReader {
    async fn read_worksheet<'a, T: Transport>(
        &self,
        api: &SheetsApi<T>,
        cache: &FetchCache,
        requested: Option<&str>,
        cb: MessageProgress<'a>,
    ) -> Result<Worksheet>;
}

impl SheetReader for Spreadsheet {
    async fn read_worksheet<'a, T: Transport>(
        &self,
        api: &SheetsApi<T>,
        cache: &FetchCache,
        requested: Option<&str>,
        mut cb: MessageProgress<'a>,
    ) -> Result<Worksheet> {
        let shared = |error: Error| match error {
            Error::Auth(_) => Error::Auth(format!(
                "spreadsheet `{}` is not shared with {}",
                self.id,
                api.identity()
            )),
            Error::NotFound(_) => Error::NotFound(format!("spreadsheet `{}`", self.id)),
            other => other,
        };

        cb("Listing worksheets ...".to_string());
        let body = fetch_once(
            api.transport(),
            cache,
            FetchKey::new(&self.id, CallKind::WorksheetTitles, &self.id),
            &api.titles_url(self),
        )
        .await
        .map_err(shared)?;
        let titles = worksheet_titles(&body);
        let title = select_worksheet(&titles, requested)?;

        cb(format!("Loading worksheet `{title}` ..."));
        let body = fetch_once(
            api.transport(),
            cache,
            FetchKey::new(&self.id, CallKind::WorksheetValues, &title),
            &api.values_url(self, &title)?,
        )
        .await
        .map_err(shared)?;
        let tasks = parse_tasks(worksheet_rows(&body))?;
        tracing::info!(spreadsheet = %self.id, worksheet = %title, tasks = tasks.len(), "loaded worksheet");

        Ok(Worksheet {
            title,
            titles,
            tasks,
        })
    }
}

fn worksheet_titles(body: &Value) -> Vec<String> {
    body["sheets"]
        .as_array()
        .map(|sheets| {
            sheets
                .iter()
                .filter_map(|sheet| sheet["properties"]["title"].as_str())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Without an explicit request the first worksheet is used.
fn select_worksheet(titles: &[String], requested: Option<&str>) -> Result<String> {
    match requested {
        Some(requested) => titles
            .iter()
            .find(|title| title.as_str() == requested)
            .cloned()
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "worksheet `{requested}` (available: {})",
                    titles.join(", ")
                ))
            }),
        None => titles
            .first()
            .cloned()
            .ok_or_else(|| Error::NotFound("the spreadsheet has no worksheets".into())),
    }
}

fn worksheet_rows(body: &Value) -> Vec<Vec<String>> {
    fn cell(value: &Value) -> String {
        match value {
            Value::String(text) => text.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
    body["values"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    row.as_array()
                        .map(|cells| cells.iter().map(cell).collect())
                        .unwrap_or_default()
                })
                .collect()
        })
        .unwrap_or_default()
}

/// The first row names the columns; every other row becomes one task.
pub fn parse_tasks(mut rows: Vec<Vec<String>>) -> Result<Vec<SprintTaskRecord>> {
    if rows.is_empty() {
        return Err(Error::Schema("the worksheet is empty".into()));
    }
    let header = rows.remove(0);

    let mut columns: IndexMap<String, usize> = IndexMap::new();
    for (index, name) in header.iter().enumerate() {
        columns
            .entry(name.trim().to_uppercase())
            .or_insert(index);
    }
    let missing = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !columns.contains_key(**name))
        .copied()
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(Error::Schema(format!(
            "missing column(s) {}",
            missing.join(", ")
        )));
    }

    let tasks = rows
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| {
            let cell = |name: &str| {
                columns
                    .get(name)
                    .and_then(|index| row.get(*index))
                    .map(String::as_str)
                    .unwrap_or_default()
            };
            SprintTaskRecord::new(
                cell(TASK_NAME),
                cell(ASSIGNEE),
                cell(ESTIMATE),
                cell(ACTUAL),
                cell(RISKS),
            )
        })
        .collect();
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::FakeTransport;
    use crate::model::RiskCategory;
    use serde_json::json;

    const API: &str = "https://sheets.test/v4";

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    fn sheet() -> Spreadsheet {
        Spreadsheet::parse("1Sheet").unwrap()
    }

    fn transport() -> FakeTransport {
        FakeTransport::default()
            .with_page(
                &format!("{API}/spreadsheets/1Sheet?fields=sheets.properties.title"),
                json!({"sheets": [
                    {"properties": {"title": "Sprint 1"}},
                    {"properties": {"title": "Sprint 2"}}
                ]}),
                None,
            )
            .with_page(
                &format!("{API}/spreadsheets/1Sheet/values/'Sprint%201'"),
                json!({"range": "'Sprint 1'!A1:Z100", "values": [
                    ["TASK_NAME", "ASSIGNEE", "ESTIMATE", "ACTUAL", "RISKS"],
                    ["Login page", "ann", "4", "5", "Risk"],
                    ["Signup", "bob", "6", "n/a", "No Risks"]
                ]}),
                None,
            )
            .with_page(
                &format!("{API}/spreadsheets/1Sheet/values/'Sprint%202'"),
                json!({"values": [["TASK_NAME", "OWNER"]]}),
                None,
            )
    }

    #[test]
    fn rows_become_records_keyed_by_header() {
        let tasks = parse_tasks(rows(&[
            &[" assignee", "Task_Name", "ESTIMATE", "ACTUAL", "RISKS", "NOTES"],
            &["ann", "Login", "4", "3.5", "RISK", "x"],
            &["bob", "Signup", "two", ""],
        ]))
        .unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task_name, "Login");
        assert_eq!(tasks[0].assignee, "ann");
        assert_eq!(tasks[0].actual_hours, Some(3.5));
        assert_eq!(tasks[0].risk_category, Some(RiskCategory::Risk));
        assert_eq!(tasks[1].estimate_hours, None);
        assert_eq!(tasks[1].actual_hours, None);
        assert_eq!(tasks[1].risk_category, None);
    }

    #[test]
    fn blank_rows_are_skipped() {
        let tasks = parse_tasks(rows(&[
            &["TASK_NAME", "ASSIGNEE", "ESTIMATE", "ACTUAL", "RISKS"],
            &["", " ", ""],
            &["Login", "ann", "1", "1", "risk"],
        ]))
        .unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn missing_columns_are_schema_errors() {
        let result = parse_tasks(rows(&[&["TASK_NAME", "ASSIGNEE", "ESTIMATE"]]));
        assert!(matches!(result, Err(Error::Schema(message)) if message.contains("ACTUAL, RISKS")));
        assert!(matches!(parse_tasks(vec![]), Err(Error::Schema(_))));
    }

    #[test]
    fn selects_first_worksheet_by_default() {
        let titles = vec!["A".to_string(), "B".to_string()];
        assert_eq!(select_worksheet(&titles, None).unwrap(), "A");
        assert_eq!(select_worksheet(&titles, Some("B")).unwrap(), "B");
        assert!(matches!(
            select_worksheet(&titles, Some("C")),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(select_worksheet(&[], None), Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn reads_selected_worksheet() {
        let api = SheetsApi::new(API, transport(), "viewer@example.iam.gserviceaccount.com");
        let cache = FetchCache::default();

        let worksheet = sheet()
            .read_worksheet(&api, &cache, None, Box::new(|_| {}))
            .await
            .unwrap();

        assert_eq!(worksheet.title, "Sprint 1");
        assert_eq!(worksheet.titles, ["Sprint 1", "Sprint 2"]);
        assert_eq!(worksheet.tasks.len(), 2);
        assert_eq!(worksheet.tasks[1].actual_hours, None);
    }

    #[tokio::test]
    async fn worksheet_with_wrong_columns_fails() {
        let api = SheetsApi::new(API, transport(), "viewer@example.iam.gserviceaccount.com");
        let cache = FetchCache::default();

        let result = sheet()
            .read_worksheet(&api, &cache, Some("Sprint 2"), Box::new(|_| {}))
            .await;
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[tokio::test]
    async fn unknown_worksheet_is_not_found() {
        let api = SheetsApi::new(API, transport(), "viewer@example.iam.gserviceaccount.com");
        let cache = FetchCache::default();

        let result = sheet()
            .read_worksheet(&api, &cache, Some("Backlog"), Box::new(|_| {}))
            .await;
        assert!(matches!(result, Err(Error::NotFound(message)) if message.contains("Sprint 2")));
    }

    #[tokio::test]
    async fn unshared_sheet_names_the_service_account() {
        let transport = FakeTransport::default().with_failure(
            &format!("{API}/spreadsheets/1Sheet?fields=sheets.properties.title"),
            Error::Auth,
        );
        let api = SheetsApi::new(API, transport, "viewer@example.iam.gserviceaccount.com");
        let cache = FetchCache::default();

        let result = sheet()
            .read_worksheet(&api, &cache, None, Box::new(|_| {}))
            .await;
        assert!(matches!(
            result,
            Err(Error::Auth(message)) if message.contains("viewer@example.iam.gserviceaccount.com")
        ));
    }

    #[test]
    fn quotes_worksheet_titles_in_ranges() {
        let api = SheetsApi::new(API, FakeTransport::default(), "x");
        assert_eq!(
            api.values_url(&sheet(), "Bob's sprint").unwrap(),
            format!("{API}/spreadsheets/1Sheet/values/'Bob''s%20sprint'")
        );
    }
}
