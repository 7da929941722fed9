use super::{Page, Transport};
use crate::model::{Error, Result};
use reqwest::header::{ACCEPT, LINK, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

const AGENT: &str = concat!("sprint-dashboard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
enum Credentials {
    Basic { username: String, token: String },
    Bearer(String),
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    credentials: Credentials,
}

// New
impl HttpTransport {
    pub fn basic(client: Client, username: impl ToString, token: impl ToString) -> Self {
        Self {
            client,
            credentials: Credentials::Basic {
                username: username.to_string(),
                token: token.to_string(),
            },
        }
    }

    pub fn bearer(client: Client, token: impl ToString) -> Self {
        Self {
            client,
            credentials: Credentials::Bearer(token.to_string()),
        }
    }
}

impl HttpTransport {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Basic { username, token } => request.basic_auth(username, Some(token)),
            Credentials::Bearer(token) => request.bearer_auth(token),
        }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Page> {
        let request = self
            .client
            .get(url)
            .header(USER_AGENT, AGENT)
            .header(ACCEPT, "application/json");
        let response = self.authorize(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(status_error(status, url, &detail));
        }

        let next = response
            .headers()
            .get(LINK)
            .and_then(|link| link.to_str().ok())
            .and_then(parse_next_link);
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };
        Ok(Page::new(body, next))
    }
}

fn status_error(status: StatusCode, url: &str, detail: &str) -> Error {
    let message = remote_message(detail).unwrap_or_else(|| status.to_string());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Auth(format!("{url} answered {status}: {message}"))
        }
        StatusCode::NOT_FOUND => Error::NotFound(format!("{url}: {message}")),
        _ => Error::Transport(format!("{url} answered {status}: {message}")),
    }
}

/// GitHub reports `{"message": …}`, Google `{"error": {"message": …}}`.
fn remote_message(detail: &str) -> Option<String> {
    let body: Value = serde_json::from_str(detail).ok()?;
    body["message"]
        .as_str()
        .or_else(|| body["error"]["message"].as_str())
        .map(String::from)
}

/// Extracts the `rel="next"` target from an RFC 8288 `Link` header.
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim().replace(' ', "");
            param == "rel=\"next\"" || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(String::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_next_among_links() {
        let header = r#"<https://api.github.com/repositories/1/pulls?state=all&page=2>; rel="next", <https://api.github.com/repositories/1/pulls?state=all&page=5>; rel="last""#;
        assert_eq!(
            parse_next_link(header).as_deref(),
            Some("https://api.github.com/repositories/1/pulls?state=all&page=2")
        );
    }

    #[test]
    fn last_page_has_no_next() {
        let header = r#"<https://api.github.com/x?page=1>; rel="first", <https://api.github.com/x?page=4>; rel="prev""#;
        assert_eq!(parse_next_link(header), None);
        assert_eq!(parse_next_link(""), None);
    }

    #[test]
    fn maps_statuses_to_error_kinds() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "u", r#"{"message":"Bad credentials"}"#),
            Error::Auth(message) if message.contains("Bad credentials")
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "u", r#"{"error":{"message":"The caller does not have permission"}}"#),
            Error::Auth(message) if message.contains("permission")
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "u", ""),
            Error::NotFound(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "u", "<html>"),
            Error::Transport(_)
        ));
    }
}
