use crate::model::{Error, GoogleSecrets, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Debug, Serialize, PartialEq)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

fn claims(secrets: &GoogleSecrets, now: DateTime<Utc>) -> Claims<'_> {
    Claims {
        iss: &secrets.client_email,
        scope: READONLY_SCOPE,
        aud: &secrets.token_uri,
        iat: now.timestamp(),
        exp: (now + Duration::hours(1)).timestamp(),
    }
}

/// Signed RS256 assertion identifying the service account.
fn assertion(secrets: &GoogleSecrets, now: DateTime<Utc>) -> Result<String> {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = secrets.private_key_id.clone();
    let key = EncodingKey::from_rsa_pem(secrets.private_key.as_bytes())?;
    Ok(jsonwebtoken::encode(&header, &claims(secrets, now), &key)?)
}

pub async fn access_token(client: &Client, secrets: &GoogleSecrets) -> Result<String> {
    let assertion = assertion(secrets, Utc::now())?;
    let response = client
        .post(&secrets.token_uri)
        .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(Error::Auth(format!(
            "service account {} was refused a token ({status}): {detail}",
            secrets.client_email
        )));
    }
    let token: TokenResponse = response.json().await?;
    tracing::debug!(account = %secrets.client_email, "obtained sheets access token");
    Ok(token.access_token)
}
