//! X (Twitter) platform implementation
//!
//! Uses OAuth 1.0a user-context signing for every call:
//! - `GET /2/users/me` to verify credentials
//! - `POST /1.1/media/upload.json` (multipart) to upload images
//! - `POST /2/tweets` to publish

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::config::XCredentials;
use crate::error::{PlatformError, Result};
use crate::oauth::{authorization_header, Nonce};
use crate::platforms::Publisher;
use crate::types::MediaPayload;

pub const USERS_ME_URL: &str = "https://api.twitter.com/2/users/me";
pub const MEDIA_UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";
pub const TWEETS_URL: &str = "https://api.twitter.com/2/tweets";

/// X API client holding the signing credentials
pub struct XClient {
    http: reqwest::Client,
    credentials: XCredentials,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    data: UserData,
}

#[derive(Debug, Deserialize)]
struct UserData {
    username: String,
}

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

#[derive(Debug, Deserialize)]
struct TweetEnvelope {
    data: TweetData,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
}

impl XClient {
    pub fn new(credentials: XCredentials) -> Self {
        Self::with_http_client(reqwest::Client::new(), credentials)
    }

    pub fn with_http_client(http: reqwest::Client, credentials: XCredentials) -> Self {
        Self { http, credentials }
    }

    /// Start a request carrying a freshly signed `Authorization` header
    fn signed(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let header = authorization_header(
            &self.credentials,
            method.as_str(),
            url,
            &[],
            &Nonce::generate(),
        )?;
        Ok(self
            .http
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, header))
    }

    /// Send a request and decode a successful JSON response body
    async fn send_json<T>(&self, request: RequestBuilder, context: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = request
            .send()
            .await
            .map_err(|e| PlatformError::Network(format!("X {} request failed: {}", context, e)))?;

        let response = check_status(response, context).await?;

        let body = response.text().await.map_err(|e| {
            PlatformError::Network(format!("X {} response could not be read: {}", context, e))
        })?;
        debug!(context, body = %body, "X API response");

        serde_json::from_str(&body).map_err(|e| {
            PlatformError::Posting(format!(
                "X {} response parse error: {} (body: {})",
                context, e, body
            ))
            .into()
        })
    }
}

#[async_trait]
impl Publisher for XClient {
    async fn verify_credentials(&self) -> Result<String> {
        let request = self.signed(Method::GET, USERS_ME_URL)?;
        let user: UserEnvelope = self
            .send_json(request, "verify credentials")
            .await
            .map_err(|e| match e {
                // Any failure here means the account cannot be used
                crate::MissingcastError::Platform(PlatformError::Authentication(msg)) => {
                    PlatformError::Authentication(msg)
                }
                other => PlatformError::Authentication(other.to_string()),
            })?;

        Ok(format!("@{}", user.data.username))
    }

    async fn upload_media(&self, media: &MediaPayload) -> Result<String> {
        let file_name = format!("photo.{}", media.mime_type.extension());
        let part = Part::bytes(media.bytes.clone())
            .file_name(file_name)
            .mime_str(media.mime_type.as_str())
            .map_err(|e| PlatformError::Posting(format!("Invalid media MIME type: {}", e)))?;

        let form = Form::new()
            .text("media_category", "tweet_image")
            .part("media", part);

        let request = self.signed(Method::POST, MEDIA_UPLOAD_URL)?.multipart(form);
        let uploaded: MediaUploadResponse = self.send_json(request, "media upload").await?;

        Ok(uploaded.media_id_string)
    }

    async fn create_post(&self, text: &str, media_ids: &[String]) -> Result<String> {
        if text.trim().is_empty() {
            return Err(PlatformError::Validation("Post text cannot be empty".to_string()).into());
        }

        let request = self
            .signed(Method::POST, TWEETS_URL)?
            .json(&tweet_body(text, media_ids));
        let tweet: TweetEnvelope = self.send_json(request, "create post").await?;

        Ok(tweet.data.id)
    }

    fn name(&self) -> &str {
        "x"
    }
}

/// JSON body for `POST /2/tweets`
pub fn tweet_body(text: &str, media_ids: &[String]) -> Value {
    if media_ids.is_empty() {
        json!({ "text": text })
    } else {
        json!({ "text": text, "media": { "media_ids": media_ids } })
    }
}

/// Turn a non-success response into a `PlatformError`, logging the API detail
async fn check_status(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = summarize_api_error(&body);
    error!(
        context,
        status = status.as_u16(),
        detail = %detail,
        body = %body,
        "X API returned an error"
    );

    Err(map_status_error(status, context, &detail).into())
}

/// Map an HTTP error status to a `PlatformError`
///
/// - 401/403 → `Authentication`
/// - 429 → `RateLimit`
/// - 5xx → `Network`
/// - anything else → `Posting`
pub fn map_status_error(status: StatusCode, context: &str, detail: &str) -> PlatformError {
    let code = status.as_u16();
    match code {
        401 | 403 => PlatformError::Authentication(format!(
            "X {} rejected credentials (HTTP {}): {}. \
                Suggestion: Check API_KEY, API_KEY_SECRET, ACCESS_TOKEN and ACCESS_SECRET \
                and that the app has read and write permission.",
            context, code, detail
        )),
        429 => PlatformError::RateLimit(format!(
            "X {} rate limited (HTTP {}): {}",
            context, code, detail
        )),
        500..=599 => PlatformError::Network(format!(
            "X {} server error (HTTP {}): {}",
            context, code, detail
        )),
        _ => PlatformError::Posting(format!(
            "X {} failed (HTTP {}): {}",
            context, code, detail
        )),
    }
}

/// Pull a readable message out of an X error body
///
/// v2 endpoints answer with `{"title", "detail"}`, v1.1 endpoints with
/// `{"errors": [{"code", "message"}]}`. Anything else is returned as-is.
pub fn summarize_api_error(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    if let Some(detail) = value.get("detail").and_then(Value::as_str) {
        return match value.get("title").and_then(Value::as_str) {
            Some(title) => format!("{}: {}", title, detail),
            None => detail.to_string(),
        };
    }

    if let Some(errors) = value.get("errors").and_then(Value::as_array) {
        let messages: Vec<String> = errors
            .iter()
            .filter_map(|err| {
                let message = err.get("message").and_then(Value::as_str)?;
                Some(match err.get("code").and_then(Value::as_i64) {
                    Some(code) => format!("{} (code {})", message, code),
                    None => message.to_string(),
                })
            })
            .collect();
        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    body.trim().to_string()
}
