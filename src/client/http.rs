//! HTTP transport for the backend's procedure API.
//!
//! Queries are `GET {base}/api/trpc/{procedure}?input={json}`, mutations are
//! `POST {base}/api/trpc/{procedure}` with a JSON body. Successful responses
//! wrap the payload as `{"result": {"data": ...}}`, optionally with a
//! `{"json": ...}` layer; failures carry `{"error": {"message": ...}}`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::Url;

use super::{procedure, AnalyticsApi, DashboardStats, Entity, EntityApi};
use crate::aggregate::{DailyRollup, WeeklyRollup};
use crate::config::Config;
use crate::error::AppError;

const PROCEDURE_PREFIX: &str = "api/trpc/";

pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Self::with_client(client, base_url, token)
    }

    /// Use a preconfigured `reqwest::Client` (proxy, TLS or timeout settings).
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        token: Option<String>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            client,
            base_url: normalize_base(base_url)?,
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let base = config
            .api_base_url
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .ok_or(AppError::NotConfigured)?;
        Self::new(
            base,
            config.api_token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn procedure_url(&self, procedure: &str) -> Result<Url, AppError> {
        self.base_url
            .join(&format!("{}{}", PROCEDURE_PREFIX, procedure))
            .map_err(|e| AppError::Config(format!("Bad procedure URL: {}", e)))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Call a read-only procedure.
    pub async fn query<O: DeserializeOwned>(
        &self,
        procedure: &str,
        input: Option<Value>,
    ) -> Result<O, AppError> {
        let mut url = self.procedure_url(procedure)?;
        if let Some(input) = input {
            url.query_pairs_mut()
                .append_pair("input", &input.to_string());
        }
        log::debug!("query {}", procedure);
        let resp = self.authorize(self.client.get(url)).send().await?;
        Self::read_envelope(procedure, resp).await
    }

    /// Call a state-changing procedure.
    pub async fn mutation<O: DeserializeOwned>(
        &self,
        procedure: &str,
        input: Value,
    ) -> Result<O, AppError> {
        let url = self.procedure_url(procedure)?;
        log::debug!("mutation {}", procedure);
        let resp = self
            .authorize(self.client.post(url))
            .json(&input)
            .send()
            .await?;
        Self::read_envelope(procedure, resp).await
    }

    async fn read_envelope<O: DeserializeOwned>(
        procedure: &str,
        resp: reqwest::Response,
    ) -> Result<O, AppError> {
        let status = resp.status();
        let text = resp.text().await?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| status.to_string());
            log::warn!("{} failed with {}: {}", procedure, status, message);
            return Err(AppError::from_status(status.as_u16(), message));
        }

        let data = unwrap_envelope(body)?;
        serde_json::from_value(data)
            .map_err(|e| AppError::Decode(format!("{}: {}", procedure, e)))
    }

    /// Fetch a binary endpoint (calendar `.ics`, PDF or CSV export).
    pub async fn download(&self, path: &str) -> Result<DownloadedFile, AppError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::InvalidInput(format!("Bad download path '{}': {}", path, e)))?;

        let resp = self.authorize(self.client.get(url.clone())).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::from_status(status.as_u16(), text));
        }

        let headers = resp.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .or_else(|| {
                url.path_segments()
                    .and_then(|segments| segments.last().map(str::to_string))
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| "download".to_string());

        let bytes = resp.bytes().await?.to_vec();
        log::info!("Downloaded {} ({} bytes)", filename, bytes.len());

        Ok(DownloadedFile {
            filename,
            content_type,
            bytes,
        })
    }
}

/// A file fetched from a binary endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DownloadedFile {
    /// Write the file. A directory target gets the server-provided filename.
    pub fn save_to(&self, target: &Path) -> Result<PathBuf, AppError> {
        let path = if target.is_dir() {
            // Never let a server-provided name escape the target directory.
            let name = Path::new(&self.filename)
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "download".into());
            target.join(name)
        } else {
            target.to_path_buf()
        };
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

#[async_trait]
impl<T: Entity> EntityApi<T> for HttpClient {
    async fn list(&self) -> Result<Vec<T>, AppError> {
        self.query(&procedure::<T>("list"), None).await
    }

    async fn get_by_id(&self, id: &str) -> Result<T, AppError> {
        self.query(&procedure::<T>("getById"), Some(json!({ "id": id })))
            .await
    }

    async fn create(&self, record: T) -> Result<T, AppError> {
        self.mutation(&procedure::<T>("create"), serde_json::to_value(&record)?)
            .await
    }

    async fn update(&self, record: T) -> Result<T, AppError> {
        self.mutation(&procedure::<T>("update"), serde_json::to_value(&record)?)
            .await
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let _: Value = self
            .mutation(&procedure::<T>("delete"), json!({ "id": id }))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AnalyticsApi for HttpClient {
    async fn dashboard(&self) -> Result<DashboardStats, AppError> {
        self.query("analytics.dashboard", None).await
    }

    async fn daily_summary(&self, date: NaiveDate) -> Result<DailyRollup, AppError> {
        self.query(
            "analytics.dailySummary",
            Some(json!({ "date": date.format("%Y-%m-%d").to_string() })),
        )
        .await
    }

    async fn weekly_summary(&self, week_start: NaiveDate) -> Result<WeeklyRollup, AppError> {
        self.query(
            "analytics.weeklySummary",
            Some(json!({ "weekStart": week_start.format("%Y-%m-%d").to_string() })),
        )
        .await
    }
}

/// Ensure the base URL ends in `/` so `join` appends instead of replacing the
/// last path segment.
fn normalize_base(base: &str) -> Result<Url, AppError> {
    let trimmed = base.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Url::parse(&with_slash)
        .map_err(|e| AppError::Config(format!("Invalid apiBaseUrl '{}': {}", base, e)))
}

/// Pull the payload out of a success envelope.
pub fn unwrap_envelope(body: Value) -> Result<Value, AppError> {
    if let Some(message) = error_message(&body) {
        return Err(AppError::Remote {
            status: 200,
            message,
        });
    }

    let mut data = match body {
        Value::Object(mut map) => match map.remove("result") {
            Some(Value::Object(mut result)) => result.remove("data").unwrap_or(Value::Null),
            _ => {
                return Err(AppError::Decode(
                    "response has no result envelope".to_string(),
                ))
            }
        },
        _ => return Err(AppError::Decode("response is not a JSON object".to_string())),
    };

    // Serializer wrapper: {"json": payload, "meta": {...}}
    if let Value::Object(map) = &mut data {
        if map.contains_key("json") && map.keys().all(|k| k == "json" || k == "meta") {
            return Ok(map.remove("json").unwrap_or(Value::Null));
        }
    }
    Ok(data)
}

/// `error.message` (or `error.json.message`) from an error envelope.
pub fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    error
        .get("message")
        .or_else(|| error.get("json").and_then(|j| j.get("message")))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Filename from a `Content-Disposition` header value.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
