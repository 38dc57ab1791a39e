use crate::domain::model::{BackendCredentials, SalesRecord, UpsertOutcome};
use crate::domain::ports::Logger;
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::Validate;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use url::Url;

/// PostgREST client for a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    rest_url: Url,
    client: Client,
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value).map_err(|_| SyncError::BackendError {
        message: format!("{} contains characters that are not allowed in an HTTP header", field),
    })?;
    header.set_sensitive(true);
    Ok(header)
}

impl SupabaseClient {
    pub fn connect(credentials: &BackendCredentials) -> Result<Self> {
        credentials
            .validate()
            .map_err(|e| SyncError::BackendError {
                message: e.to_string(),
            })?;

        let base = credentials.url.trim_end_matches('/');
        let rest_url = Url::parse(&format!("{}/rest/v1/", base)).map_err(|e| {
            SyncError::BackendError {
                message: format!("Invalid SUPABASE_URL: {}", e),
            }
        })?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value("SUPABASE_KEY", &credentials.key)?);
        headers.insert(
            AUTHORIZATION,
            header_value("SUPABASE_KEY", &format!("Bearer {}", credentials.key))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SyncError::BackendError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { rest_url, client })
    }

    pub fn table_url(&self, table: &str, conflict_column: &str) -> Result<Url> {
        let mut url = self.rest_url.join(table).map_err(|e| SyncError::UpsertError {
            table: table.to_string(),
            status: None,
            message: format!("invalid table name: {}", e),
        })?;
        url.query_pairs_mut().append_pair("on_conflict", conflict_column);
        Ok(url)
    }

    /// Inserts new rows and overwrites rows whose `conflict_column` matches.
    pub async fn upsert(
        &self,
        table: &str,
        records: &[SalesRecord],
        conflict_column: &str,
        logger: &dyn Logger,
    ) -> Result<UpsertOutcome> {
        if records.is_empty() {
            logger.info("No data to upsert into Supabase");
            return Ok(UpsertOutcome::Skipped);
        }

        let url = self.table_url(table, conflict_column)?;
        logger.debug(&format!("POST {} ({} records)", url, records.len()));

        let response = self
            .client
            .post(url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(records)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SyncError::UpsertError {
                table: table.to_string(),
                status: Some(status.as_u16()),
                message: error_message(&body).unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                }),
            });
        }

        // 2xx 但回應中仍帶有 error 欄位
        if let Some(message) = body_error(&body) {
            return Err(SyncError::UpsertError {
                table: table.to_string(),
                status: Some(status.as_u16()),
                message,
            });
        }

        logger.info(&format!(
            "✅ Upserted {} records into Supabase table '{}'",
            records.len(),
            table
        ));
        Ok(UpsertOutcome::Upserted(records.len()))
    }
}

/// PostgREST error bodies carry `message`, and sometimes `details` and `hint`.
fn error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = json
        .get("message")
        .or_else(|| json.get("error"))
        .and_then(|v| v.as_str())?;

    let mut text = message.to_string();
    for extra in ["details", "hint"] {
        if let Some(value) = json.get(extra).and_then(|v| v.as_str()) {
            text.push_str(&format!(" ({}: {})", extra, value));
        }
    }
    Some(text)
}

fn body_error(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    match json.get("error")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
