use crate::domain::model::{BackendCredentials, DbCredentials};
use crate::utils::error::{Result, SyncError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SyncError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SyncError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

impl Validate for DbCredentials {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("host", &self.host)?;
        validate_non_empty_string("user", &self.user)?;
        validate_non_empty_string("database", &self.database)?;
        if self.port == Some(0) {
            return Err(SyncError::InvalidConfigValueError {
                field: "port".to_string(),
                value: "0".to_string(),
                reason: "Port must be between 1 and 65535".to_string(),
            });
        }
        Ok(())
    }
}

impl Validate for BackendCredentials {
    fn validate(&self) -> Result<()> {
        validate_url("SUPABASE_URL", &self.url)?;
        // 金鑰不顯示在錯誤訊息中
        if self.key.trim().is_empty() {
            return Err(SyncError::InvalidConfigValueError {
                field: "SUPABASE_KEY".to_string(),
                value: String::new(),
                reason: "API key cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
