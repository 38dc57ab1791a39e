use crate::domain::model::{DbCredentials, Engine};
use crate::utils::error::{Result, SyncError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional TOML profile. Every field may be omitted; omitted fields keep
/// their default (or environment) value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncProfile {
    pub mysql: Option<DatabaseSection>,
    pub postgresql: Option<DatabaseSection>,
    pub firebird: Option<DatabaseSection>,
    pub supabase: Option<SupabaseSection>,
    pub target: Option<TargetSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupabaseSection {
    pub url: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSection {
    pub table: Option<String>,
    pub conflict_column: Option<String>,
}

impl DatabaseSection {
    pub fn merge_into(&self, creds: &mut DbCredentials) {
        if let Some(host) = &self.host {
            creds.host = host.clone();
        }
        if self.port.is_some() {
            creds.port = self.port;
        }
        if let Some(user) = &self.user {
            creds.user = user.clone();
        }
        if let Some(password) = &self.password {
            creds.password = password.clone();
        }
        if let Some(database) = &self.database {
            creds.database = database.clone();
        }
    }
}

impl SyncProfile {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P, F>(path: P, lookup: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content, lookup)
    }

    pub fn from_toml_str<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed = substitute_env_vars(content, lookup)?;
        toml::from_str(&processed).map_err(|e| SyncError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn section(&self, engine: Engine) -> Option<&DatabaseSection> {
        match engine {
            Engine::MySql => self.mysql.as_ref(),
            Engine::PostgreSql => self.postgresql.as_ref(),
            Engine::Firebird => self.firebird.as_ref(),
        }
    }
}

/// 替換 ${VAR_NAME}；未定義的變數保持原樣
fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| SyncError::ConfigError {
        message: format!("Invalid placeholder pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
    });

    Ok(result.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_expanded() {
        let profile = SyncProfile::from_toml_str(
            r#"
[supabase]
url = "https://abc.supabase.co"
key = "${TEST_SUPABASE_KEY}"

[firebird]
password = "${UNDEFINED_VAR}"
"#,
            |name| (name == "TEST_SUPABASE_KEY").then(|| "service-role".to_string()),
        )
        .unwrap();

        let supabase = profile.supabase.unwrap();
        assert_eq!(supabase.key.as_deref(), Some("service-role"));
        assert_eq!(
            profile.firebird.unwrap().password.as_deref(),
            Some("${UNDEFINED_VAR}")
        );
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let err = SyncProfile::from_toml_str("[oracle]\nhost = \"x\"\n", |_| None).unwrap_err();
        assert!(err.to_string().contains("TOML parsing error"));
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let section = DatabaseSection {
            port: Some(3050),
            ..Default::default()
        };
        let mut creds = DbCredentials {
            host: "localhost".to_string(),
            port: None,
            user: "SYSDBA".to_string(),
            password: "masterkey".to_string(),
            database: "banco_farmacia.fdb".to_string(),
        };
        section.merge_into(&mut creds);
        assert_eq!(creds.port, Some(3050));
        assert_eq!(creds.user, "SYSDBA");
    }
}
