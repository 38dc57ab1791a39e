#[cfg(feature = "cli")]
pub mod cli;
pub mod profile;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use profile::SyncProfile;

use crate::domain::model::{BackendCredentials, DbCredentials, Engine};
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::validate_required_field;
use std::path::Path;

pub const DEFAULT_TABLE: &str = "sales_summary";
pub const DEFAULT_CONFLICT_COLUMN: &str = "Produto";

/// Backend table the records are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub table: String,
    pub conflict_column: String,
}

impl Default for SyncTarget {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            conflict_column: DEFAULT_CONFLICT_COLUMN.to_string(),
        }
    }
}

/// Everything one run needs. Built from defaults, then an optional profile
/// file, then environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mysql: DbCredentials,
    pub postgresql: DbCredentials,
    pub firebird: DbCredentials,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub target: SyncTarget,
}

fn credentials(host: &str, user: &str, password: &str, database: &str) -> DbCredentials {
    DbCredentials {
        host: host.to_string(),
        port: None,
        user: user.to_string(),
        password: password.to_string(),
        database: database.to_string(),
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mysql: credentials("localhost", "root", "password", "banco_farmacia"),
            postgresql: credentials("localhost", "postgres", "password", "banco_farmacia_pg"),
            firebird: credentials("localhost", "SYSDBA", "masterkey", "banco_farmacia.fdb"),
            supabase_url: None,
            supabase_key: None,
            target: SyncTarget::default(),
        }
    }
}

/// 環境變數前綴
fn env_prefix(engine: Engine) -> &'static str {
    match engine {
        Engine::MySql => "MYSQL",
        Engine::PostgreSql => "POSTGRES",
        Engine::Firebird => "FIREBIRD",
    }
}

impl Settings {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    /// Defaults, then the profile at `path` (if any), then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        let mut settings = Self::default();
        if let Some(path) = path {
            tracing::debug!("Loading profile from {}", path.display());
            settings.apply_profile(SyncProfile::from_file(path, lookup)?);
        }
        settings.apply_env(lookup);
        Ok(settings)
    }

    pub fn credentials(&self, engine: Engine) -> &DbCredentials {
        match engine {
            Engine::MySql => &self.mysql,
            Engine::PostgreSql => &self.postgresql,
            Engine::Firebird => &self.firebird,
        }
    }

    pub fn credentials_mut(&mut self, engine: Engine) -> &mut DbCredentials {
        match engine {
            Engine::MySql => &mut self.mysql,
            Engine::PostgreSql => &mut self.postgresql,
            Engine::Firebird => &mut self.firebird,
        }
    }

    /// Both `SUPABASE_URL` and `SUPABASE_KEY` have to be present.
    pub fn backend_credentials(&self) -> Result<BackendCredentials> {
        let url = validate_required_field("SUPABASE_URL", &self.supabase_url)?;
        let key = validate_required_field("SUPABASE_KEY", &self.supabase_key)?;
        Ok(BackendCredentials {
            url: url.clone(),
            key: key.clone(),
        })
    }

    /// A malformed `*_PORT` is logged and skipped; the other variables still apply.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for engine in Engine::ALL {
            let prefix = env_prefix(engine);
            let creds = self.credentials_mut(engine);
            if let Some(host) = lookup(&format!("{}_HOST", prefix)) {
                creds.host = host;
            }
            if let Some(user) = lookup(&format!("{}_USER", prefix)) {
                creds.user = user;
            }
            if let Some(password) = lookup(&format!("{}_PASSWORD", prefix)) {
                creds.password = password;
            }
            if let Some(database) = lookup(&format!("{}_DATABASE", prefix)) {
                creds.database = database;
            }
            let port_key = format!("{}_PORT", prefix);
            if let Some(port) = lookup(&port_key) {
                match parse_port(&port_key, &port) {
                    Ok(port) => creds.port = Some(port),
                    Err(e) => tracing::warn!("Ignoring {}: {}", port_key, e),
                }
            }
        }

        // 空字串視為未設定
        if let Some(url) = lookup("SUPABASE_URL").filter(|v| !v.is_empty()) {
            self.supabase_url = Some(url);
        }
        if let Some(key) = lookup("SUPABASE_KEY").filter(|v| !v.is_empty()) {
            self.supabase_key = Some(key);
        }
    }

    pub fn apply_profile(&mut self, profile: SyncProfile) {
        for engine in Engine::ALL {
            if let Some(section) = profile.section(engine) {
                section.merge_into(self.credentials_mut(engine));
            }
        }
        if let Some(supabase) = profile.supabase {
            if supabase.url.is_some() {
                self.supabase_url = supabase.url;
            }
            if supabase.key.is_some() {
                self.supabase_key = supabase.key;
            }
        }
        if let Some(target) = profile.target {
            if let Some(table) = target.table {
                self.target.table = table;
            }
            if let Some(column) = target.conflict_column {
                self.target.conflict_column = column;
            }
        }
    }
}

fn parse_port(field: &str, value: &str) -> Result<u16> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|e| SyncError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: format!("Invalid port: {}", e),
        })
}
