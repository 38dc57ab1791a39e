use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 支援的資料庫引擎
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    MySql,
    PostgreSql,
    Firebird,
}

impl Engine {
    /// 下拉選單與提示的順序
    pub const ALL: [Engine; 3] = [Engine::MySql, Engine::PostgreSql, Engine::Firebird];

    /// Maps the numeric menu choice (1-based) to an engine.
    pub fn from_choice(choice: u32) -> Option<Engine> {
        match choice {
            1 => Some(Engine::MySql),
            2 => Some(Engine::PostgreSql),
            3 => Some(Engine::Firebird),
            _ => None,
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Engine::MySql => "MySQL/MariaDB",
            Engine::PostgreSql => "PostgreSQL",
            Engine::Firebird => "Firebird",
        };
        f.write_str(label)
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Engine::MySql),
            "postgresql" | "postgres" => Ok(Engine::PostgreSql),
            "firebird" => Ok(Engine::Firebird),
            other => Err(format!(
                "unknown engine '{}', expected one of: mysql, postgresql, firebird",
                other
            )),
        }
    }
}

/// Connection parameters for one database engine.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbCredentials {
    pub host: String,
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    pub database: String,
}

// 避免密碼出現在日誌中
impl fmt::Debug for DbCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendCredentials {
    pub url: String,
    pub key: String,
}

impl fmt::Debug for BackendCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendCredentials")
            .field("url", &self.url)
            .field("key", &"***")
            .finish()
    }
}

/// A single value as handed back by a database driver.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    /// Bytes that are not valid UTF-8 text.
    Binary(Vec<u8>),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => f.write_str("NULL"),
            RawValue::Text(s) => write!(f, "{:?}", s),
            RawValue::Int(n) => write!(f, "{}", n),
            RawValue::Float(x) => write!(f, "{}", x),
            RawValue::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

/// One result row of the sales query: (product, quantity, total).
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow(pub Vec<RawValue>);

impl RawRow {
    pub fn get(&self, index: usize) -> Option<&RawValue> {
        self.0.get(index)
    }
}

impl fmt::Display for RawRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str(")")
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawRow {
    fn from(values: Vec<T>) -> Self {
        RawRow(values.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Null)
    }
}

/// Normalized row sent to the backend. Field names are the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "Produto")]
    pub product: String,
    #[serde(rename = "Quantidade_Vendida")]
    pub quantity_sold: i64,
    #[serde(rename = "Total_Vendas")]
    pub total_sales: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformResult {
    pub records: Vec<SalesRecord>,
    pub rejected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// 空批次，沒有發出請求
    Skipped,
    Upserted(usize),
}

/// Where a run stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    NoConnection,
    QueryFailed,
    NoRows,
    NoValidRecords,
    NoClient,
    UpsertFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { upserted: usize, rejected: usize },
    Stopped(StopReason),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Completed { upserted, rejected } => write!(
                f,
                "completed: {} records upserted, {} rows rejected",
                upserted, rejected
            ),
            RunOutcome::Stopped(reason) => write!(f, "stopped: {:?}", reason),
        }
    }
}
