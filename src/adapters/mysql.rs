use crate::domain::model::{DbCredentials, Engine, RawRow, RawValue};
use crate::domain::ports::{Connection, Connector};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, OptsBuilder, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector;

pub struct MySqlConnection {
    conn: Conn,
}

#[async_trait(?Send)]
impl Connector for MySqlConnector {
    fn engine(&self) -> Engine {
        Engine::MySql
    }

    async fn connect(&self, credentials: &DbCredentials) -> Result<Box<dyn Connection>> {
        let mut opts = OptsBuilder::default()
            .ip_or_hostname(credentials.host.clone())
            .user(Some(credentials.user.clone()))
            .pass(Some(credentials.password.clone()))
            .db_name(Some(credentials.database.clone()));
        if let Some(port) = credentials.port {
            opts = opts.tcp_port(port);
        }

        let conn = Conn::new(opts).await.map_err(|e| SyncError::ConnectionError {
            engine: Engine::MySql,
            message: e.to_string(),
        })?;

        Ok(Box::new(MySqlConnection { conn }))
    }
}

fn to_raw_value(value: Value) -> RawValue {
    match value {
        Value::NULL => RawValue::Null,
        // DECIMAL 與文字都以位元組傳回；非 UTF-8 保留原樣交給轉換步驟拒絕
        Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => RawValue::Text(text),
            Err(e) => RawValue::Binary(e.into_bytes()),
        },
        Value::Int(n) => RawValue::Int(n),
        Value::UInt(n) => i64::try_from(n)
            .map(RawValue::Int)
            .unwrap_or_else(|_| RawValue::Text(n.to_string())),
        Value::Float(x) => RawValue::Float(f64::from(x)),
        Value::Double(x) => RawValue::Float(x),
        other => RawValue::Text(other.as_sql(true)),
    }
}

#[async_trait(?Send)]
impl Connection for MySqlConnection {
    async fn fetch_rows(&mut self, sql: &str) -> Result<Vec<RawRow>> {
        let rows: Vec<mysql_async::Row> =
            self.conn.query(sql).await.map_err(|e| SyncError::QueryError {
                engine: Engine::MySql,
                message: e.to_string(),
            })?;

        Ok(rows
            .into_iter()
            .map(|row| {
                RawRow(
                    row.unwrap_raw()
                        .into_iter()
                        .map(|value| value.map(to_raw_value).unwrap_or(RawValue::Null))
                        .collect(),
                )
            })
            .collect())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.conn
            .disconnect()
            .await
            .map_err(|e| SyncError::ConnectionError {
                engine: Engine::MySql,
                message: format!("Failed to close connection: {}", e),
            })
    }
}
