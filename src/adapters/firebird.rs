use crate::domain::model::{DbCredentials, Engine, RawRow, RawValue};
use crate::domain::ports::{Connection, Connector};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use rsfbclient::prelude::*;
use rsfbclient::{Row, SimpleConnection, SqlType};

/// Firebird over the pure-Rust wire client, so no fbclient library is needed.
/// The client is blocking; calls run in place on the pipeline's thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirebirdConnector;

pub struct FirebirdConnection {
    conn: SimpleConnection,
}

#[async_trait(?Send)]
impl Connector for FirebirdConnector {
    fn engine(&self) -> Engine {
        Engine::Firebird
    }

    async fn connect(&self, credentials: &DbCredentials) -> Result<Box<dyn Connection>> {
        let mut builder = rsfbclient::builder_pure_rust();
        builder
            .host(credentials.host.as_str())
            .db_name(credentials.database.as_str())
            .user(credentials.user.as_str())
            .pass(credentials.password.as_str());
        if let Some(port) = credentials.port {
            builder.port(port);
        }

        let conn = builder.connect().map_err(|e| SyncError::ConnectionError {
            engine: Engine::Firebird,
            message: e.to_string(),
        })?;

        Ok(Box::new(FirebirdConnection { conn: conn.into() }))
    }
}

fn to_raw_value(value: SqlType) -> RawValue {
    match value {
        SqlType::Null => RawValue::Null,
        SqlType::Text(s) => RawValue::Text(s),
        SqlType::Integer(n) => RawValue::Int(n),
        SqlType::Floating(x) => RawValue::Float(x),
        SqlType::Binary(bytes) => RawValue::Binary(bytes),
        other => RawValue::Text(format!("{:?}", other)),
    }
}

#[async_trait(?Send)]
impl Connection for FirebirdConnection {
    async fn fetch_rows(&mut self, sql: &str) -> Result<Vec<RawRow>> {
        let rows: Vec<Row> = self
            .conn
            .query(sql, ())
            .map_err(|e| SyncError::QueryError {
                engine: Engine::Firebird,
                message: e.to_string(),
            })?;

        Ok(rows
            .into_iter()
            .map(|row| RawRow(row.cols.into_iter().map(|col| to_raw_value(col.value)).collect()))
            .collect())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.conn.close().map_err(|e| SyncError::ConnectionError {
            engine: Engine::Firebird,
            message: format!("Failed to close connection: {}", e),
        })
    }
}
