use crate::domain::model::{DbCredentials, Engine, RawRow, RawValue};
use crate::domain::ports::{Connection, Connector};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use tokio_postgres::{Client, Config, NoTls, SimpleQueryMessage};

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresConnector;

pub struct PostgresConnection {
    client: Client,
}

#[async_trait(?Send)]
impl Connector for PostgresConnector {
    fn engine(&self) -> Engine {
        Engine::PostgreSql
    }

    async fn connect(&self, credentials: &DbCredentials) -> Result<Box<dyn Connection>> {
        let mut config = Config::new();
        config
            .host(&credentials.host)
            .user(&credentials.user)
            .password(&credentials.password)
            .dbname(&credentials.database);
        if let Some(port) = credentials.port {
            config.port(port);
        }

        let (client, connection) =
            config
                .connect(NoTls)
                .await
                .map_err(|e| SyncError::ConnectionError {
                    engine: Engine::PostgreSql,
                    message: e.to_string(),
                })?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Box::new(PostgresConnection { client }))
    }
}

#[async_trait(?Send)]
impl Connection for PostgresConnection {
    /// Uses the simple query protocol so NUMERIC sums arrive as text and are
    /// coerced by the transformer, whatever the column types are.
    async fn fetch_rows(&mut self, sql: &str) -> Result<Vec<RawRow>> {
        let messages = self
            .client
            .simple_query(sql)
            .await
            .map_err(|e| SyncError::QueryError {
                engine: Engine::PostgreSql,
                message: e.to_string(),
            })?;

        let rows = messages
            .into_iter()
            .filter_map(|message| match message {
                SimpleQueryMessage::Row(row) => Some(RawRow(
                    (0..row.len())
                        .map(|i| RawValue::from(row.get(i)))
                        .collect(),
                )),
                _ => None,
            })
            .collect();
        Ok(rows)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        // 丟棄 client 即結束背景連線任務
        drop(self.client);
        Ok(())
    }
}
