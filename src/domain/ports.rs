use crate::domain::model::{
    DbCredentials, Engine, RawRow, SalesRecord, TransformResult, UpsertOutcome,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use tracing::Level;

// Firebird 的驅動是同步且不保證 Send，因此資料庫相關的 future 都在原執行緒上驅動。

#[async_trait(?Send)]
pub trait Connector {
    fn engine(&self) -> Engine;
    async fn connect(&self, credentials: &DbCredentials) -> Result<Box<dyn Connection>>;
}

#[async_trait(?Send)]
pub trait Connection {
    async fn fetch_rows(&mut self, sql: &str) -> Result<Vec<RawRow>>;
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Picks the connector implementation for an engine.
pub type ConnectorFactory = fn(Engine) -> Box<dyn Connector>;

#[async_trait(?Send)]
pub trait Pipeline {
    async fn extract(&self) -> Result<Vec<RawRow>>;
    async fn transform(&self, data: Vec<RawRow>) -> Result<TransformResult>;
    async fn load(&self, records: Vec<SalesRecord>) -> Result<UpsertOutcome>;
}

/// Log sink handed to each component instead of a process-wide logger.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }
}
