#![allow(dead_code)]

use async_trait::async_trait;
use sales_sync::core::{Connection, Connector};
use sales_sync::domain::model::{DbCredentials, Engine, RawRow};
use sales_sync::{Result, Settings, SyncError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory database: serves scripted rows and counts queries.
pub struct FakeConnector {
    engine: Engine,
    rows: fn() -> Result<Vec<RawRow>>,
    queries: &'static AtomicUsize,
}

impl FakeConnector {
    pub fn boxed(
        engine: Engine,
        rows: fn() -> Result<Vec<RawRow>>,
        queries: &'static AtomicUsize,
    ) -> Box<dyn Connector> {
        Box::new(Self {
            engine,
            rows,
            queries,
        })
    }
}

struct FakeConnection {
    rows: fn() -> Result<Vec<RawRow>>,
    queries: &'static AtomicUsize,
}

#[async_trait(?Send)]
impl Connector for FakeConnector {
    fn engine(&self) -> Engine {
        self.engine
    }

    async fn connect(&self, _credentials: &DbCredentials) -> Result<Box<dyn Connection>> {
        Ok(Box::new(FakeConnection {
            rows: self.rows,
            queries: self.queries,
        }))
    }
}

#[async_trait(?Send)]
impl Connection for FakeConnection {
    async fn fetch_rows(&mut self, _sql: &str) -> Result<Vec<RawRow>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        (self.rows)()
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

/// Database that refuses every connection.
pub struct UnreachableConnector(pub Engine);

#[async_trait(?Send)]
impl Connector for UnreachableConnector {
    fn engine(&self) -> Engine {
        self.0
    }

    async fn connect(&self, credentials: &DbCredentials) -> Result<Box<dyn Connection>> {
        Err(SyncError::ConnectionError {
            engine: self.0,
            message: format!("could not reach {}", credentials.host),
        })
    }
}

pub fn two_sales_rows() -> Result<Vec<RawRow>> {
    Ok(vec![
        RawRow::from(vec!["Paracetamol", "10", "100.0"]),
        RawRow::from(vec!["Dipirona", "4", "39.6"]),
    ])
}

pub fn mixed_sales_rows() -> Result<Vec<RawRow>> {
    Ok(vec![
        RawRow::from(vec!["Paracetamol", "10", "100.0"]),
        RawRow::from(vec!["Ibuprofeno", "bad", "50.0"]),
    ])
}

pub fn no_rows() -> Result<Vec<RawRow>> {
    Ok(Vec::new())
}

pub fn settings_for(supabase_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.supabase_url = Some(supabase_url.to_string());
    settings.supabase_key = Some("service-key".to_string());
    settings
}
