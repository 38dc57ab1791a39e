use crate::adapters::{connector_for, SupabaseClient};
use crate::config::Settings;
use crate::core::extract::{extract_data, SALES_QUERY};
use crate::core::transform::convert_rows;
use crate::core::{ConnectorFactory, Logger, Pipeline};
use crate::domain::model::{Engine, RawRow, SalesRecord, TransformResult, UpsertOutcome};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::sync::Arc;

/// Database → Supabase pipeline for one engine.
pub struct SalesPipeline {
    engine: Engine,
    settings: Settings,
    connectors: ConnectorFactory,
    logger: Arc<dyn Logger>,
}

impl SalesPipeline {
    pub fn new(engine: Engine, settings: Settings, logger: Arc<dyn Logger>) -> Self {
        Self {
            engine,
            settings,
            connectors: connector_for,
            logger,
        }
    }

    pub fn with_connector_factory(mut self, connectors: ConnectorFactory) -> Self {
        self.connectors = connectors;
        self
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }
}

#[async_trait::async_trait(?Send)]
impl Pipeline for SalesPipeline {
    async fn extract(&self) -> Result<Vec<RawRow>> {
        let credentials = self.settings.credentials(self.engine);
        credentials.validate()?;

        let connector = (self.connectors)(self.engine);
        self.logger.debug(&format!(
            "Connecting to {} at {} as {}",
            connector.engine(),
            credentials.host,
            credentials.user
        ));

        let mut connection = connector.connect(credentials).await?;
        self.logger
            .info(&format!("Connected to {} successfully.", connector.engine()));

        let rows = extract_data(connection.as_mut(), SALES_QUERY, self.logger.as_ref()).await;

        // 關閉失敗不影響已取得的資料
        if let Err(e) = connection.close().await {
            self.logger.warn(&e.to_string());
        }
        rows
    }

    async fn transform(&self, data: Vec<RawRow>) -> Result<TransformResult> {
        Ok(convert_rows(data, self.logger.as_ref()))
    }

    async fn load(&self, records: Vec<SalesRecord>) -> Result<UpsertOutcome> {
        let credentials = self.settings.backend_credentials()?;
        let client = SupabaseClient::connect(&credentials)?;
        self.logger.info("Connected to Supabase successfully.");

        let target = &self.settings.target;
        client
            .upsert(
                &target.table,
                &records,
                &target.conflict_column,
                self.logger.as_ref(),
            )
            .await
    }
}
