use crate::core::{Logger, Pipeline};
use crate::domain::model::{RunOutcome, StopReason, UpsertOutcome};
use crate::utils::error::{ErrorCategory, SyncError};
use std::sync::Arc;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    logger: Arc<dyn Logger>,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P, logger: Arc<dyn Logger>) -> Self {
        Self { pipeline, logger }
    }

    fn stop(&self, reason: StopReason, error: Option<&SyncError>) -> RunOutcome {
        if let Some(e) = error {
            self.logger
                .debug(&format!("💡 Suggestion: {}", e.recovery_suggestion()));
        }
        RunOutcome::Stopped(reason)
    }

    /// Runs extract → transform → load once. Every failure is logged and
    /// turned into a `StopReason`; nothing is returned as an error.
    pub async fn run(&self) -> RunOutcome {
        self.logger.info("Starting sales sync...");

        // Extract
        let raw_data = match self.pipeline.extract().await {
            Ok(rows) => rows,
            Err(e @ SyncError::QueryError { .. }) => {
                self.logger.error(&format!("❌ Query failed: {}", e));
                return self.stop(StopReason::QueryFailed, Some(&e));
            }
            Err(e) if e.category() == ErrorCategory::Configuration => {
                self.logger
                    .error(&format!("❌ Invalid database settings: {}", e));
                return self.stop(StopReason::NoConnection, Some(&e));
            }
            Err(e) => {
                self.logger
                    .error(&format!("❌ Database connection failed: {}", e));
                return self.stop(StopReason::NoConnection, Some(&e));
            }
        };
        if raw_data.is_empty() {
            self.logger.warn("No data was extracted.");
            return self.stop(StopReason::NoRows, None);
        }

        // Transform
        let transformed = match self.pipeline.transform(raw_data).await {
            Ok(result) => result,
            Err(e) => {
                self.logger.error(&format!("❌ Transform failed: {}", e));
                return self.stop(StopReason::NoValidRecords, Some(&e));
            }
        };
        if transformed.records.is_empty() {
            self.logger.warn("No valid data to send to Supabase.");
            return self.stop(StopReason::NoValidRecords, None);
        }
        let rejected = transformed.rejected;

        // Load
        match self.pipeline.load(transformed.records).await {
            Ok(UpsertOutcome::Upserted(upserted)) => {
                self.logger.info(&format!(
                    "✅ Sync completed: {} records upserted, {} rows rejected",
                    upserted, rejected
                ));
                RunOutcome::Completed { upserted, rejected }
            }
            Ok(UpsertOutcome::Skipped) => {
                self.logger.warn(&format!(
                    "Sync finished without writing: no records were sent, {} rows rejected",
                    rejected
                ));
                RunOutcome::Completed {
                    upserted: 0,
                    rejected,
                }
            }
            Err(e) if e.category() == ErrorCategory::Transport => {
                self.logger
                    .error(&format!("❌ Error sending data to Supabase: {}", e));
                self.stop(StopReason::UpsertFailed, Some(&e))
            }
            Err(e) => {
                self.logger
                    .error(&format!("❌ Failed to connect to Supabase: {}", e));
                self.stop(StopReason::NoClient, Some(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Engine, RawRow, SalesRecord, TransformResult};
    use crate::utils::error::Result;
    use crate::utils::logger::CapturingLogger;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted pipeline that records which stages were reached.
    struct ScriptedPipeline {
        extract: fn() -> Result<Vec<RawRow>>,
        load: fn(usize) -> Result<UpsertOutcome>,
        transforms: AtomicUsize,
        loads: AtomicUsize,
    }

    impl ScriptedPipeline {
        fn new(extract: fn() -> Result<Vec<RawRow>>, load: fn(usize) -> Result<UpsertOutcome>) -> Self {
            Self {
                extract,
                load,
                transforms: AtomicUsize::new(0),
                loads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait(?Send)]
    impl Pipeline for ScriptedPipeline {
        async fn extract(&self) -> Result<Vec<RawRow>> {
            (self.extract)()
        }

        async fn transform(&self, data: Vec<RawRow>) -> Result<TransformResult> {
            self.transforms.fetch_add(1, Ordering::SeqCst);
            Ok(crate::core::transform::convert_rows(data, &CapturingLogger::new()))
        }

        async fn load(&self, records: Vec<SalesRecord>) -> Result<UpsertOutcome> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            (self.load)(records.len())
        }
    }

    fn two_rows() -> Result<Vec<RawRow>> {
        Ok(vec![
            RawRow::from(vec!["Paracetamol", "10", "100.0"]),
            RawRow::from(vec!["Ibuprofeno", "5", "50.0"]),
        ])
    }

    fn upserted(n: usize) -> Result<UpsertOutcome> {
        Ok(UpsertOutcome::Upserted(n))
    }

    #[tokio::test]
    async fn test_completed_run() {
        let logger = Arc::new(CapturingLogger::new());
        let engine = EtlEngine::new(ScriptedPipeline::new(two_rows, upserted), logger.clone());

        let outcome = engine.run().await;

        assert_eq!(outcome, RunOutcome::Completed { upserted: 2, rejected: 0 });
        assert!(logger.contains("Sync completed"));
    }

    #[tokio::test]
    async fn test_connection_failure_stops_before_transform() {
        let logger = Arc::new(CapturingLogger::new());
        let pipeline = ScriptedPipeline::new(
            || {
                Err(SyncError::ConnectionError {
                    engine: Engine::PostgreSql,
                    message: "connection refused".to_string(),
                })
            },
            upserted,
        );
        let engine = EtlEngine::new(pipeline, logger.clone());

        let outcome = engine.run().await;

        assert_eq!(outcome, RunOutcome::Stopped(StopReason::NoConnection));
        assert_eq!(engine.pipeline.transforms.load(Ordering::SeqCst), 0);
        assert!(logger.contains("Database connection failed"));
    }

    #[tokio::test]
    async fn test_query_failure_and_empty_result_are_distinct() {
        let logger = Arc::new(CapturingLogger::new());
        let failed = EtlEngine::new(
            ScriptedPipeline::new(
                || {
                    Err(SyncError::QueryError {
                        engine: Engine::MySql,
                        message: "Table 'vendas' doesn't exist".to_string(),
                    })
                },
                upserted,
            ),
            logger.clone(),
        );
        assert_eq!(failed.run().await, RunOutcome::Stopped(StopReason::QueryFailed));

        let empty = EtlEngine::new(ScriptedPipeline::new(|| Ok(Vec::new()), upserted), logger.clone());
        assert_eq!(empty.run().await, RunOutcome::Stopped(StopReason::NoRows));
        assert_eq!(empty.pipeline.transforms.load(Ordering::SeqCst), 0);
        assert_eq!(empty.pipeline.loads.load(Ordering::SeqCst), 0);

        assert!(logger.contains("Query failed"));
        assert!(logger.contains("No data was extracted"));
    }

    #[tokio::test]
    async fn test_all_rows_rejected_stops_before_load() {
        let logger = Arc::new(CapturingLogger::new());
        let engine = EtlEngine::new(
            ScriptedPipeline::new(|| Ok(vec![RawRow::from(vec!["X", "bad", "1.0"])]), upserted),
            logger.clone(),
        );

        assert_eq!(engine.run().await, RunOutcome::Stopped(StopReason::NoValidRecords));
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 0);
        assert!(logger.contains("No valid data"));
    }

    #[tokio::test]
    async fn test_skipped_load_is_logged() {
        let logger = Arc::new(CapturingLogger::new());
        let engine = EtlEngine::new(
            ScriptedPipeline::new(two_rows, |_| Ok(UpsertOutcome::Skipped)),
            logger.clone(),
        );

        assert_eq!(engine.run().await, RunOutcome::Completed { upserted: 0, rejected: 0 });
        assert!(logger.contains("no records were sent"));
        assert!(!logger.contains("Sync completed"));
    }

    #[tokio::test]
    async fn test_invalid_database_settings_stop_as_no_connection() {
        let logger = Arc::new(CapturingLogger::new());
        let engine = EtlEngine::new(
            ScriptedPipeline::new(
                || {
                    Err(SyncError::InvalidConfigValueError {
                        field: "host".to_string(),
                        value: String::new(),
                        reason: "Value cannot be empty or whitespace-only".to_string(),
                    })
                },
                upserted,
            ),
            logger.clone(),
        );

        assert_eq!(engine.run().await, RunOutcome::Stopped(StopReason::NoConnection));
        assert!(logger.contains("Invalid database settings"));
        assert!(!logger.contains("Database connection failed"));
    }

    #[tokio::test]
    async fn test_load_failures_are_classified() {
        let logger = Arc::new(CapturingLogger::new());

        let no_client = EtlEngine::new(
            ScriptedPipeline::new(two_rows, |_| {
                Err(SyncError::MissingConfigError {
                    field: "SUPABASE_URL".to_string(),
                })
            }),
            logger.clone(),
        );
        assert_eq!(no_client.run().await, RunOutcome::Stopped(StopReason::NoClient));

        let rejected = EtlEngine::new(
            ScriptedPipeline::new(two_rows, |_| {
                Err(SyncError::UpsertError {
                    table: "sales_summary".to_string(),
                    status: Some(401),
                    message: "Invalid API key".to_string(),
                })
            }),
            logger.clone(),
        );
        assert_eq!(rejected.run().await, RunOutcome::Stopped(StopReason::UpsertFailed));

        let bad_table = EtlEngine::new(
            ScriptedPipeline::new(two_rows, |_| {
                Err(SyncError::UpsertError {
                    table: "//[bad".to_string(),
                    status: None,
                    message: "invalid table name".to_string(),
                })
            }),
            logger.clone(),
        );
        assert_eq!(bad_table.run().await, RunOutcome::Stopped(StopReason::UpsertFailed));

        assert!(logger.contains("Failed to connect to Supabase"));
        assert!(logger.contains("Error sending data to Supabase"));
    }
}
