use crate::config::Settings;
use crate::core::etl::EtlEngine;
use crate::core::pipeline::SalesPipeline;
use crate::core::{ConnectorFactory, Logger};
use crate::domain::model::{Engine, RunOutcome};
use crate::utils::logger::emit;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::Level;

/// Messages from the worker thread to the form thread.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Log(String),
    /// `None` when the worker died before producing an outcome.
    Finished(Option<RunOutcome>),
}

/// Sends panel lines over the channel and mirrors them to `tracing`.
pub struct ChannelLogger {
    tx: Sender<UiEvent>,
}

impl ChannelLogger {
    pub fn new(tx: Sender<UiEvent>) -> Self {
        Self { tx }
    }
}

pub fn format_line(level: Level, message: &str) -> String {
    format!(
        "{} - {} - {}",
        chrono::Local::now().format("%H:%M:%S"),
        level,
        message
    )
}

impl Logger for ChannelLogger {
    fn log(&self, level: Level, message: &str) {
        emit(level, message);
        // 面板只顯示 INFO 以上
        if level <= Level::INFO {
            // 表單已關閉時就丟棄
            let _ = self.tx.send(UiEvent::Log(format_line(level, message)));
        }
    }
}

/// Sends `Finished` when dropped, so the form hears back even if the run panics.
struct CompletionGuard {
    tx: Sender<UiEvent>,
    outcome: Option<RunOutcome>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(UiEvent::Finished(self.outcome.take()));
    }
}

/// Starts one background run. The worker owns its own single-threaded runtime.
pub fn spawn_run(
    engine: Engine,
    settings: Settings,
    connectors: ConnectorFactory,
    tx: Sender<UiEvent>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("sales-sync-worker".to_string())
        .spawn(move || {
            let mut guard = CompletionGuard {
                tx: tx.clone(),
                outcome: None,
            };
            let logger: Arc<dyn Logger> = Arc::new(ChannelLogger::new(tx));

            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    logger.error(&format!("Failed to start async runtime: {}", e));
                    return;
                }
            };

            let pipeline = SalesPipeline::new(engine, settings, logger.clone())
                .with_connector_factory(connectors);
            let outcome = runtime.block_on(EtlEngine::new(pipeline, logger).run());
            guard.outcome = Some(outcome);
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_channel_logger_skips_debug_lines() {
        let (tx, rx) = mpsc::channel();
        let logger = ChannelLogger::new(tx);
        logger.debug("Executing query");
        logger.warn("No data was extracted.");
        drop(logger);

        let events: Vec<UiEvent> = rx.iter().collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            UiEvent::Log(line) => assert!(line.ends_with("WARN - No data was extracted.")),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_guard_reports_panics() {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            let _guard = CompletionGuard { tx, outcome: None };
            panic!("driver blew up");
        });
        assert!(handle.join().is_err());
        assert_eq!(rx.recv().unwrap(), UiEvent::Finished(None));
    }
}
