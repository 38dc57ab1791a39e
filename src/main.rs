use clap::Parser;
use sales_sync::config::cli::prompt_engine;
use sales_sync::utils::logger::{self, TracingLogger};
use sales_sync::{CliConfig, EtlEngine, SalesPipeline, Settings};
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting sales-sync CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let mut settings = match Settings::load(config.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    config.apply_to(&mut settings);

    // 未指定 --engine 時互動詢問
    let engine = match config.engine {
        Some(engine) => engine,
        None => match prompt_engine(std::io::stdin().lock(), std::io::stdout()) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!("❌ {}", e);
                return Ok(());
            }
        },
    };

    let logger = Arc::new(TracingLogger);
    let pipeline = SalesPipeline::new(engine, settings, logger.clone());
    let outcome = EtlEngine::new(pipeline, logger).run().await;

    // 失敗只透過日誌回報，不改變結束碼
    if outcome.is_success() {
        println!("✅ sales-sync {}", outcome);
    } else {
        println!("❌ sales-sync {}", outcome);
    }
    Ok(())
}
