pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod form;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{connector_for, SupabaseClient};
pub use config::{Settings, SyncTarget};
pub use core::{etl::EtlEngine, pipeline::SalesPipeline};
pub use domain::model::{Engine, RunOutcome, SalesRecord, StopReason};
pub use form::SyncForm;
pub use utils::error::{Result, SyncError};
