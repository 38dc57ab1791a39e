pub mod etl;
pub mod extract;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{RawRow, SalesRecord, TransformResult};
pub use crate::domain::ports::{Connection, Connector, ConnectorFactory, Logger, Pipeline};
pub use crate::utils::error::Result;
