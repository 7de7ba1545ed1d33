//! Data models for the findoc pipeline.

pub mod config;
pub mod record;

pub use config::{ArtifactConfig, FindocConfig};
pub use record::{InvoiceRecord, TransactionType, SENTINEL_ORGANIZATION};
