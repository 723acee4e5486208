//! Domain data types: chunk documents, violations, results, configuration.

pub mod chunk;
pub mod config;
pub mod result;
pub mod violation;

pub use chunk::{BigChunk, ChunkDocument};
pub use config::{AuditConfig, ExtractionMode};
pub use result::{AnalysisResult, AuditDebugRecord, DebugBundle};
pub use violation::{PageNumber, Severity, Violation};
