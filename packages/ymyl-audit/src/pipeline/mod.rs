//! The audit pipeline - dispatch, parsing, sanitation, deduplication,
//! restoration and orchestration.

pub mod context;
pub mod dedup;
pub mod dispatch;
pub mod orchestrator;
pub mod parse;
pub mod restore;
pub mod sanitize;

pub use context::{build_analyzer_payload, harvest_global_lines, inject_global_context, GlobalContext};
pub use dedup::filter_violations;
pub use dispatch::{dispatch, RawAuditResult};
pub use orchestrator::Orchestrator;
pub use parse::{parse_to_violations, try_parse_violations};
pub use restore::restore_translations;
pub use sanitize::{sanitize, SanitizePolicy};
