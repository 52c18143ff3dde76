//! # wishstone-types
//!
//! Shared domain types used across the Wishstone workspace.
//!
//! - [`wish`]: classification labels (`WishType`, `Sentiment`) and the pair
//!   that travels from the classifier to the record store
//! - [`record`]: submission records as written to and read from the store
//! - [`api`]: JSON bodies exchanged with the web frontend

pub mod api;
pub mod record;
pub mod wish;

/// Label stored when no classification is available.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Accepted submissions per calendar day across all clients.
pub const DEFAULT_GLOBAL_DAILY_LIMIT: u64 = 100;

/// Accepted submissions per calendar day for a single client IP.
pub const DEFAULT_PER_IP_DAILY_LIMIT: u64 = 1;

/// Number of rows returned by the recent-records read.
pub const RECENT_RECORDS_LIMIT: usize = 10;

/// Error returned when a label string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised {kind} label: {value:?}")]
pub struct LabelError {
    /// Which label family was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

#[cfg(test)]
mod tests {
    #[test]
    #[ignore] // Run manually to generate bindings
    fn export_ts_bindings() {
        use ts_rs::TS;
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../bindings");
        std::fs::create_dir_all(&dir).expect("create bindings dir");
        crate::api::SubmissionRequest::export_all_to(&dir).expect("export SubmissionRequest");
        crate::api::ProcessResponse::export_all_to(&dir).expect("export ProcessResponse");
        crate::api::RecordsResponse::export_all_to(&dir).expect("export RecordsResponse");
        crate::record::RecordRow::export_all_to(&dir).expect("export RecordRow");
    }
}
