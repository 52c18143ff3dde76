//! JSON bodies of the HTTP API.

use serde::{Deserialize, Serialize};

use crate::record::RecordRow;

/// Body of `POST /process-all`.
///
/// Every field is optional on the wire and defaults to an empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(default)]
pub struct SubmissionRequest {
    pub text: String,
    pub ip_address: String,
    pub timezone: String,
    pub current_time: String,
    pub utc_time: String,
    pub country_name: String,
}

/// Response of `POST /process-all`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct ProcessResponse {
    pub success: bool,
    pub message: String,
    /// Present only when the submission got as far as the insert.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub database_saved: Option<bool>,
}

impl ProcessResponse {
    /// A rejected or failed submission.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            database_saved: None,
        }
    }

    /// An accepted submission, with the outcome of the insert.
    pub fn accepted(message: impl Into<String>, database_saved: bool) -> Self {
        Self {
            success: true,
            message: message.into(),
            database_saved: Some(database_saved),
        }
    }
}

/// Response of `GET /get-records`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct RecordsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub records: Option<Vec<RecordRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional, as = "Option<u32>")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub message: Option<String>,
}

impl RecordsResponse {
    /// Successful read.
    pub fn found(records: Vec<RecordRow>) -> Self {
        Self {
            success: true,
            count: Some(records.len()),
            records: Some(records),
            message: None,
        }
    }

    /// Failed read.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            records: None,
            count: None,
            message: Some(message.into()),
        }
    }
}
