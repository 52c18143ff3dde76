//! Submission records.

use serde::{Deserialize, Serialize};

use crate::wish::Classification;

/// A record ready to be appended to the store.
///
/// `client_ip` already holds the ciphertext; plaintext addresses never
/// reach this type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRecord {
    pub client_ip: String,
    pub user_text: String,
    pub classification: Classification,
    pub country_name: String,
    pub current_time: String,
    pub utc_time: String,
    pub timezone: String,
}

/// A stored record as read back from the `WishStone_Records` table.
///
/// Labels are kept as the raw column text so rows written by older
/// deployments are reported verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct RecordRow {
    #[ts(type = "number")]
    pub id: i64,
    /// Base64 ciphertext of the client IP.
    pub client_ip: String,
    pub user_text: String,
    pub wish_type: String,
    pub sentiment: String,
    pub country_name: String,
    pub current_time: String,
    pub utc_time: String,
    pub timezone: String,
}
