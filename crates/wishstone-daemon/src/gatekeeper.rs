//! Submission gatekeeping and persistence pipeline.
//!
//! Each submission runs the same strictly ordered steps and stops at the
//! first rejection:
//!
//! 1. Global quota: today's record count must be below the global limit.
//! 2. Per-IP quota: today's count for the encrypted client IP must be below
//!    the per-IP limit.
//! 3. Classification: non-blank text goes to the classifier once; blank
//!    text or any classifier error yields Unknown/Unknown.
//! 4. Persistence: the IP is encrypted again and the record inserted.
//!
//! Quota counts are re-read from the store on every submission. Two
//! concurrent submissions from one IP can both pass step 2 before either
//! reaches step 4, so the per-IP limit can be exceeded under a race. No
//! store lock is held across the classifier call.

use std::sync::Arc;

use tracing::{debug, error, warn};
use wishstone_crypto::IpCipher;
use wishstone_db::RecordStore;
use wishstone_oracle::Classifier;
use wishstone_types::api::SubmissionRequest;
use wishstone_types::record::NewRecord;
use wishstone_types::wish::Classification;
use wishstone_types::{DEFAULT_GLOBAL_DAILY_LIMIT, DEFAULT_PER_IP_DAILY_LIMIT};

/// Daily submission caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaLimits {
    pub global_daily: u64,
    pub per_ip_daily: u64,
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            global_daily: DEFAULT_GLOBAL_DAILY_LIMIT,
            per_ip_daily: DEFAULT_PER_IP_DAILY_LIMIT,
        }
    }
}

/// How the labels of an accepted submission were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationOutcome {
    /// The classifier answered.
    Classified(Classification),
    /// Blank text; the classifier was not called.
    Skipped,
    /// The classifier failed; Unknown/Unknown stored instead.
    Degraded,
}

impl ClassificationOutcome {
    /// Labels to persist.
    pub fn labels(&self) -> Classification {
        match self {
            Self::Classified(classification) => *classification,
            Self::Skipped | Self::Degraded => Classification::unknown(),
        }
    }
}

/// A submission that passed both quota checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub classification: ClassificationOutcome,
    /// Id assigned by the store, or `None` if the insert failed.
    pub record_id: Option<i64>,
}

impl Accepted {
    pub fn persisted(&self) -> bool {
        self.record_id.is_some()
    }
}

/// Result of running one submission through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted(Accepted),
    GlobalQuotaExceeded { count: u64, limit: u64 },
    IpQuotaExceeded { count: u64, limit: u64 },
    /// A quota check could not be completed; the submission is denied.
    Failed(String),
}

/// Orchestrates quota checks, classification, encryption and storage.
#[derive(Clone)]
pub struct Gatekeeper {
    store: Arc<dyn RecordStore>,
    cipher: Arc<dyn IpCipher>,
    classifier: Arc<dyn Classifier>,
    limits: QuotaLimits,
}

impl Gatekeeper {
    pub fn new(
        store: Arc<dyn RecordStore>,
        cipher: Arc<dyn IpCipher>,
        classifier: Arc<dyn Classifier>,
        limits: QuotaLimits,
    ) -> Self {
        Self {
            store,
            cipher,
            classifier,
            limits,
        }
    }

    pub fn limits(&self) -> QuotaLimits {
        self.limits
    }

    /// Run one submission through the pipeline.
    pub async fn submit(&self, request: &SubmissionRequest) -> SubmissionOutcome {
        let global_count = match self.store.count_global_today().await {
            Ok(count) => count,
            Err(e) => {
                error!("Daily limit check failed: {e}");
                return SubmissionOutcome::Failed(format!("daily limit check failed: {e}"));
            }
        };
        if global_count >= self.limits.global_daily {
            warn!(
                count = global_count,
                limit = self.limits.global_daily,
                "Daily processing limit exceeded"
            );
            return SubmissionOutcome::GlobalQuotaExceeded {
                count: global_count,
                limit: self.limits.global_daily,
            };
        }

        let encrypted_ip = match self.cipher.encrypt(&request.ip_address) {
            Ok(ciphertext) => ciphertext,
            Err(e) => {
                error!("IP encryption for limit check failed: {e}");
                return SubmissionOutcome::Failed(format!("IP encryption failed: {e}"));
            }
        };
        let ip_count = match self.store.count_for_encrypted_ip_today(&encrypted_ip).await {
            Ok(count) => count,
            Err(e) => {
                error!("Per-IP limit check failed: {e}");
                return SubmissionOutcome::Failed(format!("per-IP limit check failed: {e}"));
            }
        };
        if ip_count >= self.limits.per_ip_daily {
            warn!(
                count = ip_count,
                limit = self.limits.per_ip_daily,
                "Per-IP daily limit exceeded"
            );
            return SubmissionOutcome::IpQuotaExceeded {
                count: ip_count,
                limit: self.limits.per_ip_daily,
            };
        }

        let classification = self.classify(&request.text).await;
        let record_id = self.persist(request, classification.labels()).await;

        SubmissionOutcome::Accepted(Accepted {
            classification,
            record_id,
        })
    }

    /// Single classifier attempt; failures fall back to Unknown/Unknown.
    async fn classify(&self, text: &str) -> ClassificationOutcome {
        if text.trim().is_empty() {
            return ClassificationOutcome::Skipped;
        }

        match self.classifier.classify(text).await {
            Ok(classification) if classification.is_complete() => {
                ClassificationOutcome::Classified(classification)
            }
            Ok(classification) => {
                error!(
                    "Text analysis returned an incomplete pair: {}/{}",
                    classification.wish_type, classification.sentiment
                );
                ClassificationOutcome::Degraded
            }
            Err(e) => {
                error!("Text analysis failed: {e}");
                debug!(
                    text_len = text.chars().count(),
                    sample = %text.chars().take(100).collect::<String>(),
                    "Text analysis attempt"
                );
                ClassificationOutcome::Degraded
            }
        }
    }

    /// Encrypt the IP and insert the record. `None` when either step fails.
    async fn persist(&self, request: &SubmissionRequest, labels: Classification) -> Option<i64> {
        let client_ip = match self.cipher.encrypt(&request.ip_address) {
            Ok(ciphertext) => ciphertext,
            Err(e) => {
                error!("IP encryption for insert failed: {e}");
                return None;
            }
        };

        let record = NewRecord {
            client_ip,
            user_text: request.text.clone(),
            classification: labels,
            country_name: request.country_name.clone(),
            current_time: request.current_time.clone(),
            utc_time: request.utc_time.clone(),
            timezone: request.timezone.clone(),
        };

        match self.store.insert(&record).await {
            Ok(id) => Some(id),
            Err(e) => {
                error!("Record insert failed: {e}");
                debug!(
                    user_text = %request.text.chars().take(50).collect::<String>(),
                    "Record insert attempt"
                );
                None
            }
        }
    }
}
