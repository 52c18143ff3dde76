//! wishstone-daemon: HTTP service accepting wish submissions.
//!
//! Single OS process running a Tokio async runtime. The web frontend posts
//! submissions to `/process-all` and reads the latest ones back from
//! `/get-records`.

pub mod config;
pub mod gatekeeper;
pub mod http;
pub mod logging;

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use wishstone_crypto::{AesCbcCipher, IpCipher, KeyMaterial};
use wishstone_db::RecordStore;
use wishstone_oracle::{Classifier, OpenAiClassifier, OpenAiConfig, StubClassifier};

use crate::config::{ClassifierConfig, ClassifierProvider};
use crate::gatekeeper::{Gatekeeper, QuotaLimits};

/// Service-wide shared state.
pub struct AppState {
    /// Record store, also used directly by the read endpoint.
    pub store: Arc<dyn RecordStore>,
    /// Submission pipeline. `None` when no cipher could be built; reads
    /// still work but every submission is refused.
    pub gatekeeper: Option<Gatekeeper>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        cipher: Option<Arc<dyn IpCipher>>,
        classifier: Arc<dyn Classifier>,
        limits: QuotaLimits,
    ) -> Self {
        let gatekeeper =
            cipher.map(|cipher| Gatekeeper::new(store.clone(), cipher, classifier, limits));
        Self { store, gatekeeper }
    }
}

/// Build the IP cipher from `AES_KEY` / `AES_IV`.
///
/// On failure a freshly generated pair is logged at debug level so an
/// operator can provision it, and `None` is returned.
pub fn build_cipher() -> Option<Arc<dyn IpCipher>> {
    cipher_from(KeyMaterial::from_env())
}

fn cipher_from(material: wishstone_crypto::Result<KeyMaterial>) -> Option<Arc<dyn IpCipher>> {
    match material {
        Ok(material) => {
            info!("IP cipher ready");
            Some(Arc::new(AesCbcCipher::new(material)))
        }
        Err(e) => {
            error!("IP cipher unavailable, submissions disabled: {e}");
            let [key_line, iv_line] = KeyMaterial::generate().to_env_lines();
            debug!("Generated key material, add to environment:\n{key_line}\n{iv_line}");
            None
        }
    }
}

/// Build the classifier selected in the configuration.
///
/// A missing API key or a client that cannot be constructed yields an
/// always-failing classifier, so submissions are stored as Unknown/Unknown.
pub fn build_classifier(config: &ClassifierConfig) -> Arc<dyn Classifier> {
    match config.provider {
        ClassifierProvider::Stub => {
            info!("Using stub classifier");
            Arc::new(StubClassifier::new())
        }
        ClassifierProvider::Openai => {
            let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
            if api_key.trim().is_empty() {
                warn!(
                    "{} not set, text analysis disabled",
                    config.api_key_env
                );
                return Arc::new(StubClassifier::failing(format!(
                    "{} not set",
                    config.api_key_env
                )));
            }

            let openai = OpenAiConfig {
                endpoint: config.endpoint.clone(),
                model: config.model.clone(),
                temperature: config.temperature,
                timeout: std::time::Duration::from_secs(config.timeout_secs),
                api_key,
            };
            match OpenAiClassifier::new(openai) {
                Ok(classifier) => {
                    info!(model = %config.model, "Using OpenAI classifier");
                    Arc::new(classifier)
                }
                Err(e) => {
                    warn!("Classifier setup failed, text analysis disabled: {e}");
                    Arc::new(StubClassifier::failing(e.to_string()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wishstone_db::SqliteRecordStore;
    use wishstone_types::api::SubmissionRequest;

    use crate::gatekeeper::SubmissionOutcome;

    #[tokio::test]
    async fn test_state_without_cipher_has_no_gatekeeper() {
        let store = Arc::new(SqliteRecordStore::open_memory().expect("store"));
        let state = AppState::new(
            store,
            None,
            Arc::new(StubClassifier::new()),
            QuotaLimits::default(),
        );
        assert!(state.gatekeeper.is_none());
    }

    #[test]
    fn test_generated_key_material_reaches_log_file() {
        let data_dir = tempfile::tempdir().expect("tempdir");
        let dir = logging::log_dir(data_dir.path());
        let (subscriber, guard) = logging::subscriber("info", &dir).expect("subscriber");

        let cipher = tracing::subscriber::with_default(subscriber, || {
            cipher_from(KeyMaterial::from_lookup(|_| None))
        });
        drop(guard);
        assert!(cipher.is_none());

        let mut contents = String::new();
        for entry in std::fs::read_dir(&dir).expect("read log dir") {
            let path = entry.expect("entry").path();
            contents.push_str(&std::fs::read_to_string(&path).expect("read log"));
        }
        assert!(contents.contains("IP cipher unavailable"));
        assert!(contents.contains("AES_KEY="));
        assert!(contents.contains("AES_IV="));
    }

    #[test]
    fn test_valid_material_builds_cipher() {
        let material = KeyMaterial::from_encoded("MDEyMzQ1Njc4OWFiY2RlZg==", "ZmVkY2JhOTg3NjU0MzIxMA==");
        let cipher = cipher_from(material).expect("cipher");
        assert_eq!(
            cipher.encrypt("1.2.3.4").expect("encrypt"),
            "mSwzoHQ/Surs9GtapKdlyg=="
        );
    }

    #[tokio::test]
    async fn test_stub_provider() {
        let config = ClassifierConfig {
            provider: ClassifierProvider::Stub,
            ..ClassifierConfig::default()
        };
        let classifier = build_classifier(&config);
        let pair = classifier.classify("a new bike").await.expect("classify");
        assert!(pair.is_complete());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_every_call() {
        let config = ClassifierConfig {
            api_key_env: "WISHSTONE_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..ClassifierConfig::default()
        };
        let classifier = build_classifier(&config);
        assert!(classifier.classify("a new bike").await.is_err());
    }

    #[tokio::test]
    async fn test_state_with_cipher_accepts() {
        let store = Arc::new(SqliteRecordStore::open_memory().expect("store"));
        let cipher = Arc::new(AesCbcCipher::new(KeyMaterial::generate()));
        let state = AppState::new(
            store,
            Some(cipher),
            Arc::new(StubClassifier::new()),
            QuotaLimits::default(),
        );
        let gatekeeper = state.gatekeeper.as_ref().expect("gatekeeper");
        let request = SubmissionRequest {
            text: "I wish for a new bike".into(),
            ip_address: "1.2.3.4".into(),
            utc_time: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            ..SubmissionRequest::default()
        };
        assert!(matches!(
            gatekeeper.submit(&request).await,
            SubmissionOutcome::Accepted(_)
        ));
    }
}
