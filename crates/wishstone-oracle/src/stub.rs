//! Stub classifier.
//!
//! Returns a fixed label pair, or fails every call. Used when no language
//! model is configured (offline development, missing API key) and as a test
//! double. Every call is counted.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use wishstone_types::wish::{Classification, Sentiment, WishType};

use crate::{Classifier, OracleError, Result};

#[derive(Debug, Clone)]
enum Behaviour {
    Fixed(Classification),
    Fail(String),
}

/// A classifier with a hardcoded answer.
#[derive(Debug)]
pub struct StubClassifier {
    behaviour: Behaviour,
    calls: AtomicUsize,
}

impl StubClassifier {
    /// Always answers Material/Positive.
    pub fn new() -> Self {
        Self::fixed(Classification::new(WishType::Material, Sentiment::Positive))
    }

    /// Always answers `classification`.
    pub fn fixed(classification: Classification) -> Self {
        Self {
            behaviour: Behaviour::Fixed(classification),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call with [`OracleError::Unavailable`].
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            behaviour: Behaviour::Fail(reason.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `classify` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for StubClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, _text: &str) -> Result<Classification> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behaviour {
            Behaviour::Fixed(classification) => Ok(*classification),
            Behaviour::Fail(reason) => Err(OracleError::Unavailable(reason.clone())),
        }
    }
}
