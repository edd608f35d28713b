//! In-memory secret store for development and testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::{SecretError, SecretStore};

enum Entry {
    Value(Value),
    Failure(String),
}

/// Secrets held in process memory.
///
/// Counts every `get_secret` call so callers can assert how often the
/// backend was consulted. Entries registered with
/// [`with_failure`](Self::with_failure) fail like an unreachable backend.
#[derive(Default)]
pub struct StaticSecretStore {
    entries: HashMap<String, Entry>,
    fetches: AtomicUsize,
}

impl StaticSecretStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a secret document.
    pub fn with_secret(mut self, name: &str, value: Value) -> Self {
        self.entries.insert(name.to_string(), Entry::Value(value));
        self
    }

    /// Register a secret whose retrieval fails with `message`.
    pub fn with_failure(mut self, name: &str, message: &str) -> Self {
        self.entries
            .insert(name.to_string(), Entry::Failure(message.to_string()));
        self
    }

    /// Number of `get_secret` calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get_secret(&self, name: &str) -> Result<Value, SecretError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        match self.entries.get(name) {
            Some(Entry::Value(value)) => Ok(value.clone()),
            Some(Entry::Failure(message)) => Err(SecretError::Fetch {
                name: name.to_string(),
                message: message.clone(),
            }),
            None => Err(SecretError::Fetch {
                name: name.to_string(),
                message: "secret not found".to_string(),
            }),
        }
    }

    fn store_name(&self) -> &str {
        "StaticSecretStore"
    }
}
