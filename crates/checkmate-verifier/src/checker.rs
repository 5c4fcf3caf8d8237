//! Create → verify → update pipeline

use crate::engine::VerificationEngine;
use crate::error::CheckError;
use checkmate_domain::{ClaimStore, FactCheckId, FactCheckRecord};
use checkmate_llm::ChatModel;
use checkmate_search::SearchTool;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{error, info};

/// Runs fact checks against a store
///
/// The store is synchronous; every call runs on the blocking thread pool.
pub struct FactChecker<M, S, St> {
    engine: Arc<VerificationEngine<M, S>>,
    store: Arc<St>,
}

impl<M, S, St> FactChecker<M, S, St>
where
    M: ChatModel + 'static,
    S: SearchTool + 'static,
    St: ClaimStore + Send + Sync + 'static,
    St::Error: Display + Send + 'static,
{
    /// Create a new checker
    pub fn new(engine: VerificationEngine<M, S>, store: Arc<St>) -> Self {
        Self {
            engine: Arc::new(engine),
            store,
        }
    }

    /// The verification engine
    pub fn engine(&self) -> &VerificationEngine<M, S> {
        self.engine.as_ref()
    }

    /// The record store
    pub fn store(&self) -> &Arc<St> {
        &self.store
    }

    /// Check one claim and return the resolved record
    ///
    /// The pending record is visible to readers as soon as it is created.
    /// Model and search faults produce a record with status `error`; only
    /// store failures are returned as errors.
    ///
    /// Once the record exists, verification and the terminal write run on
    /// their own task. Dropping the returned future does not stop them, so
    /// a created record always leaves `pending`.
    pub async fn check(&self, claim: &str) -> Result<FactCheckRecord, CheckError> {
        let claim = claim.trim();
        if claim.is_empty() {
            return Err(CheckError::EmptyClaim);
        }

        let owned = claim.to_string();
        let id = self
            .blocking(move |store| store.create(&owned))
            .await
            .map_err(CheckError::Create)?;
        info!(id = %id, "Fact check created");

        let engine = Arc::clone(&self.engine);
        let store = Arc::clone(&self.store);
        let claim = claim.to_string();
        let resolve = tokio::spawn(async move {
            let resolution = engine.verify(&claim).await.to_resolution();
            run_blocking(store, move |store| store.update(id, &resolution)).await
        });

        resolve
            .await
            .map_err(|e| format!("Verification task failed: {}", e))
            .and_then(|written| written)
            .map_err(|message| {
                error!(id = %id, error = %message, "Failed to store verification result");
                CheckError::Update { id, message }
            })?;

        self.get(id)
            .await?
            .ok_or_else(|| CheckError::Store(format!("Fact check {} vanished after update", id)))
    }

    /// Look up a record
    pub async fn get(&self, id: FactCheckId) -> Result<Option<FactCheckRecord>, CheckError> {
        self.blocking(move |store| store.get_by_id(id))
            .await
            .map_err(CheckError::Store)
    }

    /// Most recent records first
    pub async fn recent(&self, limit: usize) -> Result<Vec<FactCheckRecord>, CheckError> {
        self.blocking(move |store| store.list_recent(limit))
            .await
            .map_err(CheckError::Store)
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, String>
    where
        T: Send + 'static,
        F: FnOnce(&St) -> Result<T, St::Error> + Send + 'static,
    {
        run_blocking(Arc::clone(&self.store), op).await
    }
}

async fn run_blocking<St, T, F>(store: Arc<St>, op: F) -> Result<T, String>
where
    St: ClaimStore + Send + Sync + 'static,
    St::Error: Display,
    T: Send + 'static,
    F: FnOnce(&St) -> Result<T, St::Error> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&store).map_err(|e| e.to_string()))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}
