//! Query Worker Thread
//!
//! Runs fuzzy queries off the UI thread. Receives requests via channel,
//! forwards each one to the fuzzy backend as its own task so several
//! generations can be in flight at once, and sends every outcome back to the
//! UI loop tagged with the generation it was issued under.
//!
//! There is no in-flight cancellation: superseded queries run to completion
//! and the UI side discards their results.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

use super::{FuzzyBackend, QueryRequest, QueryResponse, RpcError};
use crate::fuzzy::MatchResult;

/// Owns the worker thread; dropping it asks the worker to stop
pub struct WorkerHandle {
    shutdown: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Stop the worker and wait for its thread to finish
    pub fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            log::warn!("Query worker thread panicked");
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Spawn the query worker thread
///
/// `make_backend` runs on the worker's runtime, so backends that spawn tasks
/// or processes can be created there. If it fails, every request is answered
/// with that error.
///
/// # Arguments
/// * `make_backend` - Factory for the fuzzy backend
/// * `timeout` - Upper bound for a single query
/// * `request_rx` - Channel to receive requests from the UI loop
/// * `response_tx` - Channel to send responses to the UI loop
pub fn spawn_worker<F>(
    make_backend: F,
    timeout: Duration,
    request_rx: UnboundedReceiver<QueryRequest>,
    response_tx: Sender<QueryResponse>,
) -> std::io::Result<WorkerHandle>
where
    F: FnOnce() -> Result<Arc<dyn FuzzyBackend>, RpcError> + Send + 'static,
{
    let shutdown = CancellationToken::new();
    let worker_shutdown = shutdown.clone();

    let thread = std::thread::Builder::new()
        .name("quickopen-rpc".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    log::error!("Failed to start query worker runtime: {}", e);
                    return;
                }
            };

            runtime.block_on(async move {
                let backend = make_backend();
                worker_loop(backend, timeout, request_rx, response_tx, worker_shutdown).await;
            });
        })?;

    Ok(WorkerHandle {
        shutdown,
        thread: Some(thread),
    })
}

/// Main worker loop - processes requests until the channel is closed or
/// shutdown is requested
async fn worker_loop(
    backend: Result<Arc<dyn FuzzyBackend>, RpcError>,
    timeout: Duration,
    mut request_rx: UnboundedReceiver<QueryRequest>,
    response_tx: Sender<QueryResponse>,
    shutdown: CancellationToken,
) {
    if let Err(e) = &backend {
        log::warn!("Fuzzy backend unavailable: {}", e);
    }

    loop {
        let request = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            request = request_rx.recv() => match request {
                Some(request) => request,
                None => break,
            },
        };

        match &backend {
            Ok(backend) => {
                tokio::spawn(handle_query(
                    Arc::clone(backend),
                    request,
                    timeout,
                    response_tx.clone(),
                ));
            }
            Err(e) => {
                let _ = response_tx.send(QueryResponse::Failed {
                    generation: request.generation,
                    error: e.clone(),
                });
            }
        }
    }

    log::debug!("Query worker shutting down");
}

async fn handle_query(
    backend: Arc<dyn FuzzyBackend>,
    request: QueryRequest,
    timeout: Duration,
    response_tx: Sender<QueryResponse>,
) {
    let QueryRequest { query, generation } = request;
    log::debug!("Running fuzzy query {:?} ({})", query, generation);

    let outcome = match tokio::time::timeout(timeout, backend.query(query.clone())).await {
        Ok(outcome) => outcome,
        Err(_) => Err(RpcError::TimedOut(timeout)),
    };

    let response = match outcome {
        Ok(matches) => QueryResponse::Results {
            generation,
            query,
            results: matches.into_iter().filter_map(MatchResult::from_wire).collect(),
        },
        Err(error) => {
            log::warn!("Fuzzy query {} failed: {}", generation, error);
            QueryResponse::Failed { generation, error }
        }
    };

    // UI side gone means nobody is waiting for this answer
    let _ = response_tx.send(response);
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;
