//! Query dispatcher
//!
//! Debounces query text, tags each query that actually goes out with a fresh
//! generation, and feeds worker responses into the suggestion store. Any
//! number of generations may be in flight; only the one the store still
//! tracks when its response arrives is applied.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

use tokio::sync::mpsc::UnboundedSender;

use super::debouncer::Debouncer;
use super::suggestion_store::{StoreUpdate, SuggestionStore};
use crate::fuzzy::Generation;
use crate::rpc::{QueryRequest, QueryResponse, RpcError};

/// What `submit` did with the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Empty text: the store was cleared and nothing will be sent
    Cleared,
    /// Text is waiting for the debounce window to pass
    Scheduled,
}

/// Something that happened while sending or receiving
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    /// A query went out under this generation
    Sent(Generation),
    /// The response for the current generation replaced the results
    Applied(Generation),
    /// A response for an older generation was dropped
    Stale(Generation),
    /// The current generation failed; the results were left unchanged
    Failed(Generation, RpcError),
}

pub struct QueryDispatcher {
    debouncer: Debouncer,
    /// Channel to send requests to the worker thread
    request_tx: Option<UnboundedSender<QueryRequest>>,
    /// Channel to receive responses from the worker thread
    response_rx: Option<Receiver<QueryResponse>>,
}

impl QueryDispatcher {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            debouncer: Debouncer::new(debounce_ms),
            request_tx: None,
            response_rx: None,
        }
    }

    /// Set the channel handles for communication with the worker thread
    pub fn set_channels(
        &mut self,
        request_tx: UnboundedSender<QueryRequest>,
        response_rx: Receiver<QueryResponse>,
    ) {
        self.request_tx = Some(request_tx);
        self.response_rx = Some(response_rx);
    }

    pub fn with_channels(
        debounce_ms: u64,
        request_tx: UnboundedSender<QueryRequest>,
        response_rx: Receiver<QueryResponse>,
    ) -> Self {
        let mut dispatcher = Self::new(debounce_ms);
        dispatcher.set_channels(request_tx, response_rx);
        dispatcher
    }

    /// Accept new query text
    ///
    /// Empty text never reaches the core: it clears the store right away and
    /// drops whatever was waiting in the debounce window.
    pub fn submit(&mut self, text: &str, now: Instant, store: &mut SuggestionStore) -> Submission {
        if text.is_empty() {
            self.debouncer.cancel();
            store.clear();
            return Submission::Cleared;
        }

        self.debouncer.schedule(text, now);
        Submission::Scheduled
    }

    /// Send the debounced query once its idle window has passed
    ///
    /// The new generation becomes current in `store` before anything is sent,
    /// so even a failed send consumes it.
    pub fn tick(&mut self, now: Instant, store: &mut SuggestionStore) -> Option<DispatchEvent> {
        let query = self.debouncer.take_ready(now)?;
        let generation = Generation::next();
        store.track(generation);

        let sent = self
            .request_tx
            .as_ref()
            .is_some_and(|tx| tx.send(QueryRequest { query, generation }).is_ok());

        if sent {
            log::debug!("Sent fuzzy query {}", generation);
            Some(DispatchEvent::Sent(generation))
        } else {
            log::warn!("Query worker unavailable, dropping query {}", generation);
            Some(DispatchEvent::Failed(generation, RpcError::WorkerGone))
        }
    }

    /// Drain worker responses into `store`
    pub fn poll(&mut self, store: &mut SuggestionStore) -> Vec<DispatchEvent> {
        let mut events = Vec::new();
        let Some(rx) = &self.response_rx else {
            return events;
        };

        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(response) => events.push(apply_response(response, store)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        if disconnected {
            log::debug!("Query worker response channel closed");
            self.response_rx = None;
        }
        events
    }

    /// Drain and drop responses while no panel is open
    pub fn discard_responses(&mut self) -> usize {
        let Some(rx) = &self.response_rx else {
            return 0;
        };
        let discarded = rx.try_iter().count();
        if discarded > 0 {
            log::debug!("Discarded {} responses for a closed panel", discarded);
        }
        discarded
    }

    /// Forget pending text
    pub fn reset(&mut self) {
        self.debouncer.cancel();
    }

    /// When the pending query will be sent, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn has_pending_query(&self) -> bool {
        self.debouncer.is_pending()
    }
}

fn apply_response(response: QueryResponse, store: &mut SuggestionStore) -> DispatchEvent {
    match response {
        QueryResponse::Results {
            generation,
            query,
            results,
        } => match store.replace(generation, query, results) {
            StoreUpdate::Applied => DispatchEvent::Applied(generation),
            StoreUpdate::Stale => DispatchEvent::Stale(generation),
        },
        QueryResponse::Failed { generation, error } => {
            if generation == store.generation() {
                log::warn!("Fuzzy query {} failed: {}", generation, error);
                DispatchEvent::Failed(generation, error)
            } else {
                log::debug!("Ignoring failure of stale query {}: {}", generation, error);
                DispatchEvent::Stale(generation)
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod dispatcher_tests;
