//! Fuzzy-query RPC plumbing
//!
//! The quick-open session never talks to the fuzzy core directly. It sends
//! `QueryRequest`s to a worker thread and polls `QueryResponse`s back, both
//! tagged with the query generation.

use std::time::Duration;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::fuzzy::{Generation, MatchResult};

pub mod core_process;
pub mod local;
pub mod peer;
pub mod protocol;
pub mod worker;

pub use protocol::WireMatch;
pub use worker::{WorkerHandle, spawn_worker};

/// Errors that can occur while talking to the fuzzy core
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RpcError {
    /// No fuzzy backend could be created
    #[error("Fuzzy core not configured: {0}")]
    NotConfigured(String),

    /// Reading or writing the transport failed
    #[error("Transport error: {0}")]
    Io(String),

    /// The core went away before answering
    #[error("Fuzzy core disconnected")]
    Disconnected,

    /// No answer within the request timeout
    #[error("Fuzzy query timed out after {0:?}")]
    TimedOut(Duration),

    /// The core answered with an error object
    #[error("Core error ({code}): {message}")]
    Remote { code: i64, message: String },

    /// The core answered with something that is not a result list
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The worker thread is no longer receiving requests
    #[error("Query worker is not running")]
    WorkerGone,
}

impl From<std::io::Error> for RpcError {
    fn from(err: std::io::Error) -> Self {
        RpcError::Io(err.to_string())
    }
}

/// Request messages sent to the query worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
    /// Generation this query was issued under, echoed back in the response
    pub generation: Generation,
}

/// Response messages received from the query worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResponse {
    /// Ranked results, in the order the core delivered them
    Results {
        generation: Generation,
        query: String,
        results: Vec<MatchResult>,
    },
    /// The query failed or timed out
    Failed {
        generation: Generation,
        error: RpcError,
    },
}

impl QueryResponse {
    pub fn generation(&self) -> Generation {
        match self {
            QueryResponse::Results { generation, .. } | QueryResponse::Failed { generation, .. } => {
                *generation
            }
        }
    }
}

/// Something that can answer fuzzy queries
///
/// The returned future must not borrow `self` so the worker can run several
/// queries concurrently.
pub trait FuzzyBackend: Send + Sync + 'static {
    fn query(&self, query: String) -> BoxFuture<'static, Result<Vec<WireMatch>, RpcError>>;
}
