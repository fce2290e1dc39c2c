//! Tests for the query worker thread

use super::*;
use crate::fuzzy::Generation;
use crate::rpc::WireMatch;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::mpsc;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Answers each query after a per-query delay
struct ScriptedBackend {
    delays: HashMap<String, Duration>,
}

impl FuzzyBackend for ScriptedBackend {
    fn query(&self, query: String) -> BoxFuture<'static, Result<Vec<WireMatch>, RpcError>> {
        let delay = self.delays.get(&query).copied().unwrap_or_default();
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            if query == "fail" {
                return Err(RpcError::Disconnected);
            }
            Ok(vec![WireMatch {
                result_name: format!("src/{}.rs", query),
                score: 1,
                match_indices: Some(vec![0]),
            }])
        })
    }
}

fn start(
    delays: &[(&str, u64)],
    timeout: Duration,
) -> (
    WorkerHandle,
    tokio::sync::mpsc::UnboundedSender<QueryRequest>,
    mpsc::Receiver<QueryResponse>,
) {
    let delays = delays
        .iter()
        .map(|(q, ms)| (q.to_string(), Duration::from_millis(*ms)))
        .collect();
    let (request_tx, request_rx) = tokio::sync::mpsc::unbounded_channel();
    let (response_tx, response_rx) = mpsc::channel();
    let handle = spawn_worker(
        move || Ok(Arc::new(ScriptedBackend { delays }) as Arc<dyn FuzzyBackend>),
        timeout,
        request_rx,
        response_tx,
    )
    .unwrap();
    (handle, request_tx, response_rx)
}

fn request(query: &str) -> QueryRequest {
    QueryRequest {
        query: query.to_string(),
        generation: Generation::next(),
    }
}

#[test]
fn test_worker_echoes_generation_and_query() {
    let (handle, request_tx, response_rx) = start(&[], Duration::from_secs(1));
    let req = request("foo");
    request_tx.send(req.clone()).unwrap();

    let response = response_rx.recv_timeout(RECV_TIMEOUT).unwrap();
    match response {
        QueryResponse::Results {
            generation,
            query,
            results,
        } => {
            assert_eq!(generation, req.generation);
            assert_eq!(query, "foo");
            assert_eq!(results.len(), 1);
            assert_eq!(results[0].path(), "src/foo.rs");
        }
        other => panic!("Expected results, got {:?}", other),
    }
    handle.shutdown();
}

#[test]
fn test_worker_runs_queries_concurrently() {
    // The older query is slow, so the newer one answers first
    let (handle, request_tx, response_rx) = start(&[("a", 300), ("ab", 0)], Duration::from_secs(2));
    let older = request("a");
    let newer = request("ab");
    request_tx.send(older.clone()).unwrap();
    request_tx.send(newer.clone()).unwrap();

    let first = response_rx.recv_timeout(RECV_TIMEOUT).unwrap();
    let second = response_rx.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(first.generation(), newer.generation);
    assert_eq!(second.generation(), older.generation);
    handle.shutdown();
}

#[test]
fn test_worker_reports_timeout_as_failure() {
    let (handle, request_tx, response_rx) =
        start(&[("slow", 2_000)], Duration::from_millis(50));
    let req = request("slow");
    request_tx.send(req.clone()).unwrap();

    let response = response_rx.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(
        response,
        QueryResponse::Failed {
            generation: req.generation,
            error: RpcError::TimedOut(Duration::from_millis(50)),
        }
    );
    handle.shutdown();
}

#[test]
fn test_worker_reports_backend_error() {
    let (handle, request_tx, response_rx) = start(&[], Duration::from_secs(1));
    let req = request("fail");
    request_tx.send(req.clone()).unwrap();

    let response = response_rx.recv_timeout(RECV_TIMEOUT).unwrap();
    assert!(matches!(
        response,
        QueryResponse::Failed { generation, error: RpcError::Disconnected } if generation == req.generation
    ));
    handle.shutdown();
}

#[test]
fn test_worker_without_backend_answers_every_request_with_error() {
    let (request_tx, request_rx) = tokio::sync::mpsc::unbounded_channel();
    let (response_tx, response_rx) = mpsc::channel();
    let handle = spawn_worker(
        || Err(RpcError::NotConfigured("test".to_string())),
        Duration::from_secs(1),
        request_rx,
        response_tx,
    )
    .unwrap();

    let req = request("foo");
    request_tx.send(req.clone()).unwrap();
    let response = response_rx.recv_timeout(RECV_TIMEOUT).unwrap();
    match response {
        QueryResponse::Failed { generation, error } => {
            assert_eq!(generation, req.generation);
            assert!(error.to_string().contains("not configured"));
        }
        other => panic!("Expected failure, got {:?}", other),
    }
    handle.shutdown();
}

#[test]
fn test_worker_stops_when_request_channel_closes() {
    let (handle, request_tx, response_rx) = start(&[], Duration::from_secs(1));
    drop(request_tx);
    handle.shutdown();
    // Worker dropped its sender on exit
    assert!(matches!(
        response_rx.recv_timeout(RECV_TIMEOUT),
        Err(mpsc::RecvTimeoutError::Disconnected)
    ));
}
