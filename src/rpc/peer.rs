//! JSON-lines RPC peer
//!
//! Writes requests to the core and routes each response back to the caller
//! waiting on its id, so answers may arrive in any order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex as AsyncMutex, oneshot};

use super::RpcError;
use super::protocol::{RpcIncoming, RpcRequest};

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, RpcError>>>>>;

pub struct RpcPeer {
    writer: AsyncMutex<Box<dyn AsyncWrite + Send + Unpin>>,
    pending: PendingMap,
    /// Set once the read side has ended; no further answers will arrive
    closed: Arc<AtomicBool>,
    next_id: AtomicU64,
}

impl RpcPeer {
    /// Start a peer over a reader/writer pair
    ///
    /// Spawns the read loop on the current tokio runtime, so this must be
    /// called from within one.
    pub fn spawn<R, W>(reader: R, writer: W) -> Arc<Self>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let pending: PendingMap = Arc::default();
        let closed = Arc::new(AtomicBool::new(false));

        tokio::spawn(read_loop(
            BufReader::new(reader),
            Arc::clone(&pending),
            Arc::clone(&closed),
        ));

        Arc::new(Self {
            writer: AsyncMutex::new(Box::new(writer)),
            pending,
            closed,
            next_id: AtomicU64::new(0),
        })
    }

    /// Send a request and wait for its answer
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        lock(&self.pending).insert(id, tx);

        if self.closed.load(Ordering::SeqCst) {
            lock(&self.pending).remove(&id);
            return Err(RpcError::Disconnected);
        }

        if let Err(e) = self.write_request(id, method, params).await {
            lock(&self.pending).remove(&id);
            return Err(e);
        }

        rx.await.unwrap_or(Err(RpcError::Disconnected))
    }

    /// Number of requests still waiting for an answer
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    async fn write_request(&self, id: u64, method: &str, params: Value) -> Result<(), RpcError> {
        let mut line = serde_json::to_vec(&RpcRequest { id, method, params })
            .map_err(|e| RpcError::Malformed(e.to_string()))?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.flush().await?;
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn read_loop<R>(reader: BufReader<R>, pending: PendingMap, closed: Arc<AtomicBool>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => dispatch_line(&line, &pending),
            Ok(None) => {
                log::debug!("Fuzzy core closed its output");
                break;
            }
            Err(e) => {
                log::warn!("Failed to read from fuzzy core: {}", e);
                break;
            }
        }
    }

    closed.store(true, Ordering::SeqCst);
    let orphaned: Vec<_> = lock(&pending).drain().collect();
    for (_, tx) in orphaned {
        let _ = tx.send(Err(RpcError::Disconnected));
    }
}

fn dispatch_line(line: &str, pending: &PendingMap) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let incoming: RpcIncoming = match serde_json::from_str(line) {
        Ok(message) => message,
        Err(e) => {
            log::warn!("Ignoring unparseable line from fuzzy core: {}", e);
            return;
        }
    };

    // Notifications and requests from the core are not ours to answer here
    if incoming.method.is_some() {
        log::trace!("Ignoring core message {:?}", incoming.method);
        return;
    }
    let Some(id) = incoming.id else {
        return;
    };

    let sender = lock(pending).remove(&id);
    match sender {
        Some(tx) => {
            let _ = tx.send(incoming.into_outcome());
        }
        None => log::debug!("Response for unknown request id {}", id),
    }
}

#[cfg(test)]
#[path = "peer_tests.rs"]
mod peer_tests;
