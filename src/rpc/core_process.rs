//! External fuzzy core process
//!
//! Launches the configured core binary and speaks JSON-lines RPC over its
//! stdin/stdout.

use std::path::Path;
use std::process::Stdio;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use tokio::process::{Child, Command};

use super::peer::RpcPeer;
use super::protocol::{FuzzyQueryParams, WireMatch, parse_matches};
use super::{FuzzyBackend, RpcError};
use crate::config::CoreConfig;
use crate::error::QuickOpenError;

/// A running fuzzy core
pub struct CoreProcess {
    peer: Arc<RpcPeer>,
    method: String,
    /// Held so the process is killed when the backend is dropped
    _child: Mutex<Child>,
}

impl CoreProcess {
    /// Spawn the core described by `config` with `root` as working directory
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: &CoreConfig, root: &Path) -> Result<Self, QuickOpenError> {
        let command = config.command.as_deref().ok_or_else(|| {
            RpcError::NotConfigured("no [core] command configured".to_string())
        })?;
        let program =
            which::which(command).map_err(|_| QuickOpenError::CoreNotFound(command.to_string()))?;

        let mut child = Command::new(&program)
            .args(&config.args)
            .current_dir(root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| QuickOpenError::CoreSpawn(e.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| QuickOpenError::CoreSpawn("core stdin was not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| QuickOpenError::CoreSpawn("core stdout was not captured".to_string()))?;

        log::debug!("Started fuzzy core {}", program.display());

        Ok(Self {
            peer: RpcPeer::spawn(stdout, stdin),
            method: config.method.clone(),
            _child: Mutex::new(child),
        })
    }
}

impl FuzzyBackend for CoreProcess {
    fn query(&self, query: String) -> BoxFuture<'static, Result<Vec<WireMatch>, RpcError>> {
        let peer = Arc::clone(&self.peer);
        let method = self.method.clone();
        Box::pin(async move {
            let params = serde_json::to_value(FuzzyQueryParams { query: &query })
                .map_err(|e| RpcError::Malformed(e.to_string()))?;
            let result = peer.request(&method, params).await?;
            parse_matches(result)
        })
    }
}
