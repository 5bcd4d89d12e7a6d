//! Service wiring and main event loop

use anyhow::{Context, Result};
use parkd_api::{ErrorCode, ErrorInfo, Event, EventPayload, Response};
use parkd_config::{Config, load_config};
use parkd_core::SessionLedger;
use parkd_ipc::{IpcServer, ServerMessage};
use parkd_store::{AuditEvent, AuditEventType, MemoryStore, Store};
use parkd_util::RateLimiter;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{debug, error, info, warn};

use crate::handle_command;

/// Requests allowed per client per window
pub const RATE_LIMIT_REQUESTS: u32 = 30;

/// Rate limit window
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(1);

/// Load the config file, or fall back to the built-in seed when it does not
/// exist. A file that exists but fails to parse or validate is an error.
pub fn load_config_or_builtin(path: &Path) -> Result<Config> {
    if !path.exists() {
        info!(
            config_path = %path.display(),
            "No configuration file, using built-in seed"
        );
        return Ok(Config::builtin());
    }

    let config = load_config(path)
        .with_context(|| format!("Failed to load config from {:?}", path))?;

    info!(
        config_path = %path.display(),
        users = config.seed.users.len(),
        cars = config.seed.cars.len(),
        spots = config.seed.spots.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Main service state
pub struct Service {
    ledger: SessionLedger,
    ipc: Arc<IpcServer>,
    store: Arc<dyn Store>,
    rate_limiter: RateLimiter,
}

impl Service {
    /// Build the store and ledger from `config` and start listening.
    ///
    /// `socket_override` takes precedence over the configured socket path.
    pub async fn new(config: Config, socket_override: Option<PathBuf>) -> Result<Self> {
        let socket_path = socket_override.unwrap_or_else(|| config.service.socket_path.clone());

        let store: Arc<dyn Store> = Arc::new(MemoryStore::new(config.service.audit_capacity));
        info!(audit_capacity = config.service.audit_capacity, "Store initialized");

        store.append_audit(AuditEvent::new(AuditEventType::ServiceStarted))?;

        let ledger = SessionLedger::new(store.clone(), config.ledger);
        ledger
            .load_seed(config.seed)
            .context("Failed to load seed data")?;

        let mut ipc = IpcServer::new(&socket_path);
        ipc.start()
            .await
            .with_context(|| format!("Failed to listen on {:?}", socket_path))?;

        info!(socket_path = %socket_path.display(), "IPC server started");

        Ok(Self {
            ledger,
            ipc: Arc::new(ipc),
            store,
            rate_limiter: RateLimiter::new(RATE_LIMIT_REQUESTS, RATE_LIMIT_WINDOW),
        })
    }

    pub fn socket_path(&self) -> &Path {
        self.ipc.socket_path()
    }

    /// Run until SIGTERM, SIGINT or SIGHUP
    pub async fn run(self) -> Result<()> {
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;
        let mut sighup =
            signal(SignalKind::hangup()).context("Failed to create SIGHUP handler")?;

        let shutdown = async move {
            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully"),
                _ = sigint.recv() => info!("Received SIGINT, shutting down gracefully"),
                _ = sighup.recv() => info!("Received SIGHUP, shutting down gracefully"),
            }
        };

        self.run_until(shutdown).await
    }

    /// Serve requests until `shutdown` completes
    pub async fn run_until(mut self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let mut ipc_messages = self
            .ipc
            .take_message_receiver()
            .await
            .context("IPC message receiver already taken")?;

        let ipc_accept = self.ipc.clone();
        let accept_task = tokio::spawn(async move {
            if let Err(e) = ipc_accept.run().await {
                error!(error = %e, "IPC server error");
            }
        });

        tokio::pin!(shutdown);

        info!("Service running");

        loop {
            tokio::select! {
                _ = &mut shutdown => break,

                msg = ipc_messages.recv() => match msg {
                    Some(msg) => self.handle_ipc_message(msg).await,
                    None => {
                        warn!("IPC message channel closed");
                        break;
                    }
                },
            }
        }

        info!("Shutting down parkd");

        self.ipc.broadcast_event(Event::new(EventPayload::Shutdown));
        // Give writer tasks a moment to flush the shutdown event
        tokio::time::sleep(Duration::from_millis(50)).await;

        accept_task.abort();

        if let Err(e) = self
            .store
            .append_audit(AuditEvent::new(AuditEventType::ServiceStopped))
        {
            warn!(error = %e, "Failed to log service shutdown");
        }

        info!("Shutdown complete");
        Ok(())
    }

    async fn handle_ipc_message(&mut self, msg: ServerMessage) {
        match msg {
            ServerMessage::Request { client_id, request } => {
                if !self.rate_limiter.check(&client_id) {
                    warn!(client_id = %client_id, "Rate limit exceeded");
                    let response = Response::error(
                        request.request_id,
                        ErrorInfo::new(ErrorCode::RateLimited, "Too many requests"),
                    );
                    let _ = self.ipc.send_response(&client_id, response).await;
                    return;
                }

                let (response, event) = handle_command(
                    &self.ledger,
                    self.store.as_ref(),
                    &client_id,
                    request.request_id,
                    request.command,
                    parkd_util::now(),
                );

                if let Err(e) = self.ipc.send_response(&client_id, response).await {
                    debug!(client_id = %client_id, error = %e, "Failed to send response");
                }

                if let Some(event) = event {
                    self.ipc.broadcast_event(event);
                }
            }

            ServerMessage::ClientConnected { client_id } => {
                info!(client_id = %client_id, "Client connected");

                let _ = self.store.append_audit(AuditEvent::new(
                    AuditEventType::ClientConnected {
                        client_id: client_id.to_string(),
                    },
                ));
            }

            ServerMessage::ClientDisconnected { client_id } => {
                debug!(client_id = %client_id, "Client disconnected");

                let _ = self.store.append_audit(AuditEvent::new(
                    AuditEventType::ClientDisconnected {
                        client_id: client_id.to_string(),
                    },
                ));

                self.rate_limiter.remove_client(&client_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_config_uses_builtin_seed() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_or_builtin(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.seed.cars[0].license_plate, "ABC123");
        assert_eq!(config.seed.spots[0].spot_number, "A1");
    }

    #[test]
    fn invalid_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "config_version = 7").unwrap();
        assert!(load_config_or_builtin(file.path()).is_err());
    }

    #[tokio::test]
    async fn socket_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("override.sock");

        let service = Service::new(Config::builtin(), Some(socket.clone()))
            .await
            .unwrap();
        assert_eq!(service.socket_path(), socket.as_path());
        assert!(socket.exists());
    }
}
