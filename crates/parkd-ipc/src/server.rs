//! IPC server implementation

use parkd_api::{Command, ErrorCode, ErrorInfo, Event, Request, Response};
use parkd_util::ClientId;
use std::collections::HashMap;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{Mutex, RwLock, broadcast, mpsc};
use tracing::{debug, error, info, warn};

use crate::{IpcError, IpcResult};

/// Message from client to server
pub enum ServerMessage {
    Request {
        client_id: ClientId,
        request: Request,
    },
    ClientConnected {
        client_id: ClientId,
    },
    ClientDisconnected {
        client_id: ClientId,
    },
}

type ClientMap = Arc<RwLock<HashMap<ClientId, ClientHandle>>>;

/// IPC Server
pub struct IpcServer {
    socket_path: PathBuf,
    listener: Option<UnixListener>,
    clients: ClientMap,
    event_tx: broadcast::Sender<Event>,
    message_tx: mpsc::UnboundedSender<ServerMessage>,
    message_rx: Arc<Mutex<Option<mpsc::UnboundedReceiver<ServerMessage>>>>,
}

struct ClientHandle {
    response_tx: mpsc::UnboundedSender<String>,
    subscribed: bool,
}

impl IpcServer {
    /// Create a new IPC server
    pub fn new(socket_path: impl AsRef<Path>) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (message_tx, message_rx) = mpsc::unbounded_channel();

        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
            listener: None,
            clients: Arc::new(RwLock::new(HashMap::new())),
            event_tx,
            message_tx,
            message_rx: Arc::new(Mutex::new(Some(message_rx))),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Start listening
    pub async fn start(&mut self) -> IpcResult<()> {
        // Remove a stale socket left by a previous run
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        if let Some(parent) = self.socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;

        // Readable/writable by owner and group
        std::fs::set_permissions(&self.socket_path, std::fs::Permissions::from_mode(0o660))?;

        info!(path = %self.socket_path.display(), "IPC server listening");

        self.listener = Some(listener);

        Ok(())
    }

    /// Get receiver for server messages. Only the first call gets it.
    pub async fn take_message_receiver(&self) -> Option<mpsc::UnboundedReceiver<ServerMessage>> {
        self.message_rx.lock().await.take()
    }

    /// Accept connections in a loop
    pub async fn run(&self) -> IpcResult<()> {
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| IpcError::ServerError("Server not started".into()))?;

        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let client_id = ClientId::new();
                    debug!(client_id = %client_id, "Connection accepted");
                    self.handle_client(stream, client_id).await;
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    async fn handle_client(&self, stream: UnixStream, client_id: ClientId) {
        let (read_half, write_half) = stream.into_split();
        let (response_tx, response_rx) = mpsc::unbounded_channel::<String>();

        self.clients.write().await.insert(
            client_id.clone(),
            ClientHandle {
                response_tx: response_tx.clone(),
                subscribed: false,
            },
        );

        let _ = self.message_tx.send(ServerMessage::ClientConnected {
            client_id: client_id.clone(),
        });

        tokio::spawn(read_requests(
            read_half,
            client_id.clone(),
            self.clients.clone(),
            self.message_tx.clone(),
            response_tx,
        ));

        tokio::spawn(write_responses(
            write_half,
            client_id,
            self.clients.clone(),
            self.message_tx.clone(),
            response_rx,
            self.event_tx.subscribe(),
        ));
    }

    /// Send a response to a specific client
    pub async fn send_response(&self, client_id: &ClientId, response: Response) -> IpcResult<()> {
        let json = serde_json::to_string(&response)?;

        let clients = self.clients.read().await;
        if let Some(handle) = clients.get(client_id) {
            handle
                .response_tx
                .send(json)
                .map_err(|_| IpcError::ConnectionClosed)?;
        }

        Ok(())
    }

    /// Broadcast an event to all subscribed clients
    pub fn broadcast_event(&self, event: Event) {
        let _ = self.event_tx.send(event);
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        if self.socket_path.exists() {
            let _ = std::fs::remove_file(&self.socket_path);
        }
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn read_requests(
    read_half: OwnedReadHalf,
    client_id: ClientId,
    clients: ClientMap,
    message_tx: mpsc::UnboundedSender<ServerMessage>,
    response_tx: mpsc::UnboundedSender<String>,
) {
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                debug!(client_id = %client_id, "Client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match serde_json::from_str::<Request>(line) {
                    Ok(request) => {
                        let subscribe = match request.command {
                            Command::SubscribeEvents => Some(true),
                            Command::UnsubscribeEvents => Some(false),
                            _ => None,
                        };
                        if let Some(subscribed) = subscribe
                            && let Some(handle) = clients.write().await.get_mut(&client_id)
                        {
                            handle.subscribed = subscribed;
                        }

                        let _ = message_tx.send(ServerMessage::Request {
                            client_id: client_id.clone(),
                            request,
                        });
                    }
                    Err(e) => {
                        warn!(client_id = %client_id, error = %e, "Invalid request");
                        let response = Response::error(
                            0,
                            ErrorInfo::new(
                                ErrorCode::InvalidRequest,
                                format!("Invalid request: {e}"),
                            ),
                        );
                        if let Ok(json) = serde_json::to_string(&response) {
                            let _ = response_tx.send(json);
                        }
                    }
                }
            }
            Err(e) => {
                debug!(client_id = %client_id, error = %e, "Read error");
                break;
            }
        }
    }

    // Dropping the handle closes the writer's response channel
    clients.write().await.remove(&client_id);
}

async fn write_responses(
    mut writer: OwnedWriteHalf,
    client_id: ClientId,
    clients: ClientMap,
    message_tx: mpsc::UnboundedSender<ServerMessage>,
    mut response_rx: mpsc::UnboundedReceiver<String>,
    mut event_rx: broadcast::Receiver<Event>,
) {
    loop {
        tokio::select! {
            response = response_rx.recv() => {
                let Some(mut msg) = response else {
                    break;
                };
                msg.push('\n');
                if let Err(e) = writer.write_all(msg.as_bytes()).await {
                    debug!(client_id = %client_id, error = %e, "Write error");
                    break;
                }
            }

            event = event_rx.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(client_id = %client_id, skipped, "Client lagging, events dropped");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                let is_subscribed = clients
                    .read()
                    .await
                    .get(&client_id)
                    .map(|h| h.subscribed)
                    .unwrap_or(false);

                if is_subscribed && let Ok(mut msg) = serde_json::to_string(&event) {
                    msg.push('\n');
                    if let Err(e) = writer.write_all(msg.as_bytes()).await {
                        debug!(client_id = %client_id, error = %e, "Event write error");
                        break;
                    }
                }
            }
        }
    }

    let _ = message_tx.send(ServerMessage::ClientDisconnected {
        client_id: client_id.clone(),
    });
    clients.write().await.remove(&client_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IpcClient;
    use parkd_api::{EventPayload, ResponsePayload, ResponseResult};
    use tempfile::tempdir;

    async fn started_server(dir: &Path) -> Arc<IpcServer> {
        let mut server = IpcServer::new(dir.join("test.sock"));
        server.start().await.unwrap();
        let server = Arc::new(server);
        let accept = server.clone();
        tokio::spawn(async move {
            let _ = accept.run().await;
        });
        server
    }

    #[tokio::test]
    async fn test_server_start() {
        let dir = tempdir().unwrap();
        let socket_path = dir.path().join("test.sock");

        let mut server = IpcServer::new(&socket_path);
        server.start().await.unwrap();

        assert!(socket_path.exists());
        drop(server);
        assert!(!socket_path.exists());
    }

    #[tokio::test]
    async fn test_run_requires_start() {
        let dir = tempdir().unwrap();
        let server = IpcServer::new(dir.path().join("unstarted.sock"));
        assert!(matches!(server.run().await, Err(IpcError::ServerError(_))));
    }

    #[tokio::test]
    async fn test_request_round_trip() {
        let dir = tempdir().unwrap();
        let server = started_server(dir.path()).await;
        let mut messages = server.take_message_receiver().await.unwrap();
        assert!(server.take_message_receiver().await.is_none());

        let responder = server.clone();
        tokio::spawn(async move {
            while let Some(msg) = messages.recv().await {
                if let ServerMessage::Request { client_id, request } = msg {
                    let response = Response::success(request.request_id, ResponsePayload::Pong);
                    let _ = responder.send_response(&client_id, response).await;
                }
            }
        });

        let mut client = IpcClient::connect(server.socket_path()).await.unwrap();
        let response = client.send(Command::Ping).await.unwrap();
        assert_eq!(response.request_id, 1);
        assert!(matches!(response.result, ResponseResult::Ok(ResponsePayload::Pong)));

        let response = client.send(Command::Ping).await.unwrap();
        assert_eq!(response.request_id, 2);
    }

    #[tokio::test]
    async fn test_malformed_request_gets_error() {
        let dir = tempdir().unwrap();
        let server = started_server(dir.path()).await;

        let mut stream = UnixStream::connect(server.socket_path()).await.unwrap();
        stream.write_all(b"{not json}\n").await.unwrap();

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();

        let response: Response = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(response.status(), 400);
        match response.result {
            ResponseResult::Err(e) => assert_eq!(e.code, ErrorCode::InvalidRequest),
            ResponseResult::Ok(_) => panic!("Expected an error response"),
        }
    }

    #[tokio::test]
    async fn test_events_reach_subscribers_only() {
        let dir = tempdir().unwrap();
        let server = started_server(dir.path()).await;
        let mut messages = server.take_message_receiver().await.unwrap();

        let responder = server.clone();
        tokio::spawn(async move {
            while let Some(msg) = messages.recv().await {
                if let ServerMessage::Request { client_id, request } = msg {
                    let payload = ResponsePayload::Subscribed {
                        client_id: client_id.clone(),
                    };
                    let response = Response::success(request.request_id, payload);
                    let _ = responder.send_response(&client_id, response).await;
                }
            }
        });

        let client = IpcClient::connect(server.socket_path()).await.unwrap();
        let mut events = client.subscribe().await.unwrap();

        server.broadcast_event(Event::new(EventPayload::Shutdown));
        let event = events.next().await.unwrap();
        assert!(matches!(event.payload, EventPayload::Shutdown));
    }

    #[tokio::test]
    async fn test_subscribe_tolerates_events_before_response() {
        let dir = tempdir().unwrap();
        let server = started_server(dir.path()).await;
        let mut messages = server.take_message_receiver().await.unwrap();

        // Another client's state change is broadcast while the subscribe
        // request is still being handled
        let responder = server.clone();
        tokio::spawn(async move {
            while let Some(msg) = messages.recv().await {
                if let ServerMessage::Request { client_id, request } = msg {
                    responder.broadcast_event(Event::new(EventPayload::CarRegistered {
                        car_id: parkd_util::CarId::new(5),
                        owner_id: parkd_util::UserId::new(1),
                        license_plate: "EARLY1".into(),
                    }));
                    let payload = ResponsePayload::Subscribed {
                        client_id: client_id.clone(),
                    };
                    let response = Response::success(request.request_id, payload);
                    let _ = responder.send_response(&client_id, response).await;
                }
            }
        });

        let client = IpcClient::connect(server.socket_path()).await.unwrap();
        let mut events = client.subscribe().await.unwrap();

        let event = events.next().await.unwrap();
        assert!(matches!(
            event.payload,
            EventPayload::CarRegistered { ref license_plate, .. } if license_plate == "EARLY1"
        ));
    }
}
