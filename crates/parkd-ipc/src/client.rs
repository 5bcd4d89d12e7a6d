//! IPC client implementation

use parkd_api::{Command, Event, Request, Response, ResponseResult};
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tracing::debug;

use crate::{IpcError, IpcResult};

/// IPC Client for connecting to parkd
pub struct IpcClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    next_request_id: u64,
    /// Events that arrived while waiting for a response
    pending_events: VecDeque<Event>,
}

/// A line from the service: either a reply or a broadcast event
#[derive(Deserialize)]
#[serde(untagged)]
enum Incoming {
    Response(Response),
    Event(Event),
}

impl IpcClient {
    /// Connect to parkd
    pub async fn connect(socket_path: impl AsRef<Path>) -> IpcResult<Self> {
        let stream = UnixStream::connect(socket_path).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            next_request_id: 1,
            pending_events: VecDeque::new(),
        })
    }

    /// Send a command and wait for its response.
    ///
    /// Events delivered before the response are kept and handed to the
    /// [`EventStream`] returned by [`IpcClient::subscribe`].
    pub async fn send(&mut self, command: Command) -> IpcResult<Response> {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let request = Request::new(request_id, command);
        let mut json = serde_json::to_string(&request)?;
        json.push('\n');

        self.writer.write_all(json.as_bytes()).await?;

        loop {
            let line = read_line(&mut self.reader).await?;
            match serde_json::from_str::<Incoming>(line.trim())? {
                Incoming::Response(response) if response.request_id == request_id => {
                    return Ok(response);
                }
                Incoming::Response(response) => {
                    debug!(
                        expected = request_id,
                        got = response.request_id,
                        "Skipping unrelated response"
                    );
                }
                Incoming::Event(event) => self.pending_events.push_back(event),
            }
        }
    }

    /// Subscribe to events and consume this client to return an event stream
    pub async fn subscribe(mut self) -> IpcResult<EventStream> {
        let response = self.send(Command::SubscribeEvents).await?;

        if let ResponseResult::Err(e) = response.result {
            return Err(IpcError::ServerError(e.message));
        }

        Ok(EventStream {
            reader: self.reader,
            _writer: self.writer,
            pending: self.pending_events,
        })
    }
}

/// Stream of events from parkd
pub struct EventStream {
    reader: BufReader<OwnedReadHalf>,
    // Held so the server does not see the connection half-closed
    _writer: OwnedWriteHalf,
    pending: VecDeque<Event>,
}

impl EventStream {
    /// Wait for the next event
    pub async fn next(&mut self) -> IpcResult<Event> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(event);
        }

        let line = read_line(&mut self.reader).await?;
        let event: Event = serde_json::from_str(line.trim())?;
        Ok(event)
    }
}

async fn read_line(reader: &mut BufReader<OwnedReadHalf>) -> IpcResult<String> {
    let mut line = String::new();
    let n = reader.read_line(&mut line).await?;
    if n == 0 {
        return Err(IpcError::ConnectionClosed);
    }
    Ok(line)
}
