//! TCP front end
//!
//! Newline-delimited JSON: one command per line in, one response per line
//! out. Each connection is its own task and handles its lines in order.
//! A line that does not decode, or runs past `max_line_bytes`, ends the
//! connection.
//! Dispatch runs on the blocking pool since collection locks are
//! synchronous.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::api::{Command, CommandHandler};
use crate::auth::{AuthManager, PasswordPolicy};
use crate::observability::{log_event, log_event_with_fields, Event};

use super::config::ServerConfig;
use super::errors::{ServerError, ServerResult};

/// Command server
pub struct Server {
    config: ServerConfig,
    handler: Arc<CommandHandler>,
    shutdown_tx: broadcast::Sender<()>,
    stopping: Arc<AtomicBool>,
}

impl Server {
    /// Create a server around an existing handler
    pub fn new(config: ServerConfig, handler: Arc<CommandHandler>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            handler,
            shutdown_tx,
            stopping: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a server with a fresh in-memory database
    pub fn from_config(config: ServerConfig) -> Self {
        let policy = PasswordPolicy::with_min_length(config.min_password_length);
        let auth = Arc::new(AuthManager::in_memory(policy));
        let handler = CommandHandler::with_auth(auth, config.btree_min_degree);
        Self::new(config, Arc::new(handler))
    }

    pub fn handler(&self) -> &Arc<CommandHandler> {
        &self.handler
    }

    /// Handle that stops the accept loop and every open connection
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
            stopping: Arc::clone(&self.stopping),
        }
    }

    /// Signal shutdown
    pub fn shutdown(&self) {
        self.shutdown_handle().shutdown();
    }

    /// Bind the configured address
    pub async fn bind(&self) -> ServerResult<TcpListener> {
        let addr = self.config.socket_addr();
        TcpListener::bind(&addr).await.map_err(|e| {
            log_event_with_fields(Event::BindFailed, &[("addr", addr.as_str())]);
            ServerError::bind_failed(&addr, e)
        })
    }

    /// Bind and serve until shutdown
    pub async fn run(&self) -> ServerResult<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Serve an already bound listener until shutdown
    pub async fn serve(&self, listener: TcpListener) -> ServerResult<()> {
        let local = listener.local_addr()?.to_string();
        log_event_with_fields(Event::Serving, &[("addr", local.as_str())]);

        let max_line_bytes = self.config.max_line_bytes;
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        if self.stopping.load(Ordering::SeqCst) {
            log_event(Event::ShutdownComplete);
            return Ok(());
        }

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            let handler = Arc::clone(&self.handler);
                            let shutdown_rx = self.shutdown_tx.subscribe();
                            handler.metrics().increment_connections();

                            tokio::spawn(async move {
                                Self::handle_connection(
                                    stream,
                                    peer_addr,
                                    handler,
                                    max_line_bytes,
                                    shutdown_rx,
                                )
                                .await;
                            });
                        }
                        Err(e) => {
                            let reason = e.to_string();
                            log_event_with_fields(Event::AcceptFailed, &[("error", reason.as_str())]);
                        }
                    }
                }

                _ = shutdown_rx.recv() => {
                    log_event(Event::ShutdownStart);
                    break;
                }
            }
        }

        log_event(Event::ShutdownComplete);
        Ok(())
    }

    async fn handle_connection(
        stream: TcpStream,
        peer_addr: SocketAddr,
        handler: Arc<CommandHandler>,
        max_line_bytes: usize,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        let connection_id = Uuid::new_v4().to_string();
        let peer = peer_addr.to_string();
        log_event_with_fields(
            Event::ConnectionOpened,
            &[("connection", connection_id.as_str()), ("peer", peer.as_str())],
        );

        let reason = tokio::select! {
            result = Self::serve_lines(stream, &connection_id, &handler, max_line_bytes) => match result {
                Ok(reason) => reason.to_string(),
                Err(e) => e.to_string(),
            },
            _ = shutdown_rx.recv() => "shutdown".to_string(),
        };

        log_event_with_fields(
            Event::ConnectionClosed,
            &[
                ("connection", connection_id.as_str()),
                ("peer", peer.as_str()),
                ("reason", reason.as_str()),
            ],
        );
    }

    /// Run the decode → dispatch → encode loop; returns why it stopped
    async fn serve_lines(
        stream: TcpStream,
        connection_id: &str,
        handler: &Arc<CommandHandler>,
        max_line_bytes: usize,
    ) -> ServerResult<&'static str> {
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let limit = u64::try_from(max_line_bytes).unwrap_or(u64::MAX).saturating_add(1);

        loop {
            buf.clear();
            let n = (&mut reader).take(limit).read_until(b'\n', &mut buf).await?;
            if n == 0 {
                return Ok("client disconnected");
            }

            if buf.last() == Some(&b'\n') {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            }
            if buf.len() > max_line_bytes {
                let reason = format!("request line exceeds {} bytes", max_line_bytes);
                Self::decode_failed(handler, connection_id, &reason);
                return Ok("line too long");
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(_) => {
                    Self::decode_failed(handler, connection_id, "request line is not UTF-8");
                    return Ok("decode failed");
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            let command = match Command::parse(line) {
                Ok(command) => command,
                Err(e) => {
                    Self::decode_failed(handler, connection_id, e.message());
                    return Ok("decode failed");
                }
            };

            let dispatch = Arc::clone(handler);
            let response = tokio::task::spawn_blocking(move || dispatch.handle(&command))
                .await
                .map_err(|e| ServerError::dispatch_failed(e.to_string()))?;

            let mut out = response.to_json();
            out.push('\n');
            writer.write_all(out.as_bytes()).await?;
            writer.flush().await?;
        }
    }

    fn decode_failed(handler: &CommandHandler, connection_id: &str, error: &str) {
        handler.metrics().increment_decode_failures();
        log_event_with_fields(
            Event::DecodeFailed,
            &[("connection", connection_id), ("error", error)],
        );
    }
}

/// Cloneable trigger for [`Server::shutdown`]
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: broadcast::Sender<()>,
    stopping: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Stop accepting and close open connections
    pub fn shutdown(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        let _ = self.tx.send(());
    }
}
