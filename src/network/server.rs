//! WebSocket Game Server
//!
//! Async WebSocket server. Each connection gets its own game session; all
//! engine calls for that session go through its lock, so a client hammering
//! the guess button still resolves rounds in arrival order.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::time::interval;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, warn};

use crate::game::projection::outcome_message;
use crate::network::protocol::{
    ClientMessage, ErrorCode, ProtocolError, RoundResolvedInfo, ServerMessage,
};
use crate::network::session::{GameSession, SessionId, SessionManager};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// Sessions idle longer than this are dropped.
    pub session_idle_timeout: Duration,
    /// Server version string.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".parse().expect("static addr"),
            max_connections: 1000,
            session_idle_timeout: Duration::from_secs(15 * 60),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ServerConfig {
    /// Build a config from environment variables, falling back to defaults.
    ///
    /// Recognized: `HASHGUESS_BIND_ADDR`, `HASHGUESS_MAX_CONNECTIONS`,
    /// `HASHGUESS_IDLE_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = std::env::var("HASHGUESS_BIND_ADDR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.bind_addr);

        let max_connections = std::env::var("HASHGUESS_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_connections);

        let session_idle_timeout = std::env::var("HASHGUESS_IDLE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.session_idle_timeout);

        Self {
            bind_addr,
            max_connections,
            session_idle_timeout,
            version: defaults.version,
        }
    }
}

/// Game server errors.
#[derive(Debug, thiserror::Error)]
pub enum GameServerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    BindFailed(#[from] std::io::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Connected client state.
struct ConnectedClient {
    /// The session owned by this connection.
    session_id: SessionId,
    /// Connection time.
    #[allow(dead_code)]
    connected_at: Instant,
}

/// The game server.
pub struct GameServer {
    /// Server configuration.
    config: ServerConfig,
    /// Session manager.
    sessions: Arc<SessionManager>,
    /// Connected clients.
    clients: Arc<RwLock<BTreeMap<SocketAddr, ConnectedClient>>>,
    /// Shutdown signal.
    shutdown_tx: broadcast::Sender<()>,
}

impl GameServer {
    /// Create a new game server.
    pub fn new(config: ServerConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            sessions: Arc::new(SessionManager::new()),
            clients: Arc::new(RwLock::new(BTreeMap::new())),
            shutdown_tx,
        }
    }

    /// Signal the server to shut down.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Run the server.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), GameServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("Game server v{} listening on {}", self.config.version, self.config.bind_addr);

        // Spawn idle-session cleanup task
        let cleanup_sessions = self.sessions.clone();
        let idle_timeout = self.config.session_idle_timeout;
        let cleanup_handle = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(60));
            loop {
                ticker.tick().await;
                let removed = cleanup_sessions.cleanup_idle(idle_timeout).await;
                if removed > 0 {
                    info!("Cleaned up {} idle sessions", removed);
                }
            }
        });

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            let clients_count = self.clients.read().await.len();
                            if clients_count >= self.config.max_connections {
                                warn!("Connection limit reached, rejecting {}", addr);
                                continue;
                            }

                            info!("New connection from {}", addr);
                            self.handle_connection(stream, addr);
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        cleanup_handle.abort();

        Ok(())
    }

    /// Handle a new WebSocket connection.
    fn handle_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let clients = self.clients.clone();
        let sessions = self.sessions.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let ws_stream = match accept_async(stream).await {
                Ok(ws) => ws,
                Err(e) => {
                    error!("WebSocket handshake failed for {}: {}", addr, e);
                    return;
                }
            };

            let (mut ws_sender, mut ws_receiver) = ws_stream.split();
            let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(64);

            // One session per connection
            let session_id = sessions.create_session().await;
            let session = match sessions.get_session(&session_id).await {
                Some(s) => s,
                None => {
                    error!("Session vanished immediately for {}", addr);
                    return;
                }
            };
            debug!("Session {} created for {}", hex::encode(session_id), addr);

            {
                let mut clients = clients.write().await;
                clients.insert(
                    addr,
                    ConnectedClient {
                        session_id,
                        connected_at: Instant::now(),
                    },
                );
            }

            // Spawn message sender task
            let sender_task = tokio::spawn(async move {
                while let Some(msg) = msg_rx.recv().await {
                    let text = match msg.to_json() {
                        Ok(t) => t,
                        Err(e) => {
                            error!("Failed to serialize message: {}", e);
                            continue;
                        }
                    };
                    if ws_sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
            });

            // Handle incoming messages
            loop {
                tokio::select! {
                    msg = ws_receiver.next() => {
                        match msg {
                            Some(Ok(Message::Text(text))) => {
                                let client_msg = match ClientMessage::from_json(&text) {
                                    Ok(m) => m,
                                    Err(e) => {
                                        debug!("Invalid message from {}: {}", addr, e);
                                        let _ = msg_tx.send(ServerMessage::Error(ProtocolError {
                                            code: ErrorCode::InvalidInput,
                                            message: "Invalid message format".to_string(),
                                        })).await;
                                        continue;
                                    }
                                };

                                Self::handle_client_message(addr, client_msg, &session, &msg_tx).await;
                            }
                            Some(Ok(Message::Ping(_))) => {
                                let _ = msg_tx.send(ServerMessage::Pong {
                                    timestamp: 0,
                                    server_time: wall_clock_millis(),
                                }).await;
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                debug!("Client {} disconnected", addr);
                                break;
                            }
                            Some(Err(e)) => {
                                error!("WebSocket error for {}: {}", addr, e);
                                break;
                            }
                            _ => {}
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        let _ = msg_tx.send(ServerMessage::Shutdown {
                            reason: "Server shutting down".to_string(),
                        }).await;
                        break;
                    }
                }
            }

            // Cleanup
            sender_task.abort();

            {
                let mut clients = clients.write().await;
                if let Some(client) = clients.remove(&addr) {
                    sessions.remove_session(&client.session_id).await;
                }
            }

            info!("Client {} cleaned up", addr);
        });
    }

    /// Handle a client message against its session.
    async fn handle_client_message(
        addr: SocketAddr,
        msg: ClientMessage,
        session: &Arc<RwLock<GameSession>>,
        sender: &mpsc::Sender<ServerMessage>,
    ) {
        match msg {
            ClientMessage::Start(req) => {
                let mut session = session.write().await;
                session.touch();
                let reply = match session.start(req.range, req.rounds) {
                    Ok(view) => {
                        info!(
                            "Session {} started: range={}, rounds={}",
                            hex::encode(session.id),
                            req.range,
                            req.rounds
                        );
                        ServerMessage::Started {
                            view,
                            message: session.start_message(),
                        }
                    }
                    Err(ref e) => {
                        debug!("Start rejected for {}: {}", addr, e);
                        ServerMessage::Error(e.into())
                    }
                };
                let _ = sender.send(reply).await;
            }
            ClientMessage::Guess(req) => {
                let mut session = session.write().await;
                session.touch();
                let reply = match session.guess(&req.input) {
                    Ok(outcome) => {
                        debug!(
                            "Session {} round {} resolved: correct={}",
                            hex::encode(session.id),
                            outcome.round,
                            outcome.correct
                        );
                        let message = outcome_message(&outcome);
                        ServerMessage::RoundResolved(RoundResolvedInfo::new(
                            outcome,
                            message,
                            session.view(),
                        ))
                    }
                    Err(ref e) => {
                        debug!("Guess rejected for {}: {}", addr, e);
                        ServerMessage::Error(e.into())
                    }
                };
                let _ = sender.send(reply).await;
            }
            ClientMessage::Reset => {
                let mut session = session.write().await;
                session.touch();
                let view = session.reset();
                let _ = sender.send(ServerMessage::State { view }).await;
            }
            ClientMessage::Sync => {
                let mut session = session.write().await;
                session.touch();
                let view = session.view();
                let _ = sender.send(ServerMessage::State { view }).await;
            }
            ClientMessage::Ping { timestamp } => {
                let _ = sender
                    .send(ServerMessage::Pong {
                        timestamp,
                        server_time: wall_clock_millis(),
                    })
                    .await;
            }
        }
    }
}

/// Wall-clock milliseconds since the Unix epoch.
fn wall_clock_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// =============================================================================
// TESTS
// =============================================================================
