//! HTTP server lifecycle for the prediction service.

use crate::config::ServerConfig;
use crate::error::{ServingError, ServingResult};
use crate::http::router;
use crate::model_loader::ModelLoader;
use crate::service::PredictorService;
use parking_lot::{Mutex, RwLock};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Server state enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Server is not started
    Stopped,
    /// Server is loading the model and binding
    Starting,
    /// Server is accepting requests
    Running,
    /// Server is draining in-flight requests
    ShuttingDown,
    /// Server failed to start or crashed
    Error,
}

/// The prediction server.
///
/// Loads the model once in [`start`](Server::start) and serves it until
/// [`stop`](Server::stop).
///
/// # Example
///
/// ```no_run
/// use iris_serving::{Server, ServerConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let server = Server::new(ServerConfig::default());
/// let addr = server.start().await?;
/// println!("listening on {addr}");
/// server.stop().await?;
/// # Ok(())
/// # }
/// ```
pub struct Server {
    config: ServerConfig,
    loader: ModelLoader,
    state: Arc<RwLock<ServerState>>,
    local_addr: RwLock<Option<SocketAddr>>,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Server {
    /// Create a new server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            loader: ModelLoader::new(),
            state: Arc::new(RwLock::new(ServerState::Stopped)),
            local_addr: RwLock::new(None),
            shutdown_tx: Mutex::new(None),
            task: Mutex::new(None),
        }
    }

    /// The server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServerState {
        *self.state.read()
    }

    /// Whether the server is accepting requests.
    pub fn is_running(&self) -> bool {
        self.state() == ServerState::Running
    }

    /// Bound address while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.read()
    }

    /// Start serving.
    ///
    /// Validates the configuration, loads the model and binds the listener.
    /// Any failure leaves the server in [`ServerState::Error`]. Returns the
    /// bound address.
    pub async fn start(&self) -> ServingResult<SocketAddr> {
        {
            let mut state = self.state.write();
            let current = *state;
            match current {
                ServerState::Running => {
                    warn!("Server is already running");
                    return self
                        .local_addr()
                        .ok_or_else(|| ServingError::server("Running without an address"));
                }
                ServerState::Starting | ServerState::ShuttingDown => {
                    return Err(ServingError::server(format!(
                        "Cannot start while {:?}",
                        current
                    )));
                }
                ServerState::Stopped | ServerState::Error => *state = ServerState::Starting,
            }
        }
        info!("Starting iris prediction server");

        match self.bind_and_spawn().await {
            Ok(addr) => {
                *self.state.write() = ServerState::Running;
                info!(%addr, "Server started");
                Ok(addr)
            }
            Err(e) => {
                *self.state.write() = ServerState::Error;
                error!(error = %e, "Server failed to start");
                Err(e)
            }
        }
    }

    async fn bind_and_spawn(&self) -> ServingResult<SocketAddr> {
        self.config.validate()?;

        let model = self.loader.load(&self.config.model_path)?;
        let app = router(PredictorService::from_loaded(&model));

        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServingError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServingError::Bind { addr, source })?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = serve.await {
                error!(error = %e, "HTTP server error");
                *state.write() = ServerState::Error;
            }
        });

        *self.local_addr.write() = Some(local_addr);
        *self.shutdown_tx.lock() = Some(shutdown_tx);
        *self.task.lock() = Some(task);
        Ok(local_addr)
    }

    /// Stop the server gracefully.
    ///
    /// Stops accepting connections and waits for in-flight requests to
    /// finish. Stopping a stopped server is a no-op.
    pub async fn stop(&self) -> ServingResult<()> {
        if self.state() == ServerState::Stopped {
            return Ok(());
        }

        info!("Stopping server");
        *self.state.write() = ServerState::ShuttingDown;

        let tx = self.shutdown_tx.lock().take();
        if let Some(tx) = tx {
            let _ = tx.send(());
        }

        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                *self.state.write() = ServerState::Error;
                return Err(ServingError::server(format!("Server task failed: {e}")));
            }
        }

        *self.local_addr.write() = None;
        *self.state.write() = ServerState::Stopped;
        info!("Server stopped");
        Ok(())
    }

    /// Start, serve until `signal` resolves, then stop gracefully.
    pub async fn run_until<F>(&self, signal: F) -> ServingResult<()>
    where
        F: Future<Output = ()>,
    {
        self.start().await?;
        signal.await;
        self.stop().await
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("local_addr", &self.local_addr())
            .finish()
    }
}
