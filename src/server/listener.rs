use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::server::pool::WorkerPool;

/// Failures of the listening socket. Both are fatal to the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("cannot open port {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    #[error("error accepting client connection: {source}")]
    Accept { source: io::Error },
}

/// Owns the listening socket and feeds accepted connections to the pool.
pub struct Listener {
    listener: TcpListener,
    config: Arc<Config>,
    stop_tx: Arc<watch::Sender<bool>>,
    stop_rx: watch::Receiver<bool>,
}

/// Requests the accept loop to stop. Cheap to clone, safe to call repeatedly
/// and from any task.
#[derive(Clone, Debug)]
pub struct StopHandle {
    stop_tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        let already_stopped = self.stop_tx.send_replace(true);
        if !already_stopped {
            info!("Stop requested");
        }
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }
}

impl Listener {
    pub async fn bind(config: Arc<Config>) -> Result<Self, ServerError> {
        let addr = config.address();
        let listener = TcpListener::bind(&addr).await.map_err(|source| {
            error!(%addr, error = %source, "Cannot open port");
            ServerError::Bind {
                addr: addr.clone(),
                source,
            }
        })?;

        info!("Listening on {}", addr);

        let (stop_tx, stop_rx) = watch::channel(false);

        Ok(Self {
            listener,
            config,
            stop_tx: Arc::new(stop_tx),
            stop_rx,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            stop_tx: Arc::clone(&self.stop_tx),
        }
    }

    /// Accepts connections until stopped.
    ///
    /// Returns `Ok(())` once a stop was requested. The listening socket is
    /// closed first, then queued and in-flight connections are allowed to
    /// finish before this returns. An accept failure while not stopping is
    /// returned as [`ServerError::Accept`] without retrying.
    pub async fn run(self) -> Result<(), ServerError> {
        let Self {
            listener,
            config,
            stop_tx,
            mut stop_rx,
        } = self;

        let pool = WorkerPool::new(Arc::clone(&config));
        info!(workers = pool.size(), "WebServer running");

        let result = loop {
            tokio::select! {
                biased;

                _ = async { let _ = stop_rx.wait_for(|stopped| *stopped).await; } => break Ok(()),

                accepted = listener.accept() => match accepted {
                    Ok((socket, peer)) => {
                        debug!(%peer, "Accepted connection");
                        pool.submit(socket, peer);
                    }
                    Err(source) => {
                        if *stop_tx.borrow() {
                            break Ok(());
                        }
                        error!(error = %source, "Error accepting client connection");
                        break Err(ServerError::Accept { source });
                    }
                },
            }
        };

        drop(listener);

        for worker in pool.shutdown() {
            if let Err(e) = worker.await {
                error!(error = %e, "worker task failed");
            }
        }

        info!("Web Server Stopped");

        result
    }
}
