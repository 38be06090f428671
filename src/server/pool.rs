use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info_span};

use crate::config::Config;
use crate::http::connection::Connection;

type Job = (TcpStream, SocketAddr);

/// A fixed set of workers taking connections from one unbounded queue.
///
/// Each worker handles a connection from first read to close before taking
/// the next. When every worker is busy, new connections wait in the queue.
pub struct WorkerPool {
    sender: mpsc::UnboundedSender<Job>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `config.workers` workers. Must be called inside a tokio runtime.
    pub fn new(config: Arc<Config>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..config.workers.max(1))
            .map(|id| {
                let receiver = Arc::clone(&receiver);
                let config = Arc::clone(&config);
                tokio::spawn(worker_loop(id, receiver, config))
            })
            .collect();

        Self { sender, workers }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queues a connection for the next free worker.
    pub fn submit(&self, stream: TcpStream, peer: SocketAddr) {
        if let Err(e) = self.sender.send((stream, peer)) {
            let (_, peer) = e.0;
            error!(%peer, "worker pool closed, dropping connection");
        }
    }

    /// Stops taking new work. Queued and in-flight connections still run to
    /// completion; the returned handles finish once they have.
    pub fn shutdown(self) -> Vec<JoinHandle<()>> {
        drop(self.sender);
        self.workers
    }
}

async fn worker_loop(id: usize, receiver: Arc<Mutex<mpsc::UnboundedReceiver<Job>>>, config: Arc<Config>) {
    debug!(worker = id, "worker started");

    loop {
        // The lock is only held while waiting for the next job.
        let job = receiver.lock().await.recv().await;

        let Some((stream, peer)) = job else {
            break;
        };

        let span = info_span!("connection", %peer, worker = id);
        let result = Connection::new(stream, Arc::clone(&config))
            .run()
            .instrument(span)
            .await;

        if let Err(e) = result {
            error!(%peer, worker = id, error = %e, "connection failed");
        }
    }

    debug!(worker = id, "worker stopped");
}
