//! Connection acceptance and the worker pool.

pub mod listener;
pub mod pool;

pub use listener::{Listener, ServerError, StopHandle};
pub use pool::WorkerPool;
