//! HTTP protocol implementation.
//!
//! This module implements the one-request-per-connection subset of HTTP/1.0
//! and HTTP/1.1 that a static file server needs: GET and HEAD, no request
//! bodies, no keep-alive.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine
//! - **`reader`**: Reads the request line and header block under timeouts
//! - **`parser`**: Request line and header line patterns
//! - **`request`**: Request, request line and header map types
//! - **`response`**: Status codes, outcomes and the decision of what to serve
//! - **`writer`**: Serializes responses and streams file bodies
//! - **`listing`**: HTML directory listings
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Request line, then headers
//!        └──────┬──────┘
//!               │ well-formed request         timeout / io error / empty
//!               ▼                                        │
//!        ┌──────────────────┐                            │
//!        │   Processing     │ ← Decide outcome           │
//!        └──────┬───────────┘                            │
//!               ▼                                        │
//!        ┌──────────────────┐                            │
//!        │    Writing       │ ◄──────────────────────────┘
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │ ← Stream shut down
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use fileserver::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! let listener = TcpListener::bind("127.0.0.1:9090").await?;
//! let (socket, _addr) = listener.accept().await?;
//! let outcome = Connection::new(socket, config.clone()).run().await?;
//! ```

pub mod connection;
pub mod listing;
pub mod mime;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod writer;
