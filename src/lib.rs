//! fileserver - Static File HTTP Server
//!
//! Serves files and directory listings from a document root over a
//! minimal HTTP/1.x subset, one request per connection, using a fixed pool
//! of workers.

pub mod config;
pub mod http;
pub mod server;
