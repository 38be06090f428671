use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::http::reader::read_request;
use crate::http::request::Request;
use crate::http::response::{BadRequestReason, Response, ResponseOutcome};

/// One accepted connection, driven from request to close by a single worker.
pub struct Connection<S> {
    stream: BufReader<S>,
    config: Arc<Config>,
    state: ConnectionState,
    request_line: Option<String>,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(Response),
    Closed(ResponseOutcome),
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<Config>) -> Self {
        Self {
            stream: BufReader::new(stream),
            config,
            state: ConnectionState::Reading,
            request_line: None,
        }
    }

    /// Reads one request, answers it and closes the connection.
    ///
    /// The stream is shut down on every path, including a failed write.
    /// A write failure is returned as is and not retried.
    pub async fn run(mut self) -> std::io::Result<ResponseOutcome> {
        let result = self.drive().await;

        if let Err(e) = self.stream.shutdown().await {
            debug!(error = %e, "shutdown after response failed");
        }

        result
    }

    async fn drive(&mut self) -> std::io::Result<ResponseOutcome> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Reading);

            self.state = match state {
                ConnectionState::Reading => self.read().await,

                ConnectionState::Processing(request) => {
                    let response = Response::decide(&request.line, &self.config).await;
                    self.request_line = Some(request.line);
                    ConnectionState::Writing(response)
                }

                ConnectionState::Writing(response) => {
                    response.write_to(&mut self.stream, &self.config).await?;

                    info!(
                        request = self.request_line.as_deref().unwrap_or("-"),
                        status = response.outcome.status().as_u16(),
                        "response sent"
                    );

                    ConnectionState::Closed(response.outcome)
                }

                ConnectionState::Closed(outcome) => return Ok(outcome),
            };
        }
    }

    async fn read(&mut self) -> ConnectionState {
        let rejected = |outcome| ConnectionState::Writing(Response::rejected(outcome));

        match read_request(&mut self.stream, &self.config).await {
            Ok(Some(request)) if request.is_well_formed() => ConnectionState::Processing(request),

            Ok(request) => {
                self.request_line = request.map(|r| r.line);
                info!(request = self.request_line.as_deref().unwrap_or("-"), "empty request or no headers");
                rejected(ResponseOutcome::BadRequest {
                    reason: BadRequestReason::EmptyRequest,
                })
            }

            Err(e) if e.is_timeout() => {
                info!(error = %e, "request read timed out");
                rejected(ResponseOutcome::Timeout)
            }

            Err(e) => {
                warn!(error = %e, "failed to read request");
                rejected(ResponseOutcome::ServerError)
            }
        }
    }
}
