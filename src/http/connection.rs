use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::http::handler::RequestHandler;
use crate::http::parser::{ParseOutcome, RequestParser};
use crate::http::request::Request;
use crate::http::response::{Reply, StatusCode};
use crate::http::writer;

/// Size of the per-connection read buffer.
const BUFFER_SIZE: usize = 8192;

/// A single connection from a client.
///
/// Owns the socket, the read buffer, the parser with its in-progress request,
/// and the in-progress reply. The task spawned for the connection owns this
/// value, so it lives exactly as long as an operation is outstanding on it;
/// when the task is dropped on pool shutdown the connection is abandoned.
pub struct Connection {
    stream: TcpStream,
    buffer: [u8; BUFFER_SIZE],
    parser: RequestParser,
    request: Request,
    reply: Reply,
    handler: Arc<dyn RequestHandler>,
    state: ConnectionState,
}

/// Per-connection protocol states.
///
/// Operations are strictly sequential: at most one read or write is
/// outstanding at any time, and the connection never returns to Reading once
/// a reply is in flight (one-shot, no keep-alive).
enum ConnectionState {
    Reading,
    Writing,
    TransferringFile,
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, handler: Arc<dyn RequestHandler>) -> Self {
        Self {
            stream,
            buffer: [0; BUFFER_SIZE],
            parser: RequestParser::new(),
            request: Request::default(),
            reply: Reply::default(),
            handler,
            state: ConnectionState::Reading,
        }
    }

    /// Drives the connection to completion.
    ///
    /// Any I/O error ends the connection immediately: nothing further is
    /// written and the error propagates to the caller for logging.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match self.state {
                ConnectionState::Reading => {
                    let n = self
                        .stream
                        .read(&mut self.buffer)
                        .await
                        .context("read failed")?;
                    if n == 0 {
                        anyhow::bail!("connection closed before request was complete");
                    }

                    let (outcome, _) = self.parser.parse(&mut self.request, &self.buffer[..n]);
                    match outcome {
                        ParseOutcome::Complete => {
                            self.reply = self.handler.handle(&self.request);
                            self.state = ConnectionState::Writing;
                        }
                        ParseOutcome::Invalid => {
                            self.reply = Reply::stock(StatusCode::BadRequest);
                            self.state = ConnectionState::Writing;
                        }
                        ParseOutcome::Incomplete => {}
                    }
                }

                ConnectionState::Writing => {
                    writer::write_reply(&mut self.stream, &self.reply)
                        .await
                        .context("write failed")?;

                    if self.reply.has_pending_file() {
                        self.state = ConnectionState::TransferringFile;
                    } else {
                        self.finish().await;
                    }
                }

                ConnectionState::TransferringFile => {
                    if self.reply.advance_chunk().context("file chunk failed")? {
                        self.stream
                            .write_all(&self.reply.content)
                            .await
                            .context("write failed")?;
                    } else {
                        self.finish().await;
                    }
                }

                ConnectionState::Closed => break,
            }
        }

        Ok(())
    }

    /// Graceful closure: flush the write direction, then let the socket drop.
    async fn finish(&mut self) {
        let _ = self.stream.shutdown().await;
        self.state = ConnectionState::Closed;
    }
}
