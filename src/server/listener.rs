use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpSocket;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::handler::RequestHandler;
use crate::server::pool::{LoopSelector, StopHandle, WorkerPool};

const BACKLOG: u32 = 1024;

/// The server: a listening socket, an acceptor, and the worker pool.
pub struct Server {
    config: Config,
    pool: WorkerPool,
    handler: Arc<dyn RequestHandler>,
}

impl Server {
    /// Builds the worker pool for the configured size. Fails without starting
    /// anything if the configuration is unusable.
    pub fn new(config: Config, handler: Arc<dyn RequestHandler>) -> anyhow::Result<Self> {
        let pool = WorkerPool::new(config.worker_threads)?;
        Ok(Self { config, pool, handler })
    }

    /// Binds the listening socket, starts the acceptor on one of the pool's
    /// loops, and runs the pool until a termination signal stops it.
    ///
    /// Address resolution and binding happen before any thread starts, so a
    /// configuration failure leaves no partial server state behind.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let addr = resolve_addr(&self.config)?;
        let socket = bind_socket(addr)?;
        info!("listening on {addr}");

        let mut selector = self.pool.selector();
        let (_, accept_handle) = selector.next_loop();
        accept_handle.spawn(accept_loop(
            socket,
            selector,
            self.handler.clone(),
            self.pool.stop_handle(),
        ));

        self.pool.run()
    }
}

fn resolve_addr(config: &Config) -> anyhow::Result<SocketAddr> {
    (config.listen_addr.as_str(), config.listen_port)
        .to_socket_addrs()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.listen_addr, config.listen_port
            )
        })?
        .next()
        .context("listen address resolved to nothing")
}

fn bind_socket(addr: SocketAddr) -> anyhow::Result<TcpSocket> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    };
    let socket = socket.context("failed to create listening socket")?;

    socket
        .set_reuseaddr(true)
        .context("failed to set SO_REUSEADDR")?;
    socket
        .bind(addr)
        .with_context(|| format!("failed to bind {addr}"))?;
    Ok(socket)
}

/// Accepts connections and assigns each to the next loop in rotation.
///
/// Accept errors are logged and skipped; the loop keeps accepting. A
/// termination signal stops the whole pool instead.
async fn accept_loop(
    socket: TcpSocket,
    mut selector: LoopSelector,
    handler: Arc<dyn RequestHandler>,
    stop: StopHandle,
) {
    let listener = match socket.listen(BACKLOG) {
        Ok(listener) => listener,
        Err(e) => {
            error!("listen failed: {e}");
            stop.stop();
            return;
        }
    };

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown signal received");
                stop.stop();
                return;
            }
            res = listener.accept() => match res {
                Ok((stream, peer)) => {
                    let (worker, handle) = selector.next_loop();
                    debug!(peer = %peer, worker, "accepted connection");

                    let handler = handler.clone();
                    handle.spawn(async move {
                        let mut conn = Connection::new(stream, handler);
                        if let Err(e) = conn.run().await {
                            debug!(peer = %peer, "connection ended: {e:#}");
                        }
                    });
                }
                Err(e) => {
                    warn!("accept error: {e}");
                }
            },
        }
    }
}

/// Resolves when the process receives SIGINT, SIGTERM, or SIGQUIT.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (signal(SignalKind::terminate()), signal(SignalKind::quit())) {
            (Ok(mut term), Ok(mut quit)) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                    _ = quit.recv() => {}
                }
            }
            _ => {
                warn!("failed to install termination signal handlers");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
