//! Worker event loops.
//!
//! A fixed-size pool of single-threaded event loops, one OS thread each.
//! Connections are pinned for their whole lifetime to the loop they were
//! assigned to; the only cross-loop state is the round-robin index, which
//! lives in a [`LoopSelector`] owned by the acceptor.

use std::thread;

use anyhow::Context;
use tokio::runtime::{self, Runtime};
use tokio::sync::broadcast;

struct Worker {
    /// Taken by `run` when the worker thread starts.
    runtime: Option<Runtime>,
    shutdown: Option<broadcast::Receiver<()>>,
    handle: runtime::Handle,
}

/// A pool of event loops.
pub struct WorkerPool {
    workers: Vec<Worker>,
    shutdown: broadcast::Sender<()>,
}

impl WorkerPool {
    /// Constructs the pool with `size` event loops.
    ///
    /// The loops are built eagerly so their handles can be handed out before
    /// [`WorkerPool::run`] is called; no threads are started here. A size of
    /// zero is a configuration error.
    pub fn new(size: usize) -> anyhow::Result<Self> {
        if size == 0 {
            anyhow::bail!("worker pool size must be at least 1");
        }

        let (shutdown, _) = broadcast::channel(1);
        let mut workers = Vec::with_capacity(size);
        for _ in 0..size {
            let rt = runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to build worker runtime")?;
            workers.push(Worker {
                handle: rt.handle().clone(),
                shutdown: Some(shutdown.subscribe()),
                runtime: Some(rt),
            });
        }

        Ok(Self { workers, shutdown })
    }

    /// Runs all event loops in the pool.
    ///
    /// Spawns one thread per loop and blocks until every loop has stopped.
    /// Each thread parks on the shutdown channel; that pending receive is
    /// what keeps an idle loop from exiting, while tasks spawned onto the
    /// loop's handle run alongside it.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut threads = Vec::with_capacity(self.workers.len());
        for (i, worker) in self.workers.iter_mut().enumerate() {
            let rt = worker
                .runtime
                .take()
                .context("worker pool is already running")?;
            let mut shutdown = worker
                .shutdown
                .take()
                .context("worker pool is already running")?;

            let thread = thread::Builder::new()
                .name(format!("worker-{i}"))
                .spawn(move || {
                    rt.block_on(async move {
                        let _ = shutdown.recv().await;
                    });
                })
                .context("failed to spawn worker thread")?;
            threads.push(thread);
        }

        for thread in threads {
            if thread.join().is_err() {
                tracing::error!("worker thread panicked");
            }
        }
        Ok(())
    }

    /// Asks every event loop to stop processing.
    ///
    /// Connections in flight are abandoned, not drained: each loop finishes
    /// its current poll, drops its pending tasks, and exits.
    pub fn stop(&self) {
        let _ = self.shutdown.send(());
    }

    /// A clonable token that stops the pool; usable from spawned tasks that
    /// cannot borrow the pool itself.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle { shutdown: self.shutdown.clone() }
    }

    /// Snapshot of the loop handles plus a fresh round-robin index.
    ///
    /// The selector is meant to move into the acceptor task and be used from
    /// that single-threaded context only.
    pub fn selector(&self) -> LoopSelector {
        LoopSelector {
            handles: self.workers.iter().map(|w| w.handle.clone()).collect(),
            next: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

/// Token for requesting pool shutdown.
#[derive(Clone)]
pub struct StopHandle {
    shutdown: broadcast::Sender<()>,
}

impl StopHandle {
    pub fn stop(&self) {
        let _ = self.shutdown.send(());
    }
}

/// Round-robin chooser over the pool's event loops.
///
/// Holds the only mutable round-robin state; it is owned by the acceptor and
/// never shared, so selection needs no synchronization.
pub struct LoopSelector {
    handles: Vec<runtime::Handle>,
    next: usize,
}

impl LoopSelector {
    /// Picks the next event loop, wrapping at the pool size. Returns the loop
    /// index alongside the handle.
    pub fn next_loop(&mut self) -> (usize, runtime::Handle) {
        let index = self.next;
        self.next = (self.next + 1) % self.handles.len();
        (index, self.handles[index].clone())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
