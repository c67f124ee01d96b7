//! Runtime bridge - connects the sync TUI thread with the async Tokio runtime
//!
//! The TUI thread owns the fetch cache. It sends fetch tickets to the worker
//! and polls completions between frames, so cache transitions never run
//! concurrently with each other.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::core::FetchError;
use crate::domain::{DashboardTab, Record};
use crate::infrastructure::producer::DataProducer;
use crate::infrastructure::runtime::worker::run_async_worker;
use crate::store::FetchTicket;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Run the producer for an issued ticket
    Fetch { ticket: FetchTicket<DashboardTab> },
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A producer call resolved. Sent exactly once per `Fetch` command.
    FetchFinished {
        ticket: FetchTicket<DashboardTab>,
        result: Result<Vec<Record>, FetchError>,
    },
    /// Worker-level failure not tied to a ticket
    Error { message: String },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: UnboundedSender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
    worker: Option<JoinHandle<()>>,
}

impl RuntimeBridge {
    /// Start the worker thread with its own Tokio runtime
    pub fn new(producer: Arc<dyn DataProducer>) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = unbounded_channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("talentboard-worker")
            .build()
            .context("create Tokio runtime")?;

        let worker = thread::Builder::new()
            .name("talentboard-runtime".to_string())
            .spawn(move || {
                rt.block_on(async {
                    if let Err(err) = run_async_worker(producer, cmd_rx, evt_tx.clone()).await {
                        tracing::error!(event = "runtime.worker.failed", error = %err);
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Worker exited: {:#}", err),
                        });
                    }
                });
            })
            .context("spawn runtime thread")?;

        Ok(Self {
            cmd_tx,
            evt_rx,
            worker: Some(worker),
        })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Wait up to `timeout` for the next event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RuntimeEvent> {
        match self.evt_rx.recv_timeout(timeout) {
            Ok(evt) => Some(evt),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
