//! Async worker - runs in Tokio runtime and executes producer calls

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinSet;

use crate::core::FetchError;
use crate::domain::{DashboardTab, Record};
use crate::infrastructure::producer::{DataProducer, ProducerError};
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};
use crate::store::FetchTicket;

/// Run the async worker loop until shutdown or until the TUI side hangs up.
///
/// Every fetch runs as its own task, so a slow request never delays a newer
/// one. Ordering between them is resolved by the cache, not here.
pub async fn run_async_worker(
    producer: Arc<dyn DataProducer>,
    mut cmd_rx: UnboundedReceiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    let mut in_flight = JoinSet::new();
    tracing::info!(event = "runtime.worker.started", producer = %producer.describe());

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(RuntimeCommand::Fetch { ticket }) => {
                    let producer = Arc::clone(&producer);
                    let evt_tx = evt_tx.clone();
                    in_flight.spawn(async move {
                        let result = run_fetch(producer, ticket).await;
                        let _ = evt_tx.send(RuntimeEvent::FetchFinished { ticket, result });
                    });
                }
                Some(RuntimeCommand::Shutdown) | None => break,
            },
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(err) = joined {
                    let _ = evt_tx.send(RuntimeEvent::Error {
                        message: format!("Fetch task failed: {err}"),
                    });
                }
            }
        }
    }

    tracing::info!(
        event = "runtime.worker.stopped",
        abandoned = in_flight.len(),
    );
    in_flight.abort_all();
    Ok(())
}

/// Invoke the producer on its own task so a panicking producer still yields
/// exactly one completion for the ticket.
async fn run_fetch(
    producer: Arc<dyn DataProducer>,
    ticket: FetchTicket<DashboardTab>,
) -> Result<Vec<Record>, FetchError> {
    let started = Instant::now();
    let joined = tokio::spawn(async move { producer.fetch(ticket.key).await }).await;
    let result = match joined {
        Ok(result) => result,
        Err(err) => Err(ProducerError::Task {
            message: err.to_string(),
        }),
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(rows) => tracing::info!(
            event = "producer.fetch.completed",
            key = ?ticket.key,
            seq = ticket.seq.0,
            rows = rows.len(),
            elapsed_ms,
        ),
        Err(err) => tracing::warn!(
            event = "producer.fetch.failed",
            key = ?ticket.key,
            seq = ticket.seq.0,
            error = %err,
            elapsed_ms,
        ),
    }
    result.map_err(FetchError::from)
}
