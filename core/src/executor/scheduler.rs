use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::runner::ExecutionEngine;

use super::types::{ExecutionRequest, ExecutionResult};

/// What workers report back to the collector.
#[derive(Debug)]
pub(crate) enum WorkerEvent {
    Started(ExecutionRequest),
    Finished(ExecutionResult),
}

type Joined = (ExecutionRequest, Result<ExecutionResult, JoinError>);

/// Run `requests` through `engine`, at most `limit` at a time.
///
/// Every request produces exactly one `Finished` event: a real result, a launch failure,
/// a worker failure or a cancellation. A limit of 1 gives sequential execution with
/// results in submission order.
pub(crate) async fn schedule(
    engine: Arc<ExecutionEngine>,
    requests: Vec<ExecutionRequest>,
    limit: usize,
    tx: mpsc::Sender<WorkerEvent>,
    cancel: CancellationToken,
) {
    let sem = Arc::new(Semaphore::new(limit.max(1)));
    let mut pending: VecDeque<ExecutionRequest> = requests.into();
    let mut workers: FuturesUnordered<BoxFuture<'static, Joined>> = FuturesUnordered::new();

    loop {
        let has_pending = !pending.is_empty();
        tokio::select! {
            biased;

            Some((request, joined)) = workers.next(), if !workers.is_empty() => {
                let result = joined.unwrap_or_else(|e| worker_failed(&request, e));
                send(&tx, WorkerEvent::Finished(result)).await;
            }

            // Cancelled scripts are reported after the running ones so sequential
            // batches keep submission order.
            _ = cancel.cancelled(), if has_pending && workers.is_empty() => {
                tracing::info!(skipped = pending.len(), "batch cancelled, skipping unstarted scripts");
                for request in pending.drain(..) {
                    send(&tx, WorkerEvent::Finished(ExecutionResult::cancelled(&request))).await;
                }
            }

            permit = sem.clone().acquire_owned(), if has_pending && !cancel.is_cancelled() => {
                if cancel.is_cancelled() {
                    continue;
                }
                let Some(request) = pending.pop_front() else { continue };
                let permit = match permit {
                    Ok(permit) => permit,
                    Err(_) => {
                        let result = ExecutionResult::worker_failed(&request, "scheduler closed".into());
                        send(&tx, WorkerEvent::Finished(result)).await;
                        continue;
                    }
                };

                send(&tx, WorkerEvent::Started(request.clone())).await;

                let engine = engine.clone();
                let job = request.clone();
                let handle = tokio::spawn(async move {
                    let _permit = permit;
                    execute_one(&engine, &job).await
                });
                workers.push(async move { (request, handle.await) }.boxed());
            }

            else => break,
        }
    }
}

async fn execute_one(engine: &ExecutionEngine, request: &ExecutionRequest) -> ExecutionResult {
    let started_at = Utc::now();
    match engine.execute(request).await {
        Ok(result) => result,
        Err(err) => ExecutionResult::launch_failed(request, &err, started_at),
    }
}

fn worker_failed(request: &ExecutionRequest, err: JoinError) -> ExecutionResult {
    tracing::error!(script = %request.script.path().display(), error = %err, "worker died");
    ExecutionResult::worker_failed(request, format!("worker failed: {err}"))
}

async fn send(tx: &mpsc::Sender<WorkerEvent>, event: WorkerEvent) {
    if tx.send(event).await.is_err() {
        tracing::debug!("result collector is gone");
    }
}
