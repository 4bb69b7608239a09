//! The generic polling monitor: drives a status probe on a cadence,
//! yields only on distinct status keys, enforces the transition DAG, and
//! terminates on a terminal status or a timeout.
//!
//! The probe is a plain closure so any source of truth can be plugged in
//! (contract read, account read, indexer) — the monitor itself is purely
//! a polling/transition-validation shell around it.

use std::future::Future;
use std::time::Duration;

use bridge_types::{BridgeError, ErrorStage, ExecutionStatus, StatusKey};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_stream::wrappers::ReceiverStream;

/// `timeoutMs` default 60s, `pollIntervalMs` default 5s.
#[derive(Debug, Clone, Copy)]
pub struct MonitorOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(5),
        }
    }
}

pub type MonitorStream = ReceiverStream<Result<ExecutionStatus, BridgeError>>;

/// Whether `next` is a legal follow-on to `prev` per the transition DAG:
///
/// ```text
/// Unknown           -> Initiated
/// Initiated         -> FinalizedOnSource | Executable
/// FinalizedOnSource -> Proven | Executable
/// Proven            -> Executable
/// Executable        -> Executing | Executed
/// Executing         -> Executed
/// ```
/// plus `-> Failed`/`-> Expired` from any non-terminal status. Self-loops
/// never reach this function: the caller only invokes it on a status-key
/// change.
fn is_legal_transition(prev: &StatusKey, next: &StatusKey) -> bool {
    use StatusKey::*;

    if matches!(next, Failed { .. } | Expired { .. }) {
        return !matches!(prev, Failed { .. } | Executed { .. } | Expired { .. });
    }

    matches!(
        (prev, next),
        (Unknown, Initiated { .. })
            | (Initiated { .. }, FinalizedOnSource { .. })
            | (Initiated { .. }, Executable)
            | (FinalizedOnSource { .. }, Proven { .. })
            | (FinalizedOnSource { .. }, Executable)
            | (Proven { .. }, Executable)
            | (Executable, Executing { .. })
            | (Executable, Executed { .. })
            | (Executing { .. }, Executed { .. })
    )
}

/// Runs `probe` on `options.poll_interval`, yielding into the returned
/// stream only when the status key changes, validating each transition,
/// and stopping after a terminal status, a DAG violation, or a timeout.
/// The polling loop runs on a spawned task; dropping the stream drops the
/// task's only sender, which ends the loop on its next send attempt.
pub fn monitor_status_stream<P, Fut>(probe: P, options: MonitorOptions) -> MonitorStream
where
    P: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ExecutionStatus, BridgeError>> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(8);

    tokio::spawn(async move {
        let deadline = Instant::now() + options.timeout;
        let mut last_key: Option<StatusKey> = None;

        loop {
            let status = match probe().await {
                Ok(status) => status,
                Err(err) => {
                    let _ = tx.send(Err(err)).await;
                    return;
                }
            };

            let key = status.status_key();
            if last_key.as_ref() != Some(&key) {
                if let Some(prev) = &last_key {
                    if !is_legal_transition(prev, &key) {
                        let _ = tx
                            .send(Err(BridgeError::InvariantViolation {
                                reason: format!("illegal status transition {prev:?} -> {key:?}"),
                                stage: ErrorStage::Monitor,
                            }))
                            .await;
                        return;
                    }
                }

                let terminal = status.is_terminal();
                last_key = Some(key);
                if tx.send(Ok(status)).await.is_err() {
                    return;
                }
                if terminal {
                    return;
                }
            }

            let now = Instant::now();
            if now >= deadline {
                let _ = tx
                    .send(Err(BridgeError::Timeout {
                        reason: format!("monitor exceeded {:?} without reaching a terminal status", options.timeout),
                        stage: ErrorStage::Monitor,
                    }))
                    .await;
                return;
            }
            tokio::time::sleep(options.poll_interval.min(deadline - now)).await;
        }
    });

    ReceiverStream::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::SystemTime;
    use tokio_stream::StreamExt;

    fn at(status_fn: impl FnOnce(std::time::SystemTime) -> ExecutionStatus) -> ExecutionStatus {
        status_fn(SystemTime::now())
    }

    #[tokio::test]
    async fn yields_distinct_statuses_until_terminal() {
        let sequence = Mutex::new(vec![
            at(|at| ExecutionStatus::Unknown { at }),
            at(|at| ExecutionStatus::Initiated { at, source_tx: None }),
            at(|at| ExecutionStatus::Executable { at }),
            at(|at| ExecutionStatus::Executed {
                at,
                execution_tx: None,
            }),
        ]);

        let stream = monitor_status_stream(
            move || {
                let next = {
                    let mut guard = sequence.lock().unwrap();
                    if guard.is_empty() {
                        guard.push(at(|at| ExecutionStatus::Executed {
                            at,
                            execution_tx: None,
                        }));
                    }
                    guard.remove(0)
                };
                async move { Ok(next) }
            },
            MonitorOptions {
                timeout: Duration::from_secs(5),
                poll_interval: Duration::from_millis(1),
            },
        );

        let results: Vec<_> = stream.collect().await;
        assert_eq!(results.len(), 4);
        assert!(results[3].as_ref().unwrap().is_terminal());
    }

    #[tokio::test]
    async fn illegal_transition_raises_invariant_violation() {
        let sequence = Mutex::new(vec![
            at(|at| ExecutionStatus::Unknown { at }),
            at(|at| ExecutionStatus::Executed {
                at,
                execution_tx: None,
            }),
        ]);
        let stream = monitor_status_stream(
            move || {
                let next = {
                    let mut guard = sequence.lock().unwrap();
                    if guard.is_empty() {
                        guard.push(at(|at| ExecutionStatus::Executed {
                            at,
                            execution_tx: None,
                        }));
                    }
                    guard.remove(0)
                };
                async move { Ok(next) }
            },
            MonitorOptions {
                timeout: Duration::from_secs(5),
                poll_interval: Duration::from_millis(1),
            },
        );

        let results: Vec<_> = stream.collect().await;
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[1],
            Err(BridgeError::InvariantViolation { .. })
        ));
    }

    #[tokio::test]
    async fn timeout_fires_when_status_never_reaches_terminal() {
        let stream = monitor_status_stream(
            || async { Ok(at(|at| ExecutionStatus::Executable { at })) },
            MonitorOptions {
                timeout: Duration::from_millis(20),
                poll_interval: Duration::from_millis(5),
            },
        );
        let results: Vec<_> = stream.collect().await;
        assert!(matches!(results.last(), Some(Err(BridgeError::Timeout { .. }))));
    }
}
