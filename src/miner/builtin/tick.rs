//! Synthetic tick-counting miner.
//!
//! Counts fixed-interval ticks on a worker thread while running. It touches
//! every part of the miner contract - a worker thread to release, a required
//! parameter to validate, a view that is meaningful before the first start -
//! which makes it the reference implementation for smoke tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::json;

use crate::miner::{
    Miner, MinerDescriptor, MinerError, MinerView, ParamKind, ParamSpec, ParamValue, ParamValues,
    ViewKind, ViewOverrides,
};

/// Type identifier under which the tick miner is cataloged.
pub const TYPE_ID: &str = "tick";

/// Descriptor for the tick miner.
pub fn descriptor() -> MinerDescriptor {
    MinerDescriptor::new(
        TYPE_ID,
        "Tick counter",
        "Synthetic miner counting fixed-interval ticks; smoke-tests a deployment end to end",
        vec![
            ParamSpec::required("interval_ms", ParamKind::Integer),
            ParamSpec::optional("label", ParamKind::String),
        ],
        Box::new(|| Box::new(TickMiner::default())),
    )
}

/// Worker thread handle plus its stop signal.
struct Worker {
    stop_tx: mpsc::Sender<()>,
    handle: thread::JoinHandle<()>,
}

/// Counts ticks at a configured interval while running.
pub struct TickMiner {
    stream: String,
    interval: Duration,
    label: String,
    ticks: Arc<AtomicU64>,
    worker: Mutex<Option<Worker>>,
}

impl Default for TickMiner {
    fn default() -> Self {
        Self {
            stream: String::new(),
            interval: Duration::from_millis(1000),
            label: String::new(),
            ticks: Arc::new(AtomicU64::new(0)),
            worker: Mutex::new(None),
        }
    }
}

impl Miner for TickMiner {
    fn set_stream(&mut self, stream: &str) {
        self.stream = stream.to_string();
    }

    fn configure(&mut self, params: &ParamValues) -> Result<(), MinerError> {
        // interval_ms is declared required; the engine guarantees presence
        // and integer type before calling configure.
        let interval_ms = params
            .get("interval_ms")
            .and_then(ParamValue::as_integer)
            .ok_or_else(|| MinerError::Configuration("interval_ms must be an integer".into()))?;

        if interval_ms < 1 {
            return Err(MinerError::Configuration(format!(
                "interval_ms must be at least 1, got {interval_ms}"
            )));
        }

        #[allow(clippy::cast_sign_loss)] // Checked positive above
        {
            self.interval = Duration::from_millis(interval_ms as u64);
        }

        if let Some(label) = params.get("label").and_then(ParamValue::as_str) {
            self.label = label.to_string();
        }

        Ok(())
    }

    fn start(&self) -> Result<(), MinerError> {
        let mut slot = self.worker.lock();
        if slot.is_some() {
            return Err(MinerError::AlreadyRunning);
        }

        let (stop_tx, stop_rx) = mpsc::channel();
        let interval = self.interval;
        let ticks = Arc::clone(&self.ticks);

        let handle = thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        ticks.fetch_add(1, Ordering::Relaxed);
                    },
                    // Stop signal, or the miner itself was dropped.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        *slot = Some(Worker { stop_tx, handle });
        Ok(())
    }

    fn stop(&self) -> Result<(), MinerError> {
        let Some(worker) = self.worker.lock().take() else {
            // Not running: no-op success.
            return Ok(());
        };

        // Send can only fail if the thread already exited; join still applies.
        let _ = worker.stop_tx.send(());
        worker
            .handle
            .join()
            .map_err(|_| MinerError::Internal("tick worker thread panicked".into()))?;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    fn views(&self, overrides: &ViewOverrides) -> Vec<MinerView> {
        let label = overrides
            .get("label")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(&self.label);

        vec![MinerView::new(
            "summary",
            ViewKind::Raw,
            json!({
                "stream": self.stream,
                "label": label,
                "interval_ms": self.interval.as_millis() as u64,
                "ticks": self.ticks.load(Ordering::Relaxed),
                "running": self.is_running(),
            }),
        )]
    }
}
