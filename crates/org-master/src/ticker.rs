//! Fixed-period tick thread, standing in for the hardware timer interrupt.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::Playback;

/// A running timer. Dropping it stops the thread.
pub(crate) struct Ticker {
    stop_signal: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Ticker {
    pub(crate) fn spawn(shared: Arc<Mutex<Playback>>, period: Duration) -> Self {
        let stop_signal = Arc::new(AtomicBool::new(false));
        let stop = stop_signal.clone();

        let thread = std::thread::spawn(move || {
            tracing::debug!(?period, "tick thread started");
            let mut deadline = Instant::now() + period;
            while !stop.load(Ordering::Relaxed) {
                let now = Instant::now();
                if now < deadline {
                    std::thread::sleep(deadline - now);
                    continue;
                }

                {
                    let mut pb = shared.lock();
                    pb.tick();
                    pb.report_overruns();
                }

                deadline += period;
                // Drop missed periods instead of bursting to catch up
                if deadline + period < now {
                    deadline = now + period;
                }
            }
            tracing::debug!("tick thread stopped");
        });

        Self {
            stop_signal,
            thread: Some(thread),
        }
    }

    pub(crate) fn stop(&mut self) {
        self.stop_signal.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
