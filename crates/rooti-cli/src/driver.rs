//! Real-time tick source for the shell.
//!
//! Follows the engine's `TickScheduled` / `TickCancelled` events: each
//! armed schedule gets a tokio interval task that sends its handle down a
//! channel once per period. The control loop receives those handles and
//! passes them back to the session, so every mutation stays on one task.
//! Ticks still sitting in the channel after a cancel carry a stale handle
//! and are dropped by the engine.

use std::time::Duration;

use rooti_core::{Event, TickHandle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct TickDriver {
    tx: mpsc::UnboundedSender<TickHandle>,
    running: Option<(TickHandle, JoinHandle<()>)>,
    manual: bool,
}

impl TickDriver {
    /// With `manual` set no interval is ever spawned; time only moves when
    /// the shell's `tick` command says so.
    pub fn new(manual: bool) -> (Self, mpsc::UnboundedReceiver<TickHandle>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                running: None,
                manual,
            },
            rx,
        )
    }

    pub fn follow(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TickCancelled { handle } => self.cancel(*handle),
                Event::TickScheduled { handle, period_ms } => self.schedule(*handle, *period_ms),
                _ => {}
            }
        }
    }

    fn schedule(&mut self, handle: TickHandle, period_ms: u64) {
        // Never more than one interval alive.
        self.abort_running();
        if self.manual {
            return;
        }

        let tx = self.tx.clone();
        let period = Duration::from_millis(period_ms.max(1));
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(%handle, period_ms, "tick interval spawned");
        self.running = Some((handle, task));
    }

    fn cancel(&mut self, handle: TickHandle) {
        if matches!(&self.running, Some((current, _)) if *current == handle) {
            self.abort_running();
        }
    }

    fn abort_running(&mut self) {
        if let Some((handle, task)) = self.running.take() {
            task.abort();
            tracing::debug!(%handle, "tick interval aborted");
        }
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.abort_running();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rooti_core::{RoutineStore, TimerEngine};

    #[tokio::test(start_paused = true)]
    async fn delivers_armed_handle_each_period() {
        let routine = RoutineStore::new();
        let mut engine = TimerEngine::with_tick_period(1000);
        let (mut driver, mut rx) = TickDriver::new(false);

        driver.follow(&engine.start(&routine));
        let handle = engine.tick_handle().unwrap();

        for _ in 0..3 {
            let got = rx.recv().await.unwrap();
            assert_eq!(got, handle);
            engine.tick(&routine, got);
        }
        assert_eq!(engine.elapsed_secs(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_the_interval() {
        let routine = RoutineStore::new();
        let mut engine = TimerEngine::new();
        let (mut driver, mut rx) = TickDriver::new(false);

        driver.follow(&engine.start(&routine));
        rx.recv().await.unwrap();
        driver.follow(&engine.pause(&routine));
        assert!(driver.running.is_none());

        tokio::time::sleep(Duration::from_secs(5)).await;
        // At most a tick already in flight; nothing new after the abort.
        let mut leftover = 0;
        while rx.try_recv().is_ok() {
            leftover += 1;
        }
        assert!(leftover <= 1);
    }

    #[test]
    fn manual_driver_spawns_nothing() {
        let routine = RoutineStore::new();
        let mut engine = TimerEngine::new();
        let (mut driver, mut rx) = TickDriver::new(true);
        driver.follow(&engine.start(&routine));
        assert!(driver.running.is_none());
        assert!(rx.try_recv().is_err());
    }
}
