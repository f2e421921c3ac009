//! # Clock Source
//!
//! A repeating trigger on the tokio runtime. Each trigger sends
//! [`Event::Tick`] with the current local time into the runtime channel.
//! The trigger stops when [`Ticker::cancel`] is called, when the `Ticker` is
//! dropped, or when nobody is listening any more.

use crate::state::Event;
use chrono::Local;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

/// Handle to a running clock trigger.
#[derive(Debug)]
pub struct Ticker {
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Start ticking every `period`. The first tick fires after one period.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(period: Duration, events: mpsc::Sender<Event>) -> Self {
        let (stop, mut stopped) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = stopped.changed() => break,
                    _ = interval.tick() => {
                        if *stopped.borrow() {
                            break;
                        }
                        if events.send(Event::Tick(Local::now())).await.is_err() {
                            break;
                        }
                    }
                }
            }
            debug!("clock trigger stopped");
        });
        Ticker {
            stop,
            task: Some(task),
        }
    }

    /// Stop the trigger. Safe to call any number of times.
    pub fn cancel(&mut self) {
        let _ = self.stop.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// True once [`Ticker::cancel`] has run.
    pub fn is_cancelled(&self) -> bool {
        self.task.is_none()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
