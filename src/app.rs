//! # Runtime
//!
//! [`App::run`] owns the single event loop. It starts the clock trigger,
//! issues the one-shot position query, turns [`Command::LookupAddress`] into
//! a lookup task, and redraws the surface after every event. All three
//! branches report through one channel, so the loop is the only writer of
//! [`ClockState`].

use crate::{
    clock::Ticker,
    config::Config,
    geocoder::OpenCageClient,
    geolocation::{GeolocationError, LocationProvider},
    renderer::{compose, render_ascii, Frame},
    state::{update, ClockState, Command, Event, Transition},
    Coordinates,
};
use anyhow::Context;
use chrono::Local;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const EVENT_BUFFER: usize = 16;

/// Where frames end up.
pub trait Surface {
    fn present(&mut self, frame: &Frame) -> anyhow::Result<()>;
}

/// Full-terminal surface: clears the screen and draws the ASCII panel.
pub struct TerminalSurface {
    out: io::Stdout,
    width: usize,
    clear: bool,
}

impl TerminalSurface {
    pub fn new(width: usize) -> Self {
        TerminalSurface {
            out: io::stdout(),
            width,
            clear: true,
        }
    }

    /// Append frames instead of redrawing in place (for pipes and logs).
    pub fn appending(width: usize) -> Self {
        TerminalSurface {
            clear: false,
            ..Self::new(width)
        }
    }
}

impl Surface for TerminalSurface {
    fn present(&mut self, frame: &Frame) -> anyhow::Result<()> {
        if self.clear {
            execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))
                .context("clear terminal")?;
        }
        self.out
            .write_all(render_ascii(frame, self.width).as_bytes())
            .context("write frame")?;
        self.out.flush().context("flush terminal")?;
        Ok(())
    }
}

/// The clock widget and its asynchronous branches.
pub struct App<S: Surface> {
    config: Config,
    provider: Option<Box<dyn LocationProvider + Send>>,
    geocoder: OpenCageClient,
    surface: S,
    exit_when_settled: bool,
}

impl<S: Surface> App<S> {
    pub fn new(
        config: Config,
        provider: Box<dyn LocationProvider + Send>,
        geocoder: OpenCageClient,
        surface: S,
    ) -> Self {
        App {
            config,
            provider: Some(provider),
            geocoder,
            surface,
            exit_when_settled: false,
        }
    }

    /// Stop once the location branch has produced an address or an error.
    pub fn exit_when_settled(mut self, enabled: bool) -> Self {
        self.exit_when_settled = enabled;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Run until `shutdown` resolves (or the location branch settles, when
    /// asked to). Returns the last state shown.
    pub async fn run<F>(&mut self, shutdown: F) -> anyhow::Result<ClockState>
    where
        F: Future<Output = ()>,
    {
        let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
        let mut state = ClockState::new(Local::now());
        self.draw(&state)?;

        let period = Duration::from_millis(self.config.display.tick_millis.max(1));
        let mut ticker = Ticker::start(period, tx.clone());
        self.request_position(tx.clone());

        tokio::pin!(shutdown);
        loop {
            let event = tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                event = rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            let Transition {
                state: next,
                command,
            } = update(&state, event);
            state = next;

            if let Some(Command::LookupAddress(coords)) = command {
                self.spawn_lookup(coords, tx.clone());
            }
            self.draw(&state)?;

            if self.exit_when_settled && location_settled(&state) {
                debug!("location branch settled");
                break;
            }
        }

        ticker.cancel();
        Ok(state)
    }

    fn draw(&mut self, state: &ClockState) -> anyhow::Result<()> {
        let frame = compose(state, &self.config.display);
        self.surface.present(&frame)
    }

    /// One-shot: the provider is consumed, so a second call does nothing.
    fn request_position(&mut self, tx: mpsc::Sender<Event>) {
        let Some(provider) = self.provider.take() else {
            return;
        };
        tokio::spawn(async move {
            let reading = tokio::task::spawn_blocking(move || provider.current_position())
                .await
                .unwrap_or_else(|e| Err(GeolocationError::Unavailable(e.to_string())));
            let _ = tx.send(Event::LocationResolved(reading)).await;
        });
    }

    fn spawn_lookup(&self, coords: Coordinates, tx: mpsc::Sender<Event>) {
        let geocoder = self.geocoder.clone();
        tokio::spawn(async move {
            let result = geocoder.lookup(coords).await;
            if tx.send(Event::AddressResolved(result)).await.is_err() {
                warn!("display gone, discarding address result");
            }
        });
    }
}

/// True once the location branch can produce nothing further.
pub fn location_settled(state: &ClockState) -> bool {
    state.error.is_some() || state.address.is_some()
}
