use std::{
    io::{stderr, Stderr},
    time::Duration,
};

use color_eyre::eyre::Result;
use crossterm::{
    cursor,
    event::{Event as CrosstermEvent, KeyEvent, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use futures::{FutureExt, StreamExt};
use ratatui::backend::CrosstermBackend as Backend;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;

const TITLE: &str = "Flappy Bird";

#[derive(Clone, Debug)]
pub enum Event {
    Init,
    Error,
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
}

pub struct Tui {
    pub terminal: ratatui::Terminal<Backend<Stderr>>,
    pub task: Option<JoinHandle<()>>,
    pub cancellation_token: CancellationToken,
    pub event_rx: UnboundedReceiver<Event>,
    pub event_tx: UnboundedSender<Event>,
    pub tick_rate: f64,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let terminal = ratatui::Terminal::new(Backend::new(stderr()))?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            task: None,
            cancellation_token: CancellationToken::new(),
            event_rx,
            event_tx,
            tick_rate: 30.0,
        })
    }

    pub fn tick_rate(&mut self, tick_rate: f64) {
        self.tick_rate = tick_rate;
    }

    /// Spawns the reader: key presses and resizes as they arrive, a `Tick` every `1 / tick_rate` seconds.
    pub fn start(&mut self) {
        let tick_delay = Duration::from_secs_f64(1.0 / self.tick_rate);
        self.cancel();
        self.cancellation_token = CancellationToken::new();
        let cancellation_token = self.cancellation_token.clone();
        let event_tx = self.event_tx.clone();
        self.task = Some(tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_delay);
            tick_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            if event_tx.send(Event::Init).is_err() {
                return;
            }
            loop {
                let tick_delay = tick_interval.tick();
                let crossterm_event = reader.next().fuse();
                let event = tokio::select! {
                    _ = cancellation_token.cancelled() => break,
                    maybe_event = crossterm_event => match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => Event::Key(key),
                        Some(Ok(CrosstermEvent::Resize(x, y))) => Event::Resize(x, y),
                        Some(Ok(_)) => continue,
                        Some(Err(_)) => Event::Error,
                        None => break,
                    },
                    _ = tick_delay => Event::Tick,
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) -> Result<()> {
        self.cancel();
        let Some(task) = &self.task else {
            return Ok(());
        };
        let mut counter = 0;
        while !task.is_finished() {
            std::thread::sleep(Duration::from_millis(1));
            counter += 1;
            if counter > 50 {
                task.abort();
            }
            if counter > 100 {
                log::error!("Failed to abort task in 100 milliseconds for unknown reason");
                break;
            }
        }
        self.task = None;
        Ok(())
    }

    pub fn enter(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(stderr(), EnterAlternateScreen, cursor::Hide, SetTitle(TITLE))?;
        self.terminal.clear()?;
        self.start();
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stop()?;
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.terminal.flush()?;
            restore()?;
        }
        Ok(())
    }

    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }
}

/// Leaves the alternate screen and raw mode. Also used by the panic hook.
pub fn restore() -> Result<()> {
    crossterm::execute!(stderr(), LeaveAlternateScreen, cursor::Show)?;
    crossterm::terminal::disable_raw_mode()?;
    Ok(())
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            log::error!("Unable to restore the terminal: {e:?}");
        }
    }
}
