use color_eyre::eyre::{eyre, Result};
use crossterm::event::KeyEvent;
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{backend::Backend, layout::Rect, Terminal};
use tokio::sync::mpsc;

use crate::{
    action::Action,
    assets::Assets,
    components::playfield::{Playfield, TerminalSurface},
    config::Config,
    game::{GameSession, Input, State},
    tui,
};

pub struct App {
    config: Config,
    session: GameSession,
    playfield: Playfield,
    pending: Vec<Input>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>) -> Result<Self> {
        let assets = Assets::load(&config)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::info!(
            difficulty = %config.game.difficulty,
            gap = config.game.pipe_gap(),
            spacing = config.game.pipe_spacing(),
            speed = config.game.pipe_speed(),
            tick_rate = config.game.tick_rate,
            ?seed,
            "starting"
        );
        tracing::debug!("keybindings: {}", config.keybindings.describe());

        let session = GameSession::new(config.game.clone(), rng);
        let playfield = Playfield::new(assets, config.game.clone());
        Ok(Self { config, session, playfield, pending: Vec::new(), should_quit: false })
    }

    pub fn state(&self) -> State {
        self.session.state()
    }

    /// Runs until the player quits or the session ends; returns the final score.
    pub async fn run(&mut self) -> Result<u32> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = tui::Tui::new()?;
        tui.tick_rate(self.config.game.tick_rate);
        tui.enter()?;

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    tui::Event::Tick => action_tx.send(Action::Tick)?,
                    tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
                    tui::Event::Key(key) => {
                        if let Some(action) = self.action_for(key) {
                            log::debug!("Got action: {action:?}");
                            action_tx.send(action)?;
                        }
                    },
                    tui::Event::Error => action_tx.send(Action::Error("terminal event stream failed".into()))?,
                    tui::Event::Init => {},
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                self.handle_action(&mut tui.terminal, &action)?;
            }

            if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;

        tracing::info!(score = self.session.score(), state = ?self.state(), "finished");
        Ok(self.session.score())
    }

    pub fn action_for(&self, key: KeyEvent) -> Option<Action> {
        self.config.keybindings.get(&KeyEvent::new(key.code, key.modifiers)).cloned()
    }

    pub fn handle_action<B: Backend>(&mut self, terminal: &mut Terminal<B>, action: &Action) -> Result<()> {
        if *action != Action::Tick {
            log::debug!("{action:?}");
        }
        match action {
            Action::Tick => {
                let inputs = std::mem::take(&mut self.pending);
                self.session.tick(&inputs);
                if self.session.is_running() {
                    self.render(terminal)?;
                } else {
                    self.should_quit = true;
                }
            },
            Action::Resize(w, h) => {
                terminal.resize(Rect::new(0, 0, *w, *h))?;
                self.render(terminal)?;
            },
            Action::Error(msg) => return Err(eyre!("{msg}")),
            Action::Jump | Action::Quit => self.pending.extend(action.as_input()),
        }
        Ok(())
    }

    fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut surface = TerminalSurface::new(terminal, &mut self.playfield);
        self.session.render(&mut surface)
    }
}
