mod bird;
mod object;
mod pipe;
pub mod surface;

use color_eyre::eyre::Result;
use rand::{rngs::StdRng, Rng};
use strum::Display;

pub use self::{
    bird::Bird,
    object::{collide, Object},
    pipe::{Pipe, PipeGenerator},
    surface::{Layer, Position, Surface},
};
use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Jump,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Termination {
    Quit,
    Collision,
    FellOffScreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Terminated(Termination),
}

/// One run of the game, from the first tick until a terminal condition.
pub struct GameSession<R: Rng = StdRng> {
    config: GameConfig,
    state: State,
    bird: Bird,
    pipes: Vec<Pipe>,
    generator: PipeGenerator<R>,
    score: u32,
}

impl<R: Rng> GameSession<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        let mut generator = PipeGenerator::new(&config, rng);

        let mut pipes: Vec<Pipe> = Vec::with_capacity(config.pipe_count);
        for index in 0..config.pipe_count {
            let x = config.width + index as f32 * config.pipe_spacing();
            let previous = pipes.last().map(Pipe::offset);
            pipes.push(generator.create(x, previous));
        }

        let bird = Bird::new(config.bird_x, config.height / 2.0, config.bird_width, config.bird_height);
        tracing::info!(pipes = pipes.len(), difficulty = %config.difficulty, "session started");

        GameSession { config, state: State::Running, bird, pipes, generator, score: 0 }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    /// Advances the simulation by one tick. Does nothing once terminated.
    pub fn tick(&mut self, inputs: &[Input]) {
        if !self.is_running() {
            return;
        }

        for input in inputs {
            match input {
                Input::Jump => self.bird.jump(self.config.jump_strength),
                Input::Quit => {
                    self.terminate(Termination::Quit);
                    return;
                },
            }
        }

        self.bird.update(self.config.gravity);

        if self.move_pipes() {
            self.terminate(Termination::Collision);
            return;
        }

        self.recycle_pipes();

        if self.bird.y() > self.config.height {
            self.terminate(Termination::FellOffScreen);
        }
    }

    /// Presents every visible layer, then finishes the frame.
    pub fn render<S: Surface>(&self, surface: &mut S) -> Result<()> {
        surface.present(Layer::Background, Position::new(0.0, 0.0));
        surface.present(Layer::Bird, Position::new(self.bird.x(), self.bird.y()));

        for pipe in &self.pipes {
            surface.present(Layer::PipeTop, Position::new(pipe.x(), pipe.offset() - self.config.height));
            surface.present(Layer::PipeBottom, Position::new(pipe.x(), pipe.offset() + pipe.gap()));
        }

        if self.config.debug {
            let hitboxes = std::iter::once(self.bird.hitbox())
                .chain(self.pipes.iter().flat_map(|pipe| [pipe.top_hitbox(), pipe.bottom_hitbox()]));
            for hitbox in hitboxes {
                let layer = Layer::Hitbox { width: hitbox.width, height: hitbox.height };
                surface.present(layer, Position::new(hitbox.x, hitbox.y));
            }
        }

        surface.present(Layer::Score(self.score), Position::new(self.config.width / 2.0, 0.0));
        surface.refresh()
    }

    // Returns true on the first collision; later pipes are left untouched.
    fn move_pipes(&mut self) -> bool {
        let speed = self.config.pipe_speed();
        let actor = self.bird.hitbox();
        for pipe in self.pipes.iter_mut() {
            pipe.move_left(speed);
            if collide(&actor, pipe) {
                tracing::info!(
                    x = pipe.x(),
                    offset = pipe.offset(),
                    bird_y = self.bird.y(),
                    velocity = self.bird.velocity(),
                    "collision detected"
                );
                return true;
            }
        }
        false
    }

    fn recycle_pipes(&mut self) {
        let (passed, mut pipes): (Vec<Pipe>, Vec<Pipe>) =
            std::mem::take(&mut self.pipes).into_iter().partition(Pipe::passed);

        // Only used when every pipe passed at once.
        let last_passed = passed.last().map(Pipe::offset);
        for _ in &passed {
            let previous = pipes.last().map(Pipe::offset).or(last_passed);
            let pipe = self.generator.create(self.config.width, previous);
            tracing::debug!(offset = pipe.offset(), ?previous, "pipe recycled");
            pipes.push(pipe);
            self.score += 1;
        }
        if !passed.is_empty() {
            tracing::debug!(score = self.score, "score");
        }

        self.pipes = pipes;
    }

    fn terminate(&mut self, cause: Termination) {
        tracing::info!(%cause, score = self.score, "session terminated");
        self.state = State::Terminated(cause);
    }
}
