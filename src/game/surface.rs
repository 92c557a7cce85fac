use color_eyre::eyre::Result;

/// What is being drawn. Sprites are looked up by the surface; the core never touches them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layer {
    Background,
    Bird,
    PipeTop,
    PipeBottom,
    /// Debug outline of a collision rectangle.
    Hitbox { width: f32, height: f32 },
    Score(u32),
}

/// Top-left corner in playfield pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Position { x, y }
    }
}

pub trait Surface {
    fn present(&mut self, layer: Layer, position: Position);

    /// Finishes the frame.
    fn refresh(&mut self) -> Result<()>;
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub presented: Vec<(Layer, Position)>,
    pub refreshes: usize,
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn present(&mut self, layer: Layer, position: Position) {
        self.presented.push((layer, position));
    }

    fn refresh(&mut self) -> Result<()> {
        self.refreshes += 1;
        Ok(())
    }
}
