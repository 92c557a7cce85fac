use crate::game::object::{Hitbox, Object};

#[derive(Debug, Clone)]
pub struct Bird {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    velocity: f32,
}

impl Bird {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Bird { x, y, width, height, velocity: 0.0 }
    }

    /// Replaces the current velocity with the jump impulse.
    pub fn jump(&mut self, strength: f32) {
        self.velocity = strength;
    }

    /// One Euler step: velocity first, then position.
    pub fn update(&mut self, gravity: f32) {
        self.velocity += gravity;
        self.y += self.velocity;
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }
}

impl Object for Bird {
    fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_new_bird_is_at_rest() {
        let bird = Bird::new(50.0, 300.0, 40.0, 30.0);
        assert_eq!(bird.y(), 300.0);
        assert_eq!(bird.velocity(), 0.0);
    }

    #[test]
    fn test_update_applies_velocity_before_position() {
        let mut bird = Bird::new(50.0, 300.0, 40.0, 30.0);
        bird.update(0.5);
        assert_eq!(bird.velocity(), 0.5);
        assert_eq!(bird.y(), 300.5);
        bird.update(0.5);
        assert_eq!(bird.velocity(), 1.0);
        assert_eq!(bird.y(), 301.5);
    }

    #[test]
    fn test_jump_overrides_velocity() {
        let mut bird = Bird::new(50.0, 300.0, 40.0, 30.0);
        for _ in 0..10 {
            bird.update(0.5);
        }
        bird.jump(-8.0);
        assert_eq!(bird.velocity(), -8.0);
        bird.jump(-8.0);
        assert_eq!(bird.velocity(), -8.0);
        bird.update(0.5);
        assert_eq!(bird.velocity(), -7.5);
    }

    #[test]
    fn test_no_clamping() {
        let mut bird = Bird::new(50.0, 0.0, 40.0, 30.0);
        bird.jump(-8.0);
        bird.update(0.0);
        assert_eq!(bird.y(), -8.0);
    }

    #[test]
    fn test_hitbox_follows_position() {
        let mut bird = Bird::new(50.0, 300.0, 40.0, 30.0);
        bird.jump(-20.0);
        bird.update(0.0);
        assert_eq!(bird.hitbox(), Hitbox::new(50.0, 280.0, 40.0, 30.0));
    }
}
