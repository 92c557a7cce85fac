use rand::Rng;

use crate::{config::GameConfig, game::object::Hitbox};

/// A pipe pair: solid above `offset`, solid below `offset + gap`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    x: f32,
    offset: f32,
    gap: f32,
    width: f32,
    field_height: f32,
}

impl Pipe {
    pub fn new(x: f32, offset: f32, gap: f32, width: f32, field_height: f32) -> Self {
        Pipe { x, offset, gap, width, field_height }
    }

    pub fn move_left(&mut self, speed: f32) {
        self.x -= speed;
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// The trailing edge has left the playfield.
    pub fn passed(&self) -> bool {
        self.right() < 0.0
    }

    pub fn top_hitbox(&self) -> Hitbox {
        let height = self.field_height - self.gap;
        Hitbox::new(self.x, self.offset - height, self.width, height)
    }

    pub fn bottom_hitbox(&self) -> Hitbox {
        let y = self.offset + self.gap;
        Hitbox::new(self.x, y, self.width, self.field_height - y)
    }

    pub fn hitboxes(&self) -> (Hitbox, Hitbox) {
        (self.top_hitbox(), self.bottom_hitbox())
    }
}

/// Draws gap offsets and builds pipes from the static game settings.
#[derive(Debug)]
pub struct PipeGenerator<R: Rng> {
    rng: R,
    offset_min: f32,
    offset_max: f32,
    min_separation: f32,
    max_attempts: u32,
    gap: f32,
    width: f32,
    field_height: f32,
}

impl<R: Rng> PipeGenerator<R> {
    pub fn new(config: &GameConfig, rng: R) -> Self {
        PipeGenerator {
            rng,
            offset_min: config.offset_min,
            offset_max: config.offset_max,
            min_separation: config.min_separation,
            max_attempts: config.max_offset_attempts.max(1),
            gap: config.pipe_gap(),
            width: config.pipe_width,
            field_height: config.height,
        }
    }

    pub fn create(&mut self, x: f32, previous_offset: Option<f32>) -> Pipe {
        let offset = self.sample_offset(previous_offset);
        Pipe::new(x, offset, self.gap, self.width, self.field_height)
    }

    fn sample_offset(&mut self, previous: Option<f32>) -> f32 {
        let mut candidate = self.rng.gen_range(self.offset_min..=self.offset_max);
        let Some(previous) = previous else {
            return candidate;
        };

        for _ in 1..self.max_attempts {
            if self.separated(candidate, previous) {
                return candidate;
            }
            candidate = self.rng.gen_range(self.offset_min..=self.offset_max);
        }
        if self.separated(candidate, previous) {
            return candidate;
        }

        tracing::warn!(candidate, previous, attempts = self.max_attempts, "offset retries exhausted");
        self.nearest_valid(candidate, previous)
    }

    fn separated(&self, candidate: f32, previous: f32) -> bool {
        (candidate - previous).abs() > self.min_separation
    }

    // One unit past the separation boundary, on whichever side is closer and still in range.
    fn nearest_valid(&self, candidate: f32, previous: f32) -> f32 {
        let above = previous + self.min_separation + 1.0;
        let below = previous - self.min_separation - 1.0;
        [above, below]
            .into_iter()
            .filter(|offset| (self.offset_min..=self.offset_max).contains(offset))
            .min_by(|a, b| (a - candidate).abs().total_cmp(&(b - candidate).abs()))
            .unwrap_or_else(|| {
                tracing::warn!(previous, "no offset in range satisfies the separation");
                candidate.clamp(self.offset_min, self.offset_max)
            })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{
        rngs::{mock::StepRng, StdRng},
        SeedableRng,
    };

    use super::*;

    fn generator(seed: u64) -> PipeGenerator<StdRng> {
        PipeGenerator::new(&GameConfig::default(), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_hitboxes() {
        let pipe = Pipe::new(100.0, 200.0, 150.0, 60.0, 600.0);
        assert_eq!(pipe.top_hitbox(), Hitbox::new(100.0, -250.0, 60.0, 450.0));
        assert_eq!(pipe.bottom_hitbox(), Hitbox::new(100.0, 350.0, 60.0, 250.0));
        assert_eq!(pipe.top_hitbox().bottom(), pipe.offset());
        assert_eq!(pipe.bottom_hitbox().bottom(), 600.0);
    }

    #[test]
    fn test_move_left() {
        let mut pipe = Pipe::new(400.0, 200.0, 150.0, 60.0, 600.0);
        pipe.move_left(3.0);
        pipe.move_left(3.0);
        assert_eq!(pipe.x(), 394.0);
    }

    #[test]
    fn test_passed() {
        assert!(!Pipe::new(-1.0, 200.0, 150.0, 60.0, 600.0).passed());
        assert!(!Pipe::new(-60.0, 200.0, 150.0, 60.0, 600.0).passed());
        assert!(Pipe::new(-61.0, 200.0, 150.0, 60.0, 600.0).passed());
    }

    #[test]
    fn test_create_in_range() {
        let mut generator = generator(7);
        for _ in 0..200 {
            let pipe = generator.create(400.0, None);
            assert!((120.0..=380.0).contains(&pipe.offset()));
            assert_eq!(pipe.x(), 400.0);
            assert_eq!(pipe.gap(), 150.0);
        }
    }

    #[test]
    fn test_chained_offsets_are_separated() {
        let mut generator = generator(42);
        let mut previous = generator.create(400.0, None).offset();
        for _ in 0..500 {
            let offset = generator.create(400.0, Some(previous)).offset();
            assert!((offset - previous).abs() > 120.0, "{offset} too close to {previous}");
            assert!((120.0..=380.0).contains(&offset));
            previous = offset;
        }
    }

    #[test]
    fn test_fallback_when_retries_exhausted() {
        // A zero rng always draws the bottom of the range.
        let mut generator = PipeGenerator::new(&GameConfig::default(), StepRng::new(0, 0));
        let pipe = generator.create(400.0, Some(120.0));
        assert_eq!(pipe.offset(), 241.0);
        assert!((pipe.offset() - 120.0).abs() > 120.0);
    }

    #[test]
    fn test_fallback_prefers_side_in_range() {
        let generator = generator(1);
        // above would be 381, outside the range
        assert_eq!(generator.nearest_valid(300.0, 260.0), 139.0);
        // both sides fit, the closer one wins
        let config = GameConfig { offset_min: 0.0, offset_max: 1000.0, ..GameConfig::default() };
        let generator = PipeGenerator::new(&config, StepRng::new(0, 0));
        assert_eq!(generator.nearest_valid(480.0, 500.0), 379.0);
        assert_eq!(generator.nearest_valid(520.0, 500.0), 621.0);
    }

    #[test]
    fn test_fallback_keeps_separation_for_any_valid_range() {
        let config = GameConfig { offset_min: 0.0, offset_max: 242.5, min_separation: 120.0, ..GameConfig::default() };
        assert!(config.validate().is_ok());
        let generator = PipeGenerator::new(&config, StepRng::new(0, 0));
        for step in 0..=485 {
            let previous = step as f32 * 0.5;
            let offset = generator.nearest_valid(previous, previous);
            assert!((offset - previous).abs() > 120.0, "{offset} too close to {previous}");
            assert!((0.0..=242.5).contains(&offset));
        }
    }

    #[test]
    fn test_fallback_clamps_when_nothing_fits() {
        let config = GameConfig { offset_min: 200.0, offset_max: 300.0, ..GameConfig::default() };
        let generator = PipeGenerator::new(&config, StepRng::new(0, 0));
        assert_eq!(generator.nearest_valid(350.0, 250.0), 300.0);
    }
}
