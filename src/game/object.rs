use crate::game::pipe::Pipe;

/// Axis-aligned rectangle in playfield pixels, `y` growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Hitbox { x, y, width, height }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Overlap on both axes. Shared edges do not count.
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        interval_sec(self.left(), self.right(), other.left(), other.right())
            && interval_sec(self.top(), self.bottom(), other.top(), other.bottom())
    }
}

pub trait Object {
    fn hitbox(&self) -> Hitbox;

    fn collides_with<T: Object>(&self, other: &T) -> bool {
        self.hitbox().overlaps(&other.hitbox())
    }
}

impl Object for Hitbox {
    fn hitbox(&self) -> Hitbox {
        *self
    }
}

/// True when `actor` overlaps the solid region above or below the pipe's gap.
pub fn collide(actor: &Hitbox, pipe: &Pipe) -> bool {
    let (top, bottom) = pipe.hitboxes();
    actor.collides_with(&top) || actor.collides_with(&bottom)
}

// Open intervals; an empty or inverted interval never intersects.
fn interval_sec(l1: f32, r1: f32, l2: f32, r2: f32) -> bool {
    l1 < r1 && l2 < r2 && l1 < r2 && l2 < r1
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_overlap() {
        let a = Hitbox::new(0.0, 0.0, 10.0, 10.0);
        let b = Hitbox::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_separate_on_one_axis() {
        let a = Hitbox::new(0.0, 0.0, 10.0, 10.0);
        let b = Hitbox::new(5.0, 20.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Hitbox::new(0.0, 0.0, 10.0, 10.0);
        let right = Hitbox::new(10.0, 0.0, 10.0, 10.0);
        let below = Hitbox::new(0.0, 10.0, 10.0, 10.0);
        let corner = Hitbox::new(10.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
        assert!(!a.overlaps(&corner));
        assert!(!right.overlaps(&a));
    }

    #[test]
    fn test_contained() {
        let outer = Hitbox::new(0.0, 0.0, 100.0, 100.0);
        let inner = Hitbox::new(40.0, 40.0, 1.0, 1.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_empty_box_never_collides() {
        let a = Hitbox::new(0.0, 0.0, 10.0, 10.0);
        let flat = Hitbox::new(2.0, 2.0, 5.0, 0.0);
        let inverted = Hitbox::new(2.0, 2.0, 5.0, -4.0);
        assert!(!a.overlaps(&flat));
        assert!(!a.overlaps(&inverted));
    }

    #[test]
    fn test_collides_with_is_overlaps() {
        let a = Hitbox::new(0.0, 0.0, 10.0, 10.0);
        let b = Hitbox::new(9.5, 9.5, 1.0, 1.0);
        assert_eq!(a.collides_with(&b), a.overlaps(&b));
        assert!(a.collides_with(&b));
    }

    fn pipe() -> Pipe {
        // gap spans y in [200, 350], solid from x 100 to 160
        Pipe::new(100.0, 200.0, 150.0, 60.0, 600.0)
    }

    #[test]
    fn test_collide_top_region() {
        let actor = Hitbox::new(120.0, 180.0, 40.0, 30.0);
        assert!(collide(&actor, &pipe()));
    }

    #[test]
    fn test_collide_bottom_region() {
        let actor = Hitbox::new(120.0, 340.0, 40.0, 30.0);
        assert!(collide(&actor, &pipe()));
    }

    #[test]
    fn test_no_collision_inside_gap() {
        let actor = Hitbox::new(120.0, 250.0, 40.0, 30.0);
        assert!(!collide(&actor, &pipe()));
    }

    #[test]
    fn test_no_collision_when_gap_edges_touch() {
        // top edge on the gap top, bottom edge on the gap bottom
        let actor = Hitbox::new(120.0, 200.0, 40.0, 150.0);
        assert!(!collide(&actor, &pipe()));
    }

    #[test]
    fn test_no_collision_when_pipe_side_touches() {
        let actor = Hitbox::new(60.0, 100.0, 40.0, 30.0);
        assert!(!collide(&actor, &pipe()));
        let actor = Hitbox::new(160.0, 100.0, 40.0, 30.0);
        assert!(!collide(&actor, &pipe()));
    }

    #[test]
    fn test_collide_matches_either_region() {
        let p = pipe();
        let (top, bottom) = p.hitboxes();
        for y in [-50.0, 150.0, 185.0, 250.0, 330.0, 400.0, 700.0] {
            let actor = Hitbox::new(110.0, y, 40.0, 30.0);
            assert_eq!(collide(&actor, &p), actor.overlaps(&top) || actor.overlaps(&bottom));
        }
    }
}
