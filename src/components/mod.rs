pub mod multiline;
pub mod playfield;
