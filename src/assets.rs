use std::{fs, path::Path};

use color_eyre::eyre::{Result, WrapErr};
use ratatui::style::Style;

use crate::{
    config::{Config, GameConfig, Styles},
    game::Position,
};

const BACKGROUND: &str = include_str!("../assets/background.txt");
const BIRD: &str = include_str!("../assets/bird.txt");
const PIPE: &str = include_str!("../assets/pipe.txt");

/// Text sprite, one string per terminal row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sprite {
    rows: Vec<String>,
}

impl Sprite {
    pub fn parse(text: &str) -> Self {
        let mut rows: Vec<String> = text.lines().map(|line| line.to_string()).collect();
        while rows.last().is_some_and(|row| row.trim().is_empty()) {
            rows.pop();
        }
        Sprite { rows }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(|row| row.chars().count()).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Nearest-neighbour resize, sampling the centre of each target cell.
    pub fn scale(&self, cols: u16, rows: u16) -> Sprite {
        let (cols, rows) = (cols as usize, rows as usize);
        let source: Vec<Vec<char>> = self.rows.iter().map(|row| row.chars().collect()).collect();
        let (src_w, src_h) = (self.width(), self.height());
        if src_w == 0 || src_h == 0 {
            return Sprite { rows: vec![" ".repeat(cols); rows] };
        }

        let rows = (0..rows)
            .map(|r| {
                let line = &source[(2 * r + 1) * src_h / (2 * rows)];
                (0..cols).map(|c| line.get((2 * c + 1) * src_w / (2 * cols)).copied().unwrap_or(' ')).collect()
            })
            .collect();
        Sprite { rows }
    }

    pub fn flip_vertical(&self) -> Sprite {
        Sprite { rows: self.rows.iter().rev().cloned().collect() }
    }
}

/// Maps playfield pixels onto a grid of terminal cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub cols: u16,
    pub rows: u16,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Grid {
    pub fn new(cols: u16, rows: u16, game: &GameConfig) -> Self {
        Grid { cols, rows, cell_width: game.width / cols.max(1) as f32, cell_height: game.height / rows.max(1) as f32 }
    }

    /// Cell containing the pixel; may lie outside the grid.
    pub fn cell(&self, position: Position) -> (i32, i32) {
        ((position.x / self.cell_width).floor() as i32, (position.y / self.cell_height).floor() as i32)
    }

    pub fn span(&self, width: f32, height: f32) -> (u16, u16) {
        let cols = (width / self.cell_width).round().max(0.0) as u16;
        let rows = (height / self.cell_height).round().max(0.0) as u16;
        (cols, rows)
    }
}

/// Sprites already scaled to one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    pub grid: Grid,
    pub background: Sprite,
    pub bird: Sprite,
    pub pipe_top: Sprite,
    pub pipe_bottom: Sprite,
}

#[derive(Debug, Clone)]
pub struct Assets {
    background: Sprite,
    bird: Sprite,
    pipe: Sprite,
    styles: Styles,
}

impl Assets {
    pub fn new(background: Sprite, bird: Sprite, pipe: Sprite, styles: Styles) -> Self {
        Assets { background, bird, pipe, styles }
    }

    /// Built-in sprites, or the ones in `game.asset_dir` when configured.
    pub fn load(config: &Config) -> Result<Self> {
        let styles = config.styles.clone();
        let assets = match &config.game.asset_dir {
            Some(dir) => Assets::new(
                read_sprite(dir, "background.txt")?,
                read_sprite(dir, "bird.txt")?,
                read_sprite(dir, "pipe.txt")?,
                styles,
            ),
            None => Assets::new(Sprite::parse(BACKGROUND), Sprite::parse(BIRD), Sprite::parse(PIPE), styles),
        };
        tracing::debug!(
            bird = ?(assets.bird.width(), assets.bird.height()),
            pipe = ?(assets.pipe.width(), assets.pipe.height()),
            "assets loaded"
        );
        Ok(assets)
    }

    pub fn style(&self, name: &str) -> Style {
        self.styles.get_or_default(name)
    }

    pub fn scaled(&self, grid: Grid, game: &GameConfig) -> SpriteSheet {
        let (bird_cols, bird_rows) = grid.span(game.bird_width, game.bird_height);
        let (pipe_cols, pipe_rows) = grid.span(game.pipe_width, game.height);
        let pipe = self.pipe.scale(pipe_cols.max(1), pipe_rows.max(1));

        SpriteSheet {
            grid,
            background: self.background.scale(grid.cols, grid.rows),
            bird: self.bird.scale(bird_cols.max(1), bird_rows.max(1)),
            pipe_top: pipe.flip_vertical(),
            pipe_bottom: pipe,
        }
    }
}

fn read_sprite(dir: &Path, name: &str) -> Result<Sprite> {
    let path = dir.join(name);
    let text = fs::read_to_string(&path).wrap_err_with(|| format!("failed to load asset {}", path.display()))?;
    Ok(Sprite::parse(&text))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_trims_trailing_blank_rows() {
        let sprite = Sprite::parse("ab\ncde\n\n  \n");
        assert_eq!(sprite.height(), 2);
        assert_eq!(sprite.width(), 3);
    }

    #[test]
    fn test_scale_up() {
        let sprite = Sprite::parse("ab\ncd");
        insta::assert_snapshot!(sprite.scale(4, 2).rows().join("\n"), @r"
        aabb
        ccdd
        ");
    }

    #[test]
    fn test_scale_down_samples_centre() {
        let sprite = Sprite::parse("abcd\nefgh\nijkl");
        assert_eq!(sprite.scale(2, 1).rows(), &["fh".to_string()]);
    }

    #[test]
    fn test_scale_pads_ragged_rows() {
        let sprite = Sprite::parse("abcd\ne");
        assert_eq!(sprite.scale(4, 2).rows(), &["abcd".to_string(), "e   ".to_string()]);
    }

    #[test]
    fn test_scale_empty_sprite() {
        let sprite = Sprite::default();
        assert_eq!(sprite.scale(3, 2).rows(), &["   ".to_string(), "   ".to_string()]);
    }

    #[test]
    fn test_flip_vertical() {
        let sprite = Sprite::parse("top\nmid\nbot");
        assert_eq!(sprite.flip_vertical().rows(), &["bot".to_string(), "mid".to_string(), "top".to_string()]);
    }

    #[test]
    fn test_grid_mapping() {
        let grid = Grid::new(40, 30, &GameConfig::default());
        assert_eq!((grid.cell_width, grid.cell_height), (10.0, 20.0));
        assert_eq!(grid.cell(Position::new(50.0, 300.0)), (5, 15));
        assert_eq!(grid.cell(Position::new(-25.0, -1.0)), (-3, -1));
        assert_eq!(grid.span(40.0, 30.0), (4, 2));
    }

    #[test]
    fn test_builtin_assets() -> Result<()> {
        let assets = Assets::load(&Config::default())?;
        let sheet = assets.scaled(Grid::new(40, 30, &GameConfig::default()), &GameConfig::default());
        assert_eq!(sheet.background.height(), 30);
        assert_eq!(sheet.background.width(), 40);
        assert_eq!((sheet.bird.width(), sheet.bird.height()), (4, 2));
        assert_eq!((sheet.pipe_bottom.width(), sheet.pipe_bottom.height()), (6, 30));
        assert_eq!(sheet.pipe_top, sheet.pipe_bottom.flip_vertical());
        assert!(sheet.pipe_bottom.rows()[0].starts_with('#'));
        Ok(())
    }

    #[test]
    fn test_missing_asset_dir_is_an_error() {
        let mut config = Config::default();
        config.game.asset_dir = Some(std::env::temp_dir().join("flappy-rs-no-such-assets"));
        assert!(Assets::load(&config).is_err());
    }
}
