use color_eyre::eyre::Result;
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    text::Text,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::{
    assets::{Assets, Grid, Sprite, SpriteSheet},
    components::multiline::MultiLine,
    config::GameConfig,
    game::{Layer, Position, Surface},
};

const MIN_COLS: u16 = 16;
const MIN_ROWS: u16 = 12;

/// Draws presented layers into the terminal, scaled to fit.
pub struct Playfield {
    assets: Assets,
    game: GameConfig,
    sheet: Option<SpriteSheet>,
}

impl Playfield {
    pub fn new(assets: Assets, game: GameConfig) -> Self {
        Playfield { assets, game, sheet: None }
    }

    /// Largest grid keeping the playfield aspect, assuming cells twice as tall as wide.
    pub fn fit(&self, area: Rect) -> Grid {
        let avail_cols = area.width.saturating_sub(2);
        let avail_rows = area.height.saturating_sub(2);
        let aspect = self.game.height / (2.0 * self.game.width);

        let cols = avail_cols.min((avail_rows as f32 / aspect) as u16);
        let rows = avail_rows.min((cols as f32 * aspect).round() as u16);
        Grid::new(cols, rows, &self.game)
    }

    fn sheet(&mut self, grid: Grid) -> &SpriteSheet {
        if self.sheet.as_ref().is_some_and(|sheet| sheet.grid != grid) {
            self.sheet = None;
        }
        self.sheet.get_or_insert_with(|| {
            tracing::debug!(cols = grid.cols, rows = grid.rows, "scaling sprites");
            self.assets.scaled(grid, &self.game)
        })
    }

    pub fn draw(&mut self, f: &mut Frame<'_>, commands: &[(Layer, Position)]) {
        let area = f.area();
        let grid = self.fit(area);
        if grid.cols < MIN_COLS || grid.rows < MIN_ROWS {
            render_resize_message(f, area);
            return;
        }

        let [outer] = Layout::horizontal([Constraint::Length(grid.cols + 2)]).flex(Flex::Center).areas(area);
        let [outer] = Layout::vertical([Constraint::Length(grid.rows + 2)]).flex(Flex::Center).areas(outer);
        let border = Block::default().borders(Borders::ALL).border_type(BorderType::Rounded);
        let canvas = border.inner(outer);
        f.render_widget(Clear, area);
        f.render_widget(border, outer);

        let background_style = self.assets.style("background");
        let bird_style = self.assets.style("bird");
        let pipe_style = self.assets.style("pipe");
        let hitbox_style = self.assets.style("hitbox");
        let score_style = self.assets.style("score");
        let sheet = self.sheet(grid);

        for (layer, position) in commands {
            let cell = grid.cell(*position);
            match layer {
                Layer::Background => {
                    f.render_widget(MultiLine::new(sheet.background.rows().to_vec()).style(background_style), canvas);
                },
                Layer::Bird => draw_sprite(f, canvas, cell, &sheet.bird, bird_style, true),
                Layer::PipeTop => draw_sprite(f, canvas, cell, &sheet.pipe_top, pipe_style, false),
                Layer::PipeBottom => draw_sprite(f, canvas, cell, &sheet.pipe_bottom, pipe_style, false),
                Layer::Hitbox { width, height } => {
                    let (cols, rows) = grid.span(*width, *height);
                    if let Some(area) = clip(canvas, cell, (cols, rows)) {
                        f.render_widget(Block::bordered().border_style(hitbox_style), area);
                    }
                },
                Layer::Score(score) => {
                    let [row] = Layout::vertical([Constraint::Length(1)]).areas(canvas);
                    let text = Paragraph::new(score.to_string()).style(score_style).alignment(Alignment::Center);
                    f.render_widget(text, row);
                },
            }
        }
    }
}

/// Visible part of a `size` block at `cell` (grid coordinates) inside `canvas`.
fn clip(canvas: Rect, cell: (i32, i32), size: (u16, u16)) -> Option<Rect> {
    let left = cell.0.max(0);
    let top = cell.1.max(0);
    let right = (cell.0 + size.0 as i32).min(canvas.width as i32);
    let bottom = (cell.1 + size.1 as i32).min(canvas.height as i32);
    if left >= right || top >= bottom {
        return None;
    }
    Some(Rect {
        x: canvas.x + left as u16,
        y: canvas.y + top as u16,
        width: (right - left) as u16,
        height: (bottom - top) as u16,
    })
}

fn draw_sprite(f: &mut Frame<'_>, canvas: Rect, cell: (i32, i32), sprite: &Sprite, style: Style, transparent: bool) {
    let size = (sprite.width() as u16, sprite.height() as u16);
    let Some(area) = clip(canvas, cell, size) else {
        return;
    };

    // Drop the rows and columns hanging off the top/left edge.
    let skip_cols = (area.x - canvas.x) as i32 - cell.0;
    let skip_rows = (area.y - canvas.y) as i32 - cell.1;
    let lines: Vec<String> = sprite
        .rows()
        .iter()
        .skip(skip_rows as usize)
        .take(area.height as usize)
        .map(|row| row.chars().skip(skip_cols as usize).take(area.width as usize).collect())
        .collect();

    f.render_widget(MultiLine::new(lines).style(style).ignore_whitespace(transparent), area);
}

fn render_resize_message(f: &mut Frame<'_>, area: Rect) {
    let message = Paragraph::new(Text::styled("Please enlarge the terminal", Style::default().fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(Clear, area);
    f.render_widget(message, area);
}

/// A frame in progress: collects layers, draws them all on `refresh`.
pub struct TerminalSurface<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    playfield: &'a mut Playfield,
    commands: Vec<(Layer, Position)>,
}

impl<'a, B: Backend> TerminalSurface<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>, playfield: &'a mut Playfield) -> Self {
        TerminalSurface { terminal, playfield, commands: Vec::new() }
    }
}

impl<B: Backend> Surface for TerminalSurface<'_, B> {
    fn present(&mut self, layer: Layer, position: Position) {
        self.commands.push((layer, position));
    }

    fn refresh(&mut self) -> Result<()> {
        let playfield = &mut *self.playfield;
        let commands = std::mem::take(&mut self.commands);
        self.terminal.draw(|f| playfield.draw(f, &commands))?;
        Ok(())
    }
}
