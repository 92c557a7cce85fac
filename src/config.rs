use std::{collections::HashMap, path::Path, path::PathBuf};

use color_eyre::eyre::{ensure, Result, WrapErr};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use ratatui::style::{Color, Modifier, Style};
use serde::{
    de::{self, Deserializer},
    Deserialize,
};
use strum::Display;

use crate::action::Action;

const CONFIG: &str = include_str!("../.config/config.yaml");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub styles: Styles,
    #[serde(default)]
    pub game: GameConfig,
}

impl Config {
    pub fn new() -> Result<Self> {
        Self::load(&crate::utils::get_config_dir())
    }

    /// Embedded defaults, overridden by any config file found in `config_dir`.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let data_dir = crate::utils::get_data_dir();
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Yaml))
            .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("_config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let path = config_dir.join(file);
            builder = builder.add_source(config::File::from(path.clone()).format(*format).required(false));
            if path.exists() {
                found_config = true
            }
        }
        if !found_config {
            tracing::debug!(dir = %config_dir.display(), "no user configuration file, using defaults");
        }

        let cfg: Self = builder
            .build()?
            .try_deserialize()
            .wrap_err_with(|| format!("invalid configuration in {}", config_dir.display()))?;
        cfg.game.validate()?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn pipe_gap(&self) -> f32 {
        match self {
            Difficulty::Easy => 200.0,
            Difficulty::Normal => 150.0,
            Difficulty::Hard => 120.0,
        }
    }

    pub fn pipe_spacing(&self) -> f32 {
        match self {
            Difficulty::Easy => 400.0,
            Difficulty::Normal => 350.0,
            Difficulty::Hard => 300.0,
        }
    }

    pub fn pipe_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 2.0,
            Difficulty::Normal => 3.0,
            Difficulty::Hard => 4.0,
        }
    }
}

/// Static game settings, in playfield pixels and ticks.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    pub jump_strength: f32,
    pub difficulty: Difficulty,
    /// Overrides the difficulty preset when set.
    pub pipe_gap: Option<f32>,
    pub pipe_spacing: Option<f32>,
    pub pipe_speed: Option<f32>,
    pub pipe_width: f32,
    pub pipe_count: usize,
    pub bird_x: f32,
    pub bird_width: f32,
    pub bird_height: f32,
    pub offset_min: f32,
    pub offset_max: f32,
    pub min_separation: f32,
    pub max_offset_attempts: u32,
    pub tick_rate: f64,
    pub debug: bool,
    pub asset_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 400.0,
            height: 600.0,
            gravity: 0.5,
            jump_strength: -8.0,
            difficulty: Difficulty::Normal,
            pipe_gap: None,
            pipe_spacing: None,
            pipe_speed: None,
            pipe_width: 60.0,
            pipe_count: 3,
            bird_x: 50.0,
            bird_width: 40.0,
            bird_height: 30.0,
            offset_min: 120.0,
            offset_max: 380.0,
            min_separation: 120.0,
            max_offset_attempts: 100,
            tick_rate: 30.0,
            debug: false,
            asset_dir: None,
        }
    }
}

impl GameConfig {
    pub fn pipe_gap(&self) -> f32 {
        self.pipe_gap.unwrap_or(self.difficulty.pipe_gap())
    }

    pub fn pipe_spacing(&self) -> f32 {
        self.pipe_spacing.unwrap_or(self.difficulty.pipe_spacing())
    }

    pub fn pipe_speed(&self) -> f32 {
        self.pipe_speed.unwrap_or(self.difficulty.pipe_speed())
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.width > 0.0 && self.height > 0.0, "playfield must have a positive size");
        ensure!(self.tick_rate > 0.0, "tick_rate must be positive, got {}", self.tick_rate);
        ensure!(self.pipe_count > 0, "pipe_count must be at least 1");
        ensure!(self.pipe_width > 0.0 && self.pipe_gap() > 0.0, "pipes must have a positive width and gap");
        ensure!(self.bird_width >= 0.0 && self.bird_height >= 0.0, "bird size must not be negative");
        ensure!(self.offset_min <= self.offset_max, "offset_min must not exceed offset_max");
        ensure!(
            self.offset_max - self.offset_min > 2.0 * (self.min_separation + 1.0),
            "offset range {}..={} is too narrow for a separation of {}",
            self.offset_min,
            self.offset_max,
            self.min_separation
        );
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct KeyBindings(pub HashMap<KeyEvent, Action>);

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, String>::deserialize(deserializer)?;

        let bindings = raw
            .into_iter()
            .map(|(key_str, action_str)| {
                let key = parse_key_event(&key_str).map_err(de::Error::custom)?;
                let action: Action = serde_yaml::from_str(&action_str).map_err(de::Error::custom)?;
                Ok((key, action))
            })
            .collect::<Result<HashMap<_, _>, D::Error>>()?;

        Ok(KeyBindings(bindings))
    }
}

impl KeyBindings {
    /// `Space: Jump, q: Quit`, sorted by key.
    pub fn describe(&self) -> String {
        let mut pairs: Vec<String> =
            self.0.iter().map(|(event, action)| format!("{}: {action}", key_event_to_string(event))).collect();
        pairs.sort();
        pairs.join(", ")
    }
}

pub fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
        return Err(format!("Unable to parse `{}`", raw));
    }
    let raw = raw.trim_start_matches('<').trim_end_matches('>');

    let raw_lower = raw.to_ascii_lowercase();
    let (remaining, modifiers) = extract_modifiers(&raw_lower);
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        match current {
            rest if rest.starts_with("ctrl-") => {
                modifiers.insert(KeyModifiers::CONTROL);
                current = &rest[5..];
            },
            rest if rest.starts_with("alt-") => {
                modifiers.insert(KeyModifiers::ALT);
                current = &rest[4..];
            },
            rest if rest.starts_with("shift-") => {
                modifiers.insert(KeyModifiers::SHIFT);
                current = &rest[6..];
            },
            _ => break,
        };
    }

    (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, modifiers: KeyModifiers) -> Result<KeyEvent, String> {
    let c = match raw {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "minus" | "hyphen" => KeyCode::Char('-'),
        f if f.len() > 1 && f.starts_with('f') => match f[1..].parse::<u8>() {
            Ok(n) if (1..=12).contains(&n) => KeyCode::F(n),
            _ => return Err(format!("Unable to parse {raw}")),
        },
        c if c.chars().count() == 1 => {
            let mut c = c.chars().next().unwrap_or_default();
            if modifiers.contains(KeyModifiers::SHIFT) {
                c = c.to_ascii_uppercase();
            }
            KeyCode::Char(c)
        },
        _ => return Err(format!("Unable to parse {raw}")),
    };
    Ok(KeyEvent::new(c, modifiers))
}

pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let code = match key_event.code {
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        _ => String::new(),
    };

    let mut parts = Vec::with_capacity(4);
    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        parts.push("Ctrl".to_string());
    }
    if key_event.modifiers.intersects(KeyModifiers::SHIFT) {
        parts.push("Shift".to_string());
    }
    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        parts.push("Alt".to_string());
    }
    parts.push(code);

    parts.join("-")
}

/// Sprite styles keyed by asset name (`background`, `bird`, `pipe`, `hitbox`, `score`).
#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct Styles(pub HashMap<String, Style>);

impl<'de> Deserialize<'de> for Styles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(Styles(parsed_map.into_iter().map(|(name, style)| (name, parse_style(&style))).collect()))
    }
}

impl Styles {
    pub fn get_or_default(&self, name: &str) -> Style {
        self.0.get(name).copied().unwrap_or_default()
    }
}

/// `"bold yellow on blue"` style strings.
pub fn parse_style(line: &str) -> Style {
    let (foreground, background) = line.split_at(line.to_lowercase().find("on ").unwrap_or(line.len()));
    let (fg_name, fg_modifiers) = process_color_string(foreground);
    let (bg_name, bg_modifiers) = process_color_string(&background.replacen("on ", "", 1));

    let mut style = Style::default();
    if let Some(fg) = parse_color(&fg_name) {
        style = style.fg(fg);
    }
    if let Some(bg) = parse_color(&bg_name) {
        style = style.bg(bg);
    }
    style.add_modifier(fg_modifiers | bg_modifiers)
}

fn process_color_string(color_str: &str) -> (String, Modifier) {
    let mut modifiers = Modifier::empty();
    let mut words = Vec::new();
    for word in color_str.split_whitespace() {
        match word.to_lowercase().as_str() {
            "bold" => modifiers |= Modifier::BOLD,
            "underline" => modifiers |= Modifier::UNDERLINED,
            "inverse" => modifiers |= Modifier::REVERSED,
            other => words.push(other.replace("grey", "gray")),
        }
    }
    (words.join(" "), modifiers)
}

fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(index) = s.strip_prefix("color") {
        return index.parse::<u8>().ok().map(Color::Indexed);
    }
    if let Some(level) = s.strip_prefix("gray").filter(|level| !level.is_empty()) {
        return level.parse::<u8>().ok().filter(|level| *level < 24).map(|level| Color::Indexed(232 + level));
    }
    if let Some(rgb) = s.strip_prefix("rgb") {
        let digits: Vec<u8> = rgb.chars().filter_map(|c| c.to_digit(6)).map(|d| d as u8).collect();
        return match digits[..] {
            [r, g, b] if rgb.len() == 3 => Some(Color::Indexed(16 + r * 36 + g * 6 + b)),
            _ => None,
        };
    }
    let color = match s {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" => Color::Gray,
        "white" => Color::White,
        "bright black" | "dark gray" => Color::DarkGray,
        "bright red" => Color::LightRed,
        "bright green" => Color::LightGreen,
        "bright yellow" => Color::LightYellow,
        "bright blue" => Color::LightBlue,
        "bright magenta" => Color::LightMagenta,
        "bright cyan" => Color::LightCyan,
        _ => return None,
    };
    Some(color)
}
