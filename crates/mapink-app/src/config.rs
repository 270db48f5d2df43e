//! Application configuration and errors.

use kurbo::Size;
use mapink_core::{SNAP_RADIUS, TransportError};
use mapink_render::RenderError;
use peniko::Color;
use std::path::PathBuf;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Missing value for {0}")]
    MissingValue(String),
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// WebSocket endpoint of the map server.
    pub server_url: String,
    /// Edit against an in-process store instead of the server.
    pub local: bool,
    /// Where the rendered scene is written after every command.
    pub output: PathBuf,
    pub snap_radius: f64,
    pub canvas_size: Size,
    pub background_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:3030/ws".to_string(),
            local: false,
            output: PathBuf::from("map.svg"),
            snap_radius: SNAP_RADIUS,
            canvas_size: Size::new(500.0, 300.0),
            background_color: Color::from_rgba8(250, 250, 250, 255),
        }
    }
}

impl AppConfig {
    /// Apply command-line overrides (without the program name).
    pub fn from_args<I>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--local" => config.local = true,
                "--server" => config.server_url = value_of(&arg, args.next())?,
                "--out" => config.output = PathBuf::from(value_of(&arg, args.next())?),
                "--snap-radius" => {
                    let raw = value_of(&arg, args.next())?;
                    config.snap_radius = raw
                        .parse::<f64>()
                        .ok()
                        .filter(|r| r.is_finite() && *r > 0.0)
                        .ok_or_else(|| AppError::InvalidArgument(format!("--snap-radius {raw}")))?;
                }
                other => return Err(AppError::InvalidArgument(other.to_string())),
            }
        }
        Ok(config)
    }
}

fn value_of(flag: &str, value: Option<String>) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::MissingValue(flag.to_string()))
}
