//! MapInk application shell.
//!
//! The [`Editor`] drives one editing surface; the `mapink` binary exposes it
//! as a line-oriented command loop that writes the rendered map to SVG.

mod command;
mod config;
mod editor;
mod input;
mod shell;

pub use command::{Command, HELP};
pub use config::{AppConfig, AppError};
pub use editor::{BUSY_NOTICE, Editor, EditorEvent, PendingAction};
pub use input::{PointerGesture, PointerTracker};
pub use shell::run_commands;
