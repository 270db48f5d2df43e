//! Command loop of the headless editor.

use crate::command::{Command, HELP};
use crate::config::{AppConfig, AppError};
use crate::editor::{Editor, EditorEvent};
use crate::input::{PointerGesture, PointerTracker};
use mapink_core::Transport;
use mapink_render::SvgRenderer;
use std::io::{BufRead, Write};

/// Read commands from `input` until EOF or `quit`, echoing status lines to
/// `output` and rewriting the SVG after every command that touched the map.
///
/// Bad commands are reported and skipped; only I/O and render failures end
/// the loop.
pub async fn run_commands<T, R, W>(
    editor: &mut Editor<T>,
    config: &AppConfig,
    input: R,
    mut output: W,
) -> Result<(), AppError>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    let mut tracker = PointerTracker::new();
    write_svg(editor, config)?;
    writeln!(output, "{}", editor.status())?;

    for line in input.lines() {
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(output, "{e}")?;
                continue;
            }
        };

        let event = match command {
            Command::Event(event) => event,
            Command::Press(at) => match tracker.press(at) {
                PointerGesture::Click(p) => EditorEvent::Click(p),
                PointerGesture::DoubleClick(p) => EditorEvent::DoubleClick(p),
            },
            Command::State => {
                let json = serde_json::to_string_pretty(editor.snapshot())
                    .map_err(|e| AppError::InvalidCommand(e.to_string()))?;
                writeln!(output, "{json}")?;
                continue;
            }
            Command::Help => {
                writeln!(output, "{HELP}")?;
                let tools: Vec<&str> = editor.catalog().iter().map(|t| t.id.as_str()).collect();
                writeln!(output, "tools: {}", tools.join(", "))?;
                continue;
            }
            Command::Quit => break,
        };

        let moved = matches!(event, EditorEvent::CursorMove(_));
        editor.handle(event).await;
        write_svg(editor, config)?;
        if !moved {
            writeln!(output, "{}", editor.status())?;
        }
    }
    Ok(())
}

fn write_svg<T: Transport>(editor: &Editor<T>, config: &AppConfig) -> Result<(), AppError> {
    let mut renderer = SvgRenderer::new();
    editor.render(&mut renderer, config.canvas_size, config.background_color)?;
    std::fs::write(&config.output, renderer.svg())?;
    log::debug!("wrote {}", config.output.display());
    Ok(())
}
