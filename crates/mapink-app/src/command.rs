//! Line commands of the headless editor.

use crate::config::AppError;
use crate::editor::EditorEvent;
use kurbo::Point;

pub const HELP: &str = "\
commands:
  tool <id>        select a tool (tree, building, water, road, river)
  move <x> <y>     move the cursor (updates snapping)
  click <x> <y>    click on the map
  dbl <x> <y>      double click (finishes a path)
  press <x> <y>    raw press; two quick nearby presses form a double click
  undo             undo the last change
  cancel           discard the path being drawn
  state            print the current scene as JSON
  help             show this help
  quit             exit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(EditorEvent),
    Press(Point),
    State,
    Help,
    Quit,
}

impl Command {
    /// Parse a line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, AppError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        if verb.starts_with('#') {
            return Ok(None);
        }
        let rest: Vec<&str> = words.collect();

        let command = match (verb, rest.as_slice()) {
            ("tool", [id]) => Command::Event(EditorEvent::SelectTool((*id).into())),
            ("move", [x, y]) => Command::Event(EditorEvent::CursorMove(point(x, y)?)),
            ("click", [x, y]) => Command::Event(EditorEvent::Click(point(x, y)?)),
            ("dbl", [x, y]) => Command::Event(EditorEvent::DoubleClick(point(x, y)?)),
            ("press", [x, y]) => Command::Press(point(x, y)?),
            ("undo", []) => Command::Event(EditorEvent::Undo),
            ("cancel", []) => Command::Event(EditorEvent::Cancel),
            ("state", []) => Command::State,
            ("help", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(AppError::InvalidCommand(line.trim().to_string())),
        };
        Ok(Some(command))
    }
}

fn point(x: &str, y: &str) -> Result<Point, AppError> {
    let coord = |s: &str| {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| AppError::InvalidCommand(format!("not a coordinate: {s}")))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}
