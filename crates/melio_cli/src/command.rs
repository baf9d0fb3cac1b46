//! Console command grammar.
//!
//! # Responsibility
//! - Parse one input line into a `Command`.
//! - Report malformed input without touching canvas state.

use melio_core::{Appearance, BackgroundPreset, BlockColorPreset};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(String),
    AddAt { x: f64, y: f64, text: String },
    Down { block: String, x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Drag { block: String, x: f64, y: f64 },
    DeleteMode,
    Delete(String),
    Expand(String),
    Theme(Appearance),
    Dismiss,
    Clear,
    Resize { width: f64, height: f64 },
    Show,
    Concepts,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    Usage(&'static str),
    Number(String),
    Preset(String),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::Unknown(name) => write!(f, "unknown command `{name}`; try `help`"),
            Self::Usage(usage) => write!(f, "usage: {usage}"),
            Self::Number(raw) => write!(f, "`{raw}` is not a number"),
            Self::Preset(raw) => write!(f, "unknown preset `{raw}`"),
        }
    }
}

impl std::error::Error for ParseError {}

pub const HELP: &str = "\
commands:
  add <text>                   add a block at a random position
  add-at <x> <y> <text>        add a block at a position
  down <id> <x> <y>            press the pointer on a block
  move <x> <y>                 move the pointer
  up                           release the pointer
  drag <id> <x> <y>            drag a block so its origin lands on (x, y)
  delete-mode                  toggle delete mode
  delete <id>                  delete one block
  expand <id>                  toggle full text of a block
  theme <background> <color>   change appearance presets
  dismiss                      clear the error message
  clear                        delete all blocks and saved concepts
  resize <w> <h>               change canvas size
  show                         print the canvas
  concepts                     print saved concepts
  quit                         exit";

pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    match name {
        "" => Err(ParseError::Empty),
        "add" => {
            if rest.is_empty() {
                return Err(ParseError::Usage("add <text>"));
            }
            Ok(Command::Add(rest.to_string()))
        }
        "add-at" => {
            let parsed = rest.split_once(char::is_whitespace).and_then(|(x, tail)| {
                let (y, text) = tail.trim_start().split_once(char::is_whitespace)?;
                Some((x, y, text.trim()))
            });
            match parsed {
                Some((x, y, text)) if !text.is_empty() => Ok(Command::AddAt {
                    x: number(x)?,
                    y: number(y)?,
                    text: text.to_string(),
                }),
                _ => Err(ParseError::Usage("add-at <x> <y> <text>")),
            }
        }
        "down" => match args.as_slice() {
            [block, x, y] => Ok(Command::Down {
                block: block.to_string(),
                x: number(x)?,
                y: number(y)?,
            }),
            _ => Err(ParseError::Usage("down <id> <x> <y>")),
        },
        "move" => match args.as_slice() {
            [x, y] => Ok(Command::Move {
                x: number(x)?,
                y: number(y)?,
            }),
            _ => Err(ParseError::Usage("move <x> <y>")),
        },
        "drag" => match args.as_slice() {
            [block, x, y] => Ok(Command::Drag {
                block: block.to_string(),
                x: number(x)?,
                y: number(y)?,
            }),
            _ => Err(ParseError::Usage("drag <id> <x> <y>")),
        },
        "delete" => match args.as_slice() {
            [block] => Ok(Command::Delete(block.to_string())),
            _ => Err(ParseError::Usage("delete <id>")),
        },
        "expand" => match args.as_slice() {
            [block] => Ok(Command::Expand(block.to_string())),
            _ => Err(ParseError::Usage("expand <id>")),
        },
        "theme" => match args.as_slice() {
            [background, color] => Ok(Command::Theme(Appearance {
                background: BackgroundPreset::parse(background)
                    .ok_or_else(|| ParseError::Preset(background.to_string()))?,
                block_color: BlockColorPreset::parse(color)
                    .ok_or_else(|| ParseError::Preset(color.to_string()))?,
            })),
            _ => Err(ParseError::Usage("theme <background> <block-color>")),
        },
        "resize" => match args.as_slice() {
            [width, height] => Ok(Command::Resize {
                width: number(width)?,
                height: number(height)?,
            }),
            _ => Err(ParseError::Usage("resize <w> <h>")),
        },
        "up" => Ok(Command::Up),
        "delete-mode" => Ok(Command::DeleteMode),
        "dismiss" => Ok(Command::Dismiss),
        "clear" => Ok(Command::Clear),
        "show" => Ok(Command::Show),
        "concepts" => Ok(Command::Concepts),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

fn number(raw: &str) -> Result<f64, ParseError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError::Number(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_inner_whitespace() {
        assert_eq!(
            parse_command("add  Castles in  the sky "),
            Ok(Command::Add("Castles in  the sky".to_string()))
        );
    }

    #[test]
    fn add_at_splits_coordinates_from_text() {
        assert_eq!(
            parse_command("add-at 10 20.5 Sky bridges"),
            Ok(Command::AddAt {
                x: 10.0,
                y: 20.5,
                text: "Sky bridges".to_string(),
            })
        );
        assert_eq!(
            parse_command("add-at 10"),
            Err(ParseError::Usage("add-at <x> <y> <text>"))
        );
    }

    #[test]
    fn coordinates_must_be_finite_numbers() {
        assert_eq!(
            parse_command("move 1 nope"),
            Err(ParseError::Number("nope".to_string()))
        );
        assert_eq!(
            parse_command("move inf 1"),
            Err(ParseError::Number("inf".to_string()))
        );
    }

    #[test]
    fn theme_parses_presets() {
        assert_eq!(
            parse_command("theme graphite pink_red"),
            Ok(Command::Theme(Appearance {
                background: BackgroundPreset::Graphite,
                block_color: BlockColorPreset::PinkRed,
            }))
        );
        assert!(matches!(
            parse_command("theme neon pink_red"),
            Err(ParseError::Preset(_))
        ));
    }

    #[test]
    fn unknown_and_empty_lines_are_errors() {
        assert_eq!(parse_command("   "), Err(ParseError::Empty));
        assert_eq!(
            parse_command("fly"),
            Err(ParseError::Unknown("fly".to_string()))
        );
    }
}
