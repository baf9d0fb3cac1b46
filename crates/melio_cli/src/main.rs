//! Canvas console entry point.
//!
//! # Responsibility
//! - Wire config, logging, synthesizer, gateway and session into a `Driver`.
//! - Translate console commands into controller events.
//!
//! # Invariants
//! - The driver settles after every command before the canvas is printed.

mod command;

use clap::Parser;
use command::{parse_command, Command, HELP};
use log::{info, warn};
use melio_core::{
    init_logging_from_config, AppState, Block, BlockId, BlockStore, Canvas, ConceptGateway,
    ConfiguredSession, Driver, Event, GeminiSynthesizer, InMemoryConceptGateway, MelioConfig,
    Position, SqliteConceptGateway,
};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const PREVIEW_CHARS: usize = 60;

#[derive(Debug, Parser)]
#[command(name = "melio", version, about = "Merge text blocks into new concepts")]
struct Args {
    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for random block placement.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = MelioConfig::load(args.config.as_deref())?;

    match init_logging_from_config(&config.logging) {
        Ok(true) => {}
        Ok(false) => eprintln!("file logging disabled (no logging.dir configured)"),
        Err(err) => eprintln!("logging disabled: {err}"),
    }

    let mut driver = build_driver(&config, args.seed)?;
    driver.begin_session(Arc::new(ConfiguredSession::new(
        config.session.user_id.clone(),
    )));
    driver.settle().await;
    print_canvas(&driver);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(command::ParseError::Empty) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Concepts => print_concepts(&driver),
            Command::Show => print_canvas(&driver),
            other => {
                run(&mut driver, other);
                driver.settle().await;
                print_canvas(&driver);
            }
        }
    }

    info!("event=app_exit module=cli status=ok");
    Ok(())
}

fn build_driver(config: &MelioConfig, seed: Option<u64>) -> Result<Driver, Box<dyn Error>> {
    let store = match seed {
        Some(seed) => BlockStore::with_seed(seed),
        None => BlockStore::new(),
    };
    let state = AppState::with_store(store, config.canvas.canvas());
    let synthesizer = Arc::new(GeminiSynthesizer::new(&config.synthesis)?);

    let gateway: Arc<dyn ConceptGateway> = match &config.storage.db_path {
        Some(path) => Arc::new(SqliteConceptGateway::open(path, config.storage.app_id.as_str())?),
        None => {
            warn!("event=gateway_open module=cli status=fallback backend=memory");
            Arc::new(InMemoryConceptGateway::new())
        }
    };

    Ok(Driver::new(state, synthesizer, gateway))
}

fn run(driver: &mut Driver, command: Command) {
    match command {
        Command::Add(text) => driver.dispatch(Event::AddBlock {
            text,
            position: None,
        }),
        Command::AddAt { x, y, text } => driver.dispatch(Event::AddBlock {
            text,
            position: Some(Position::new(x, y)),
        }),
        Command::Down { block, x, y } => {
            if let Some(id) = resolve(driver, &block) {
                driver.dispatch(Event::PointerDown {
                    block: id,
                    pointer: Position::new(x, y),
                });
            }
        }
        Command::Move { x, y } => driver.dispatch(Event::PointerMove {
            pointer: Position::new(x, y),
        }),
        Command::Up => driver.dispatch(Event::PointerUp),
        Command::Drag { block, x, y } => {
            let Some(id) = resolve(driver, &block) else {
                return;
            };
            let Some(origin) = driver.state().store().find(id).map(|block| block.position)
            else {
                return;
            };
            driver.dispatch(Event::PointerDown {
                block: id,
                pointer: origin,
            });
            driver.dispatch(Event::PointerMove {
                pointer: Position::new(x, y),
            });
            driver.dispatch(Event::PointerUp);
        }
        Command::DeleteMode => driver.dispatch(Event::ToggleDeleteMode),
        Command::Delete(block) => {
            let Some(id) = resolve(driver, &block) else {
                return;
            };
            let was_active = driver.state().is_delete_mode();
            if !was_active {
                driver.dispatch(Event::ToggleDeleteMode);
            }
            driver.dispatch(Event::PointerDown {
                block: id,
                pointer: Position::default(),
            });
            if !was_active {
                driver.dispatch(Event::ToggleDeleteMode);
            }
        }
        Command::Expand(block) => {
            if let Some(id) = resolve(driver, &block) {
                driver.dispatch(Event::ToggleExpanded(id));
            }
        }
        Command::Theme(appearance) => driver.dispatch(Event::SetAppearance(appearance)),
        Command::Dismiss => driver.dispatch(Event::DismissError),
        Command::Clear => driver.dispatch(Event::ClearAll),
        Command::Resize { width, height } => {
            driver.dispatch(Event::CanvasResized(Canvas::new(width, height)))
        }
        Command::Show | Command::Concepts | Command::Help | Command::Quit => {}
    }
}

/// Finds the single block whose id starts with `prefix`.
fn resolve(driver: &Driver, prefix: &str) -> Option<BlockId> {
    let matches: Vec<BlockId> = driver
        .state()
        .store()
        .iter()
        .map(|block| block.id)
        .filter(|id| id.to_string().starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [id] => Some(*id),
        [] => {
            println!("no block matches `{prefix}`");
            None
        }
        _ => {
            println!("`{prefix}` matches {} blocks; use a longer prefix", matches.len());
            None
        }
    }
}

fn print_canvas(driver: &Driver) {
    let state = driver.state();
    let canvas = state.canvas();
    let appearance = state.appearance();
    println!(
        "canvas {}x{} | theme {}/{} | delete mode {} | {} block(s)",
        canvas.width,
        canvas.height,
        appearance.background.as_str(),
        appearance.block_color.as_str(),
        if state.is_delete_mode() { "on" } else { "off" },
        state.store().len()
    );
    for block in state.store().iter() {
        println!("  {}", describe(block));
    }
    if let Some(message) = state.error() {
        println!("! {message}");
    }
}

fn describe(block: &Block) -> String {
    let id = block.id.to_string();
    let mut flags = Vec::new();
    if block.generating {
        flags.push("generating");
    }
    if block.dragging {
        flags.push("dragging");
    }
    if block.just_created {
        flags.push("new");
    }
    let text = if block.expanded {
        block.text.clone()
    } else {
        preview(&block.text)
    };
    format!(
        "{} ({:.0}, {:.0}){} {}",
        &id[..8],
        block.position.x,
        block.position.y,
        if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(","))
        },
        text
    )
}

/// First `PREVIEW_CHARS` characters, with an ellipsis only when cut.
fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

fn print_concepts(driver: &Driver) {
    let state = driver.state();
    match state.session() {
        Some(session) => println!("session {session}"),
        None => println!("no session"),
    }
    for concept in state.concepts() {
        println!(
            "  {} {}",
            concept.created_at.format("%Y-%m-%d %H:%M:%S"),
            concept.text
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_short_text_has_no_ellipsis() {
        let mut block = Block::new("Error: connection failed!", Position::new(12.0, 34.0));
        block.expanded = false;

        let line = describe(&block);
        assert!(line.ends_with(" Error: connection failed!"));
        assert!(line.contains("(12, 34)"));
    }

    #[test]
    fn collapsed_long_text_is_cut_with_ellipsis() {
        let text = "x".repeat(PREVIEW_CHARS + 1);
        let mut block = Block::new(text, Position::default());
        block.expanded = false;

        let expected = format!(" {}...", "x".repeat(PREVIEW_CHARS));
        assert!(describe(&block).ends_with(&expected));
    }

    #[test]
    fn preview_keeps_text_at_limit_intact() {
        let text = "y".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&text), text);
    }
}
