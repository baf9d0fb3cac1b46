//! Block domain model.
//!
//! # Responsibility
//! - Define the draggable text unit shown on the canvas.
//! - Derive the display-only `expanded` flag from text length.
//!
//! # Invariants
//! - `id` is assigned at construction and never changes.
//! - A `generating` block is never dragged, deleted or merged into.
//! - `expanded` is recomputed whenever text is replaced through `set_text`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a block on the canvas.
pub type BlockId = Uuid;

/// Approximate block width in canvas units, used for clamping and collision.
pub const BLOCK_WIDTH: f64 = 300.0;
/// Approximate block height in canvas units, used for clamping and collision.
pub const BLOCK_HEIGHT: f64 = 100.0;
/// Texts up to this many characters render expanded by default.
pub const EXPANDED_TEXT_MAX_CHARS: usize = 150;
/// Text shown by a merge placeholder while synthesis is in flight.
pub const PLACEHOLDER_TEXT: &str = "Generating concept...";

/// Canvas coordinates of a block origin (top-left corner).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinate-wise midpoint between two positions.
    pub fn midpoint(self, other: Position) -> Position {
        Position::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Component-wise difference `self - other`.
    pub fn offset_from(self, other: Position) -> Position {
        Position::new(self.x - other.x, self.y - other.y)
    }
}

/// Draggable text unit placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub text: String,
    pub position: Position,
    /// True only while the pointer controls this block.
    pub dragging: bool,
    /// True while a synthesis request targeting this block is in flight.
    pub generating: bool,
    /// Display-only: render the full text instead of a truncated preview.
    pub expanded: bool,
    /// Drives the one-shot entry animation; cleared shortly after creation.
    pub just_created: bool,
}

impl Block {
    /// Creates a regular, non-generating block with a fresh ID.
    ///
    /// The caller is responsible for text validation; see
    /// [`normalize_block_text`].
    pub fn new(text: impl Into<String>, position: Position) -> Self {
        let text = text.into();
        Self {
            id: Uuid::new_v4(),
            expanded: is_expanded_text(&text),
            text,
            position,
            dragging: false,
            generating: false,
            just_created: true,
        }
    }

    /// Creates the generating placeholder that stands in for a merge result.
    pub fn placeholder(position: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: PLACEHOLDER_TEXT.to_string(),
            position,
            dragging: false,
            generating: true,
            expanded: false,
            just_created: true,
        }
    }

    /// Replaces text and recomputes the derived `expanded` flag.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.expanded = is_expanded_text(&self.text);
    }

    /// Whether a pointer-down may start a drag session on this block.
    pub fn is_draggable(&self) -> bool {
        !self.generating
    }
}

/// Returns whether `text` is short enough to render expanded by default.
pub fn is_expanded_text(text: &str) -> bool {
    text.chars().count() <= EXPANDED_TEXT_MAX_CHARS
}

/// Trims user input and rejects empty/whitespace-only text.
pub fn normalize_block_text(text: &str) -> Result<String, BlockValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(BlockValidationError::EmptyText);
    }
    Ok(trimmed.to_string())
}

/// Input validation failure for block creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockValidationError {
    EmptyText,
}

impl Display for BlockValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "block text cannot be empty"),
        }
    }
}

impl Error for BlockValidationError {}
