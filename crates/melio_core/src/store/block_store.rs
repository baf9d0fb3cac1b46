//! Ordered block store with partial-update semantics.
//!
//! # Invariants
//! - `create` never inserts a block with empty or whitespace-only text.
//! - `update` and `remove` are no-ops for absent IDs.
//! - `replace_pair` removes both sources before the replacement becomes
//!   visible; there is no state in which all three coexist.

use crate::model::block::{
    normalize_block_text, Block, BlockId, BlockValidationError, Position,
};
use crate::model::canvas::Canvas;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Partial mutation applied by [`BlockStore::update`].
///
/// `None` fields are left untouched. Setting `text` recomputes `expanded`
/// before an explicit `expanded` value is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockPatch {
    pub text: Option<String>,
    pub position: Option<Position>,
    pub dragging: Option<bool>,
    pub generating: Option<bool>,
    pub expanded: Option<bool>,
    pub just_created: Option<bool>,
}

impl BlockPatch {
    fn apply_to(self, block: &mut Block) {
        if let Some(text) = self.text {
            block.set_text(text);
        }
        if let Some(position) = self.position {
            block.position = position;
        }
        if let Some(dragging) = self.dragging {
            block.dragging = dragging;
        }
        if let Some(generating) = self.generating {
            block.generating = generating;
        }
        if let Some(expanded) = self.expanded {
            block.expanded = expanded;
        }
        if let Some(just_created) = self.just_created {
            block.just_created = just_created;
        }
    }
}

/// Authoritative ordered collection of canvas blocks.
pub struct BlockStore {
    blocks: Vec<Block>,
    rng: StdRng,
}

impl Default for BlockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockStore {
    /// Creates an empty store with an entropy-seeded placement RNG.
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates an empty store whose random placements are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            blocks: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Validates and inserts a new non-generating block.
    ///
    /// Text is trimmed before storage. Without a position the block is placed
    /// randomly inside `canvas`.
    ///
    /// # Errors
    /// - `BlockValidationError::EmptyText` for empty/whitespace-only input;
    ///   the store is left unchanged.
    pub fn create(
        &mut self,
        text: &str,
        position: Option<Position>,
        canvas: &Canvas,
    ) -> Result<BlockId, BlockValidationError> {
        let text = normalize_block_text(text)?;
        let position = position.unwrap_or_else(|| canvas.random_position(&mut self.rng));
        let block = Block::new(text, position);
        Ok(self.insert(block))
    }

    /// Appends an already-built block at the end of iteration order.
    pub fn insert(&mut self, block: Block) -> BlockId {
        let id = block.id;
        self.blocks.push(block);
        id
    }

    /// Applies a partial mutation. Returns `false` when `id` is absent.
    pub fn update(&mut self, id: BlockId, patch: BlockPatch) -> bool {
        match self.find_mut(id) {
            Some(block) => {
                patch.apply_to(block);
                true
            }
            None => {
                debug!("event=block_update module=store status=skip reason=not_found block_id={id}");
                false
            }
        }
    }

    /// Removes one block permanently.
    pub fn remove(&mut self, id: BlockId) -> Option<Block> {
        let index = self.blocks.iter().position(|block| block.id == id)?;
        Some(self.blocks.remove(index))
    }

    /// Removes both `first` and `second`, then appends `replacement`.
    ///
    /// Returns the removed source blocks, or `None` without touching the
    /// store when either source is missing.
    pub fn replace_pair(
        &mut self,
        first: BlockId,
        second: BlockId,
        replacement: Block,
    ) -> Option<(Block, Block)> {
        if first == second || self.find(first).is_none() || self.find(second).is_none() {
            return None;
        }
        let first_block = self.remove(first)?;
        let second_block = self.remove(second)?;
        self.blocks.push(replacement);
        Some((first_block, second_block))
    }

    /// Removes every block. Returns how many were removed.
    pub fn remove_all(&mut self) -> usize {
        let removed = self.blocks.len();
        self.blocks.clear();
        removed
    }

    pub fn find(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    fn find_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.id == id)
    }

    /// Iterates blocks in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Returns a snapshot slice in store order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Clears the `dragging` flag on every block.
    pub fn clear_dragging(&mut self) {
        for block in self.blocks.iter_mut().filter(|block| block.dragging) {
            block.dragging = false;
        }
    }

    /// Number of blocks currently flagged as dragging.
    pub fn dragging_count(&self) -> usize {
        self.blocks.iter().filter(|block| block.dragging).count()
    }
}
