//! Overlap detection between a dragged block and stationary candidates.
//!
//! # Invariants
//! - Rectangles are shrunk to `OVERLAP_RATIO` of the footprint before the
//!   axis-aligned intersection test.
//! - Candidates are scanned in store order and the first overlapping eligible
//!   one wins; there is no nearest-match scoring.
//! - The dragged block itself, any other dragging block and any generating
//!   block are never merge targets.

use crate::model::block::{Block, Position, BLOCK_HEIGHT, BLOCK_WIDTH};
use crate::store::block_store::BlockStore;

/// Share of the footprint used for the overlap test on each axis.
pub const OVERLAP_RATIO: f64 = 0.7;

/// Block footprint used by the collision test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            width: BLOCK_WIDTH,
            height: BLOCK_HEIGHT,
        }
    }
}

/// Returns whether two block origins overlap under the shrunk-footprint rule.
pub fn overlaps(dragged: Position, candidate: Position, footprint: Footprint) -> bool {
    let w = footprint.width * OVERLAP_RATIO;
    let h = footprint.height * OVERLAP_RATIO;
    dragged.x < candidate.x + w
        && dragged.x + w > candidate.x
        && dragged.y < candidate.y + h
        && dragged.y + h > candidate.y
}

/// Returns whether `candidate` may be merged with the block being dragged.
pub fn is_eligible(dragged: &Block, candidate: &Block) -> bool {
    candidate.id != dragged.id && !candidate.dragging && !candidate.generating
}

/// Finds the first eligible block in store order that overlaps `dragged`.
pub fn find_merge_target<'a>(
    store: &'a BlockStore,
    dragged: &Block,
    footprint: Footprint,
) -> Option<&'a Block> {
    store.iter().find(|candidate| {
        is_eligible(dragged, candidate) && overlaps(dragged.position, candidate.position, footprint)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrunk_rectangles_overlap_near_corner() {
        assert!(overlaps(
            Position::new(0.0, 0.0),
            Position::new(200.0, 60.0),
            Footprint::default()
        ));
    }

    #[test]
    fn touching_shrunk_edges_do_not_overlap() {
        // 0 + 210 > 210 is false.
        assert!(!overlaps(
            Position::new(0.0, 0.0),
            Position::new(210.0, 0.0),
            Footprint::default()
        ));
        // 0 + 70 > 70 is false.
        assert!(!overlaps(
            Position::new(0.0, 0.0),
            Position::new(0.0, 70.0),
            Footprint::default()
        ));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = Position::new(120.0, 40.0);
        let b = Position::new(10.0, 5.0);
        let footprint = Footprint::default();
        assert_eq!(overlaps(a, b, footprint), overlaps(b, a, footprint));
    }

    #[test]
    fn first_match_in_store_order_wins() {
        let mut store = BlockStore::with_seed(1);
        let first = store.insert(Block::new("first", Position::new(100.0, 0.0)));
        store.insert(Block::new("second", Position::new(5.0, 5.0)));
        let dragged = Block::new("dragged", Position::new(0.0, 0.0));
        store.insert(dragged.clone());

        let target = find_merge_target(&store, &dragged, Footprint::default()).unwrap();
        assert_eq!(target.id, first);
    }

    #[test]
    fn generating_and_dragging_candidates_are_skipped() {
        let mut store = BlockStore::with_seed(1);
        store.insert(Block::placeholder(Position::new(0.0, 0.0)));
        let mut busy = Block::new("busy", Position::new(10.0, 10.0));
        busy.dragging = true;
        store.insert(busy);
        let dragged = Block::new("dragged", Position::new(0.0, 0.0));
        store.insert(dragged.clone());

        assert!(find_merge_target(&store, &dragged, Footprint::default()).is_none());
    }
}
