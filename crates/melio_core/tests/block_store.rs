use melio_core::model::block::PLACEHOLDER_TEXT;
use melio_core::{Block, BlockPatch, BlockStore, BlockValidationError, Canvas, Position};

fn canvas() -> Canvas {
    Canvas::new(1000.0, 600.0)
}

#[test]
fn create_trims_text_and_appends_in_order() {
    let mut store = BlockStore::with_seed(7);
    let first = store
        .create("  first  ", Some(Position::new(1.0, 2.0)), &canvas())
        .unwrap();
    let second = store.create("second", None, &canvas()).unwrap();

    let ids: Vec<_> = store.iter().map(|block| block.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(store.find(first).unwrap().text, "first");
    assert_eq!(store.find(first).unwrap().position, Position::new(1.0, 2.0));
}

#[test]
fn create_rejects_blank_text() {
    let mut store = BlockStore::with_seed(7);
    let err = store.create("   ", None, &canvas()).unwrap_err();
    assert_eq!(err, BlockValidationError::EmptyText);
    assert!(store.is_empty());
}

#[test]
fn seeded_stores_place_blocks_identically() {
    let mut left = BlockStore::with_seed(99);
    let mut right = BlockStore::with_seed(99);
    let a = left.create("a", None, &canvas()).unwrap();
    let b = right.create("a", None, &canvas()).unwrap();
    assert_eq!(
        left.find(a).unwrap().position,
        right.find(b).unwrap().position
    );
}

#[test]
fn expanded_flag_follows_text_length_at_boundary() {
    let mut store = BlockStore::with_seed(1);
    let at_limit = store
        .create(&"a".repeat(150), Some(Position::default()), &canvas())
        .unwrap();
    let over_limit = store
        .create(&"a".repeat(151), Some(Position::default()), &canvas())
        .unwrap();

    assert!(store.find(at_limit).unwrap().expanded);
    assert!(!store.find(over_limit).unwrap().expanded);
}

#[test]
fn update_text_recomputes_expanded_unless_overridden() {
    let mut store = BlockStore::with_seed(1);
    let id = store.insert(Block::placeholder(Position::default()));
    assert!(!store.find(id).unwrap().expanded);

    store.update(
        id,
        BlockPatch {
            text: Some("short".to_string()),
            ..BlockPatch::default()
        },
    );
    assert!(store.find(id).unwrap().expanded);

    store.update(
        id,
        BlockPatch {
            text: Some("also short".to_string()),
            expanded: Some(false),
            ..BlockPatch::default()
        },
    );
    let block = store.find(id).unwrap();
    assert_eq!(block.text, "also short");
    assert!(!block.expanded);
}

#[test]
fn update_and_remove_ignore_unknown_ids() {
    let mut store = BlockStore::with_seed(1);
    store.insert(Block::new("kept", Position::default()));
    let before = store.blocks().to_vec();
    let unknown = uuid::Uuid::new_v4();

    assert!(!store.update(
        unknown,
        BlockPatch {
            dragging: Some(true),
            ..BlockPatch::default()
        }
    ));
    assert!(store.remove(unknown).is_none());
    assert_eq!(store.blocks(), before.as_slice());
}

#[test]
fn replace_pair_swaps_two_sources_for_one_placeholder() {
    let mut store = BlockStore::with_seed(1);
    let a = store.insert(Block::new("a", Position::new(0.0, 0.0)));
    let keep = store.insert(Block::new("keep", Position::new(500.0, 0.0)));
    let b = store.insert(Block::new("b", Position::new(100.0, 40.0)));
    let placeholder = Block::placeholder(Position::new(50.0, 20.0));
    let placeholder_id = placeholder.id;

    let (first, second) = store.replace_pair(b, a, placeholder).unwrap();

    assert_eq!(first.text, "b");
    assert_eq!(second.text, "a");
    let ids: Vec<_> = store.iter().map(|block| block.id).collect();
    assert_eq!(ids, vec![keep, placeholder_id]);
    let inserted = store.find(placeholder_id).unwrap();
    assert!(inserted.generating);
    assert_eq!(inserted.text, PLACEHOLDER_TEXT);
}

#[test]
fn replace_pair_with_missing_or_identical_source_is_a_no_op() {
    let mut store = BlockStore::with_seed(1);
    let a = store.insert(Block::new("a", Position::default()));
    let before = store.blocks().to_vec();

    assert!(store
        .replace_pair(a, uuid::Uuid::new_v4(), Block::placeholder(Position::default()))
        .is_none());
    assert!(store
        .replace_pair(a, a, Block::placeholder(Position::default()))
        .is_none());
    assert_eq!(store.blocks(), before.as_slice());
}

#[test]
fn remove_all_empties_store() {
    let mut store = BlockStore::with_seed(1);
    store.insert(Block::new("a", Position::default()));
    store.insert(Block::placeholder(Position::default()));

    assert_eq!(store.remove_all(), 2);
    assert!(store.is_empty());
    assert_eq!(store.remove_all(), 0);
}

#[test]
fn clear_dragging_resets_every_flag() {
    let mut store = BlockStore::with_seed(1);
    let a = store.insert(Block::new("a", Position::default()));
    let b = store.insert(Block::new("b", Position::default()));
    for id in [a, b] {
        store.update(
            id,
            BlockPatch {
                dragging: Some(true),
                ..BlockPatch::default()
            },
        );
    }
    assert_eq!(store.dragging_count(), 2);

    store.clear_dragging();
    assert_eq!(store.dragging_count(), 0);
}
