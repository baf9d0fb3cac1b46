//! User-facing session error messages.

pub const EMPTY_BLOCK_TEXT: &str = "Please enter some text to add a block.";
pub const STORAGE_NOT_READY: &str = "Storage is not ready yet. Please try again.";
pub const CONCEPT_SAVE_FAILED: &str = "Could not save the concept.";
pub const CONCEPTS_LOAD_FAILED: &str = "Could not load saved concepts.";
pub const CONCEPTS_CLEAR_FAILED: &str = "Could not delete all saved concepts.";
pub const SIGN_IN_FAILED: &str = "Authentication failed. Please try again later.";
