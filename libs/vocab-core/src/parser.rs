//! Vocabulary file parser.
//!
//! # Format
//! ```json
//! [
//!   { "german": "der Hund", "english": "dog", "gender": "m", "plural": "die Hunde" },
//!   { "german": "gehen", "english": "to go/to walk", "example": "Ich gehe nach Hause." }
//! ]
//! ```

use crate::error::{ParseError, Result};
use crate::types::{split_alternates, VocabItem};

/// Parse and validate a vocabulary file.
pub fn parse(content: &str) -> Result<Vec<VocabItem>> {
    if content.trim().is_empty() {
        return Ok(vec![]);
    }

    let items: Vec<VocabItem> = serde_json::from_str(content)?;
    for (index, item) in items.iter().enumerate() {
        validate(item, index)?;
    }
    Ok(items)
}

/// Check that an item has at least one usable term and translation alternate.
pub fn validate(item: &VocabItem, index: usize) -> Result<()> {
    if split_alternates(&item.term).is_empty() {
        return Err(ParseError::MissingTerm { index });
    }
    if split_alternates(&item.translation).is_empty() {
        return Err(ParseError::MissingTranslation { index });
    }
    Ok(())
}
