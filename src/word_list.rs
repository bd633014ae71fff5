//! The dictionary every slot draws its candidates from.
//!
//! Entries are normalized to uppercase, deduplicated, and sorted, so a `WordId` (an index into
//! the sorted list) gives a stable, reproducible order for candidate words. Each word's characters
//! are also interned as glyph ids, which lets the constraint code compare letters by index and
//! track letter sets in a `BitSet`.
//!
//! Parsing works on an in-memory string only; reading the file is the caller's job.

use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap};

use crate::MAX_SLOT_LENGTH;

/// An identifier for a given word, based on its index in the sorted word list.
pub type WordId = usize;

/// An identifier for a given letter, based on its index in the word list's `glyphs` field.
pub type GlyphId = usize;

/// A word that can be chosen for a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[GlyphId; MAX_SLOT_LENGTH]>,
}

impl Word {
    /// Length in characters, which is what has to match a slot's length.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Uppercase a word one character at a time. A character whose uppercase form is more than one
/// character (like `ß`) is kept as is, so the word's length never changes.
fn normalize(entry: &str) -> String {
    entry
        .trim()
        .chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct WordList {
    /// Every distinct character appearing in any word, sorted.
    pub glyphs: Vec<char>,

    /// All words, sorted and deduplicated.
    pub words: Vec<Word>,
}

impl WordList {
    /// Build a word list from raw entries. Each entry is trimmed and uppercased; blank entries are
    /// dropped.
    pub fn new<I, S>(entries: I) -> WordList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let strings: BTreeSet<String> = entries
            .into_iter()
            .map(|entry| normalize(entry.as_ref()))
            .filter(|entry| !entry.is_empty())
            .collect();

        let glyphs: Vec<char> = strings
            .iter()
            .flat_map(|string| string.chars())
            .collect::<BTreeSet<char>>()
            .into_iter()
            .collect();

        let glyph_ids_by_char: HashMap<char, GlyphId> = glyphs
            .iter()
            .enumerate()
            .map(|(glyph_id, &glyph)| (glyph, glyph_id))
            .collect();

        let words: Vec<Word> = strings
            .into_iter()
            .map(|string| {
                let glyphs = string.chars().map(|c| glyph_ids_by_char[&c]).collect();
                Word { string, glyphs }
            })
            .collect();

        log::debug!(
            "Loaded {} words using {} distinct glyphs",
            words.len(),
            glyphs.len()
        );

        WordList { glyphs, words }
    }

    /// Parse a word list with one entry per line.
    pub fn parse_from_str(contents: &str) -> WordList {
        WordList::new(contents.lines())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Look up a word by its text (case-insensitive).
    pub fn get_id(&self, word: &str) -> Option<WordId> {
        let normalized = normalize(word);

        self.words
            .binary_search_by(|candidate| candidate.string.as_str().cmp(normalized.as_str()))
            .ok()
    }

    /// Length of the longest word, or 0 for an empty list.
    pub fn max_length(&self) -> usize {
        self.words.iter().map(Word::len).max().unwrap_or(0)
    }
}
