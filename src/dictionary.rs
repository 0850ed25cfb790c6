//! A prefix tree of known words.
//!
//! The tree only accepts the ASCII lowercase letters `a`..=`z`. Case folding
//! is the caller's job (see [`normalize`]); the tree itself is case-sensitive,
//! so `"Cat"` is rejected rather than silently folded. Any other character,
//! including digits, punctuation and non-ASCII letters, is outside the
//! alphabet: searches containing one report "not found" and inserts
//! containing one are refused without touching the tree.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("'{word}' contains {found:?}, which is outside the a-z alphabet")]
    OutOfAlphabet { word: String, found: char },
}

/// Lowercases a word before it is handed to the dictionary.
pub fn normalize(word: &str) -> String {
    word.to_lowercase()
}

fn in_alphabet(c: char) -> bool {
    c.is_ascii_lowercase()
}

/// A node in the prefix tree
#[derive(Debug, Default)]
pub struct DictionaryNode {
    // The children of this node, keyed by letter
    children: HashMap<char, DictionaryNode>,
    // Whether a word ends at this node
    is_word: bool,
}

impl DictionaryNode {
    fn new() -> Self {
        DictionaryNode {
            children: HashMap::new(),
            is_word: false,
        }
    }
}

/// The set of known words, stored as a prefix tree over `a`..=`z`.
///
/// The dictionary only grows. It has no internal locking; callers that share
/// it must serialize access themselves.
#[derive(Debug, Default)]
pub struct Dictionary {
    root: DictionaryNode,
    words: usize,
}

impl Dictionary {
    /// Creates a new, empty dictionary
    pub fn new() -> Self {
        Dictionary {
            root: DictionaryNode::new(),
            words: 0,
        }
    }

    /// Inserts an already normalized word.
    ///
    /// Returns `Ok(true)` when the word was not known before and `Ok(false)`
    /// when it was. The empty string marks the root itself as a word.
    pub fn insert(&mut self, word: &str) -> Result<bool, DictionaryError> {
        if let Some(found) = word.chars().find(|c| !in_alphabet(*c)) {
            return Err(DictionaryError::OutOfAlphabet {
                word: word.to_string(),
                found,
            });
        }

        let mut current_node = &mut self.root;
        for c in word.chars() {
            current_node = current_node.children.entry(c).or_default();
        }

        let added = !current_node.is_word;
        current_node.is_word = true;
        if added {
            self.words += 1;
        }
        Ok(added)
    }

    /// Returns whether the word is known. Characters outside the alphabet
    /// are never known.
    pub fn search(&self, word: &str) -> bool {
        let mut current_node = &self.root;
        for c in word.chars() {
            if !in_alphabet(c) {
                return false;
            }
            match current_node.children.get(&c) {
                Some(next_node) => current_node = next_node,
                None => return false,
            }
        }
        current_node.is_word
    }

    /// Returns the number of distinct known words.
    pub fn len(&self) -> usize {
        self.words
    }

    /// Returns `true` if no word has been inserted.
    pub fn is_empty(&self) -> bool {
        self.words == 0
    }
}
