//! A word dictionary stored as a prefix tree, and a spell checker that grows
//! it as unknown words are accepted.
//!
//! The host owns a [`Dictionary`], fills it once with [`DictionaryLoader`],
//! and hands it to a [`SpellChecker`] together with something that can
//! [`Decide`] whether unknown words should be added.

pub mod checker;
pub mod decide;
pub mod dictionary;
pub mod loader;

pub use checker::{tokenize, CancelToken, CheckReport, Review, SpellChecker};
pub use decide::{Decide, DecisionError, Policy, TerminalPrompt};
pub use dictionary::{normalize, Dictionary, DictionaryError, DictionaryNode};
pub use loader::{DictionaryLoader, InlineWords, LoadError, LoadSummary, WordListFile, WordSource};
