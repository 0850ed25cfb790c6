use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    decide::Decide,
    dictionary::{normalize, Dictionary},
};

/// A handle that asks a running scan to stop before its next token.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a scan did. `cancelled == false` means every token was processed.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub tokens: usize,
    pub known: usize,
    pub unknown: usize,
    pub added: usize,
    pub declined: usize,
    /// Approved words that the dictionary refused because they contain
    /// characters outside a-z.
    pub rejected: usize,
    pub cancelled: bool,
}

/// Splits text on runs of whitespace.
///
/// Punctuation stays attached, so `"Hello,"` is looked up as `"hello,"` and
/// is reported unknown even when `"hello"` is known.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Unknown tokens collected by [`SpellChecker::review`], waiting for decisions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Review {
    tokens: usize,
    known: usize,
    /// Every unknown occurrence, lowercased, in text order.
    candidates: Vec<String>,
    cancelled: bool,
}

impl Review {
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// The candidates with repeats removed, in order of first appearance.
    pub fn unique_candidates(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.candidates
            .iter()
            .filter(|word| seen.insert(word.as_str()))
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Default, Clone)]
pub struct SpellChecker {
    cancel: Option<CancelToken>,
    // Ask about a declined word only once per scan instead of per occurrence.
    once_per_word: bool,
}

impl SpellChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn once_per_word(mut self, once_per_word: bool) -> Self {
        self.once_per_word = once_per_word;
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Checks every token of `text` in order, asking `decide` about each
    /// unknown one before moving on and inserting the words it approves.
    pub fn check<D>(&self, text: &str, dictionary: &mut Dictionary, decide: &mut D) -> CheckReport
    where
        D: Decide + ?Sized,
    {
        let mut tally = Tally::new(self.once_per_word);

        for token in tokenize(text) {
            if self.is_cancelled() {
                tally.report.cancelled = true;
                break;
            }
            tally.report.tokens += 1;

            let word = normalize(token);
            if dictionary.search(&word) {
                tally.report.known += 1;
                continue;
            }
            tally.resolve(word, dictionary, decide);
        }

        tally.finish()
    }

    /// First half of a deferred check: collects unknown tokens without
    /// asking about any of them.
    pub fn review(&self, text: &str, dictionary: &Dictionary) -> Review {
        let mut review = Review::default();

        for token in tokenize(text) {
            if self.is_cancelled() {
                review.cancelled = true;
                break;
            }
            review.tokens += 1;

            let word = normalize(token);
            if dictionary.search(&word) {
                review.known += 1;
            } else {
                review.candidates.push(word);
            }
        }

        debug!(
            "Reviewed {} tokens, {} unknown",
            review.tokens,
            review.candidates.len()
        );
        review
    }

    /// Second half of a deferred check: asks `decide` about the collected
    /// candidates and inserts the approved ones.
    ///
    /// Decisions follow the same per-occurrence rules as [`SpellChecker::check`],
    /// so a candidate already added earlier in this pass counts as known.
    pub fn apply<D>(
        &self,
        review: Review,
        dictionary: &mut Dictionary,
        decide: &mut D,
    ) -> CheckReport
    where
        D: Decide + ?Sized,
    {
        let mut tally = Tally::new(self.once_per_word);
        tally.report.tokens = review.tokens;
        tally.report.known = review.known;
        tally.report.cancelled = review.cancelled;

        for word in review.candidates {
            if self.is_cancelled() {
                tally.report.cancelled = true;
                break;
            }
            if dictionary.search(&word) {
                tally.report.known += 1;
                continue;
            }
            tally.resolve(word, dictionary, decide);
        }

        tally.finish()
    }
}

struct Tally {
    report: CheckReport,
    once_per_word: bool,
    // Words already decided against in this scan.
    settled: HashSet<String>,
}

impl Tally {
    fn new(once_per_word: bool) -> Self {
        Self {
            report: CheckReport::default(),
            once_per_word,
            settled: HashSet::new(),
        }
    }

    fn resolve<D>(&mut self, word: String, dictionary: &mut Dictionary, decide: &mut D)
    where
        D: Decide + ?Sized,
    {
        self.report.unknown += 1;

        if self.once_per_word && self.settled.contains(&word) {
            self.report.declined += 1;
            return;
        }

        match decide.decide(&word) {
            Ok(true) => match dictionary.insert(&word) {
                Ok(_) => {
                    debug!("Added {:?} to the dictionary", word);
                    self.report.added += 1;
                }
                Err(err) => {
                    warn!("Could not add word: {}", err);
                    self.report.rejected += 1;
                    self.settled.insert(word);
                }
            },
            Ok(false) => {
                self.report.declined += 1;
                self.settled.insert(word);
            }
            Err(err) => {
                debug!("No decision for {:?}, leaving it unknown: {}", word, err);
                self.report.declined += 1;
                self.settled.insert(word);
            }
        }
    }

    fn finish(self) -> CheckReport {
        info!(
            "Spell check {}: {} tokens, {} unknown, {} added",
            if self.report.cancelled {
                "cancelled"
            } else {
                "complete"
            },
            self.report.tokens,
            self.report.unknown,
            self.report.added
        );
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decide::{DecisionError, Policy};

    fn dictionary_of(words: &[&str]) -> Dictionary {
        let mut dictionary = Dictionary::new();
        for word in words {
            dictionary.insert(word).unwrap();
        }
        dictionary
    }

    /// Records every question and answers from a fixed rule.
    struct Recorder<F> {
        asked: Vec<String>,
        answer: F,
    }

    impl<F: FnMut(&str) -> Result<bool, DecisionError>> Decide for Recorder<F> {
        fn decide(&mut self, candidate: &str) -> Result<bool, DecisionError> {
            self.asked.push(candidate.to_string());
            (self.answer)(candidate)
        }
    }

    fn recorder<F>(answer: F) -> Recorder<F>
    where
        F: FnMut(&str) -> Result<bool, DecisionError>,
    {
        Recorder {
            asked: Vec::new(),
            answer,
        }
    }

    #[test]
    fn test_tokenize_splits_on_whitespace_runs() {
        let tokens: Vec<_> = tokenize("  Hello,   world\n\tagain  ").collect();
        assert_eq!(tokens, vec!["Hello,", "world", "again"]);
        assert_eq!(tokenize(" \n\t ").count(), 0);
    }

    #[test]
    fn test_punctuation_stays_attached() {
        let mut dictionary = dictionary_of(&["hello", "world"]);
        let mut decide = recorder(|_: &str| Ok(false));

        let report = SpellChecker::new().check("Hello, world", &mut dictionary, &mut decide);

        assert_eq!(decide.asked, vec!["hello,"]);
        assert_eq!(report.tokens, 2);
        assert_eq!(report.known, 1);
        assert_eq!(report.unknown, 1);
        assert!(!report.cancelled);
    }

    #[test]
    fn test_approved_words_are_inserted() {
        let mut dictionary = dictionary_of(&["the", "cat"]);
        let mut decide = recorder(|word: &str| Ok(word == "sat"));

        let report = SpellChecker::new().check("The cat sat on", &mut dictionary, &mut decide);

        assert_eq!(decide.asked, vec!["sat", "on"]);
        assert!(dictionary.search("sat"));
        assert!(!dictionary.search("on"));
        assert_eq!(report.added, 1);
        assert_eq!(report.declined, 1);
    }

    #[test]
    fn test_declined_word_is_asked_again_per_occurrence() {
        let mut dictionary = Dictionary::new();
        let mut decide = recorder(|_: &str| Ok(false));

        let report = SpellChecker::new().check("foo bar FOO", &mut dictionary, &mut decide);

        assert_eq!(decide.asked, vec!["foo", "bar", "foo"]);
        assert_eq!(report.unknown, 3);
        assert_eq!(report.declined, 3);
    }

    #[test]
    fn test_accepted_word_is_known_on_next_occurrence() {
        let mut dictionary = Dictionary::new();
        let mut decide = recorder(|_: &str| Ok(true));

        let report = SpellChecker::new().check("foo Foo foo", &mut dictionary, &mut decide);

        assert_eq!(decide.asked, vec!["foo"]);
        assert_eq!(report.known, 2);
        assert_eq!(report.added, 1);
    }

    #[test]
    fn test_once_per_word_skips_repeated_questions() {
        let mut dictionary = Dictionary::new();
        let mut decide = recorder(|_: &str| Ok(false));

        let report = SpellChecker::new()
            .once_per_word(true)
            .check("foo bar foo bar foo", &mut dictionary, &mut decide);

        assert_eq!(decide.asked, vec!["foo", "bar"]);
        assert_eq!(report.unknown, 5);
        assert_eq!(report.declined, 5);
    }

    #[test]
    fn test_decision_errors_decline_and_continue() {
        let mut dictionary = Dictionary::new();
        let mut decide = recorder(|word: &str| match word {
            "a" => Err(DecisionError::Closed),
            _ => Ok(true),
        });

        let report = SpellChecker::new().check("a b", &mut dictionary, &mut decide);

        assert_eq!(decide.asked, vec!["a", "b"]);
        assert!(!dictionary.search("a"));
        assert!(dictionary.search("b"));
        assert_eq!(report.declined, 1);
        assert_eq!(report.added, 1);
        assert!(!report.cancelled);
    }

    #[test]
    fn test_out_of_alphabet_approval_is_rejected() {
        let mut dictionary = dictionary_of(&["co", "op"]);
        let report = SpellChecker::new().check("co-op", &mut dictionary, &mut Policy::AcceptAll);

        assert_eq!(report.unknown, 1);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.added, 0);
        assert_eq!(dictionary.len(), 2);
    }

    #[test]
    fn test_cancel_stops_between_tokens() {
        let cancel = CancelToken::new();
        let checker = SpellChecker::new().with_cancel(cancel.clone());
        let mut dictionary = Dictionary::new();
        let mut decide = recorder(|word: &str| {
            if word == "two" {
                cancel.cancel();
            }
            Ok(true)
        });

        let report = checker.check("one two three four", &mut dictionary, &mut decide);

        assert_eq!(decide.asked, vec!["one", "two"]);
        assert!(dictionary.search("two"));
        assert!(!dictionary.search("three"));
        assert_eq!(report.tokens, 2);
        assert!(report.cancelled);
    }

    #[test]
    fn test_uncancelled_token_runs_to_completion() {
        let checker = SpellChecker::new().with_cancel(CancelToken::new());
        let mut dictionary = Dictionary::new();

        let report = checker.check("one two three", &mut dictionary, &mut Policy::RejectAll);

        assert_eq!(report.tokens, 3);
        assert!(!report.cancelled);
    }

    #[test]
    fn test_review_then_apply_matches_check() {
        let text = "the quick brown fox jumps over the lazy fox";
        let words = &["the", "quick", "over"];
        let approve = |word: &str| -> Result<bool, DecisionError> { Ok(word != "lazy") };

        let mut direct = dictionary_of(words);
        let mut direct_decide = recorder(approve);
        let direct_report = SpellChecker::new().check(text, &mut direct, &mut direct_decide);

        let mut deferred = dictionary_of(words);
        let checker = SpellChecker::new();
        let review = checker.review(text, &deferred);
        assert_eq!(review.candidates(), ["brown", "fox", "jumps", "lazy", "fox"]);
        assert_eq!(review.unique_candidates(), vec!["brown", "fox", "jumps", "lazy"]);

        let mut deferred_decide = recorder(approve);
        let deferred_report = checker.apply(review, &mut deferred, &mut deferred_decide);

        assert_eq!(direct_report, deferred_report);
        assert_eq!(direct_decide.asked, deferred_decide.asked);
        for word in ["brown", "fox", "jumps", "lazy"] {
            assert_eq!(direct.search(word), deferred.search(word));
        }
    }

    #[test]
    fn test_review_does_not_modify_dictionary() {
        let dictionary = dictionary_of(&["known"]);
        let review = SpellChecker::new().review("known unknown", &dictionary);

        assert_eq!(review.candidates(), ["unknown"]);
        assert_eq!(dictionary.len(), 1);
    }
}
