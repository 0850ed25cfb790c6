use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::dictionary::{normalize, Dictionary, DictionaryError};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("word list {} does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("word list {} could not be read: {}", .path.display(), .source)]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Somewhere a word list can be read from, one word per line.
#[async_trait::async_trait]
pub trait WordSource {
    /// A short human readable name, used in logs.
    fn describe(&self) -> String;

    async fn read_to_string(&self) -> Result<String, LoadError>;
}

/// A word list stored in a plain text file.
#[derive(Debug, Clone)]
pub struct WordListFile {
    path: PathBuf,
}

impl WordListFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl WordSource for WordListFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_to_string(&self) -> Result<String, LoadError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(buf) => Ok(buf),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(LoadError::NotFound {
                path: self.path.clone(),
            }),
            Err(source) => Err(LoadError::Unreadable {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// A word list held in memory.
#[derive(Debug, Clone)]
pub struct InlineWords(pub String);

#[async_trait::async_trait]
impl WordSource for InlineWords {
    fn describe(&self) -> String {
        "<inline>".to_string()
    }

    async fn read_to_string(&self) -> Result<String, LoadError> {
        Ok(self.0.clone())
    }
}

/// Counts of what happened to each line of a word list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Non-blank lines seen.
    pub lines: usize,
    pub inserted: usize,
    pub duplicates: usize,
    /// Lines containing characters outside a-z after lowercasing.
    pub rejected: usize,
}

pub struct DictionaryLoader;

impl DictionaryLoader {
    /// Reads `source` into a fresh dictionary.
    pub async fn load<S>(source: &S) -> Result<(Dictionary, LoadSummary), LoadError>
    where
        S: WordSource + Sync + ?Sized,
    {
        let mut dictionary = Dictionary::new();
        let summary = Self::load_into(source, &mut dictionary).await?;
        Ok((dictionary, summary))
    }

    /// Reads `source` and inserts every word into `dictionary`.
    ///
    /// The whole list is read before anything is inserted, so a failed read
    /// leaves `dictionary` as it was.
    pub async fn load_into<S>(
        source: &S,
        dictionary: &mut Dictionary,
    ) -> Result<LoadSummary, LoadError>
    where
        S: WordSource + Sync + ?Sized,
    {
        let buf = source.read_to_string().await?;
        let summary = insert_lines(&buf, dictionary);
        info!(
            "Loaded word list {}: {} lines, {} new words, {} duplicates, {} rejected",
            source.describe(),
            summary.lines,
            summary.inserted,
            summary.duplicates,
            summary.rejected
        );
        Ok(summary)
    }
}

fn insert_lines(buf: &str, dictionary: &mut Dictionary) -> LoadSummary {
    let mut summary = LoadSummary::default();
    for line in buf.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        summary.lines += 1;
        match dictionary.insert(&normalize(line)) {
            Ok(true) => summary.inserted += 1,
            Ok(false) => summary.duplicates += 1,
            Err(DictionaryError::OutOfAlphabet { word, found }) => {
                debug!("Skipping word list entry {:?}: contains {:?}", word, found);
                summary.rejected += 1;
            }
        }
    }
    summary
}
