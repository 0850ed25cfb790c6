use std::io::{BufRead, Write};

use thiserror::Error;

use crate::checker::CancelToken;

#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("the spell check was cancelled")]
    Cancelled,

    #[error("no more answers can be read")]
    Closed,

    #[error("{}", .0)]
    Io(#[from] std::io::Error),
}

/// Decides whether an unknown word should be added to the dictionary.
///
/// Any error is treated as declining to add the word.
pub trait Decide {
    fn decide(&mut self, candidate: &str) -> Result<bool, DecisionError>;
}

impl<F> Decide for F
where
    F: FnMut(&str) -> bool,
{
    fn decide(&mut self, candidate: &str) -> Result<bool, DecisionError> {
        Ok(self(candidate))
    }
}

/// Answers every question the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    AcceptAll,
    RejectAll,
}

impl Decide for Policy {
    fn decide(&mut self, _candidate: &str) -> Result<bool, DecisionError> {
        Ok(*self == Policy::AcceptAll)
    }
}

/// Asks about each unknown word on `output` and reads the answer from `input`.
///
/// Answering `q` stops the scan: the current word is declined and the
/// attached [`CancelToken`] is tripped.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
    cancel: Option<CancelToken>,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

impl<R: BufRead, W: Write> Decide for TerminalPrompt<R, W> {
    fn decide(&mut self, candidate: &str) -> Result<bool, DecisionError> {
        write!(
            self.output,
            "Unknown word: {}\nAdd to dictionary? [y/N/q] ",
            candidate
        )?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(DecisionError::Closed);
        }

        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => Ok(true),
            "q" | "quit" => {
                if let Some(cancel) = &self.cancel {
                    cancel.cancel();
                }
                Err(DecisionError::Cancelled)
            }
            _ => Ok(false),
        }
    }
}
