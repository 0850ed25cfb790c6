use std::{
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
};

use clap::{Args, ValueEnum};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use spellpad::{
    CancelToken, CheckReport, Decide, Dictionary, Policy, SpellChecker, TerminalPrompt,
};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// The document to check. Read from piped stdin when omitted.
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// How to decide whether an unknown word is added to the dictionary.
    #[arg(short, long, value_enum, default_value_t = DecideMode::Ask)]
    decide: DecideMode,
    /// Ask about a declined word only once instead of at every occurrence.
    #[arg(long)]
    once_per_word: bool,
    /// Collect every unknown word first, then decide on them together.
    #[arg(long)]
    batch: bool,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecideMode {
    /// Prompt on the terminal for each unknown word.
    Ask,
    /// Add every unknown word.
    Accept,
    /// Add nothing.
    Reject,
}

pub async fn execute_check(args: CheckArgs, dictionary: &mut Dictionary) -> anyhow::Result<()> {
    if args.decide == DecideMode::Ask && args.file.is_none() {
        anyhow::bail!(
            "--decide ask reads answers from stdin, so the document must be given with --file"
        );
    }

    let text = match &args.file {
        Some(path) => read_document(path).await?,
        None => {
            if std::io::stdin().is_terminal() {
                anyhow::bail!("no document given: pass --file or pipe text on stdin");
            }
            let mut stdin = tokio::io::stdin();
            let mut buf = Vec::with_capacity(256);
            stdin.read_to_end(&mut buf).await?;
            String::from_utf8_lossy(&buf).to_string()
        }
    };
    debug!("Document is {} bytes", text.len());

    let cancel = CancelToken::new();
    let checker = SpellChecker::new()
        .with_cancel(cancel.clone())
        .once_per_word(args.once_per_word);

    let report = match args.decide {
        DecideMode::Ask => {
            let stdin = std::io::stdin();
            let mut prompt =
                TerminalPrompt::new(stdin.lock(), std::io::stderr()).with_cancel(cancel);
            run(&checker, &text, dictionary, &mut prompt, args.batch)?
        }
        DecideMode::Accept => {
            run(&checker, &text, dictionary, &mut Policy::AcceptAll, args.batch)?
        }
        DecideMode::Reject => {
            run(&checker, &text, dictionary, &mut Policy::RejectAll, args.batch)?
        }
    };

    println!("{}", render(&report, args.json)?);
    Ok(())
}

async fn read_document(path: &Path) -> anyhow::Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(err) => anyhow::bail!("could not read {}: {}", path.display(), err),
    }
}

fn run<D>(
    checker: &SpellChecker,
    text: &str,
    dictionary: &mut Dictionary,
    decide: &mut D,
    batch: bool,
) -> anyhow::Result<CheckReport>
where
    D: Decide + ?Sized,
{
    if !batch {
        return Ok(checker.check(text, dictionary, decide));
    }

    let review = checker.review(text, dictionary);
    let unique = review.unique_candidates();
    if !unique.is_empty() {
        info!("{} distinct unknown words", unique.len());
        let mut stderr = std::io::stderr();
        writeln!(stderr, "Unknown words: {}", unique.join(", "))?;
    }
    Ok(checker.apply(review, dictionary, decide))
}

fn render(report: &CheckReport, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let status = if report.cancelled {
        "cancelled"
    } else {
        "complete"
    };
    Ok(format!(
        "Spell check {}. {} words checked, {} unknown, {} added to the dictionary.",
        status, report.tokens, report.unknown, report.added
    ))
}
