use clap::Args;
use serde::Serialize;

use spellpad::{normalize, Dictionary};

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Print the results as JSON.
    #[arg(long)]
    json: bool,
    #[arg(name = "WORD", required = true)]
    words: Vec<String>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
struct Lookup {
    word: String,
    known: bool,
}

/// Looks up each word after lowercasing it and renders one result per word.
pub fn execute_lookup(args: &LookupArgs, dictionary: &Dictionary) -> anyhow::Result<String> {
    let results: Vec<Lookup> = args
        .words
        .iter()
        .map(|word| {
            let word = normalize(word);
            let known = dictionary.search(&word);
            Lookup { word, known }
        })
        .collect();

    if args.json {
        return Ok(serde_json::to_string_pretty(&results)?);
    }

    Ok(results
        .iter()
        .map(|lookup| {
            format!(
                "{}\t{}",
                lookup.word,
                if lookup.known { "known" } else { "unknown" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n"))
}
