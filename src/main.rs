mod check;
mod lookup;

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use spellpad::{Dictionary, DictionaryLoader, LoadError, WordListFile};

use crate::{check::CheckArgs, lookup::LookupArgs};

/// Spell check plain text against a word list.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Check text against a word list, growing the list as you go."
)]
struct Cli {
    /// Word list to load, one word per line.
    #[arg(
        long,
        global = true,
        env = "SPELLPAD_DICTIONARY",
        default_value = "dictionary.txt"
    )]
    dictionary: PathBuf,
    /// Continue with an empty dictionary if the word list cannot be loaded.
    #[arg(long, global = true)]
    allow_missing_dictionary: bool,
    /// Where to write logs.
    #[arg(long, global = true, default_value = "log.txt")]
    log_file: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a document, asking whether to add each unknown word.
    Check(CheckArgs),
    /// Report whether words are in the dictionary.
    Lookup(LookupArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file = File::create(&cli.log_file)?;
    tracing_subscriber::fmt().with_writer(file).init();

    let mut dictionary = load_dictionary(&cli.dictionary, cli.allow_missing_dictionary).await?;
    info!("Dictionary holds {} words", dictionary.len());

    match cli.command {
        Command::Check(args) => check::execute_check(args, &mut dictionary).await?,
        Command::Lookup(args) => println!("{}", lookup::execute_lookup(&args, &dictionary)?),
    }

    Ok(())
}

async fn load_dictionary(path: &Path, allow_missing: bool) -> Result<Dictionary, LoadError> {
    match DictionaryLoader::load(&WordListFile::new(path)).await {
        Ok((dictionary, _)) => Ok(dictionary),
        Err(err) if allow_missing => {
            warn!("{}, continuing with an empty dictionary", err);
            eprintln!("warning: {}, continuing with an empty dictionary", err);
            Ok(Dictionary::new())
        }
        Err(err) => Err(err),
    }
}
