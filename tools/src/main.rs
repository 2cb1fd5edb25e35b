mod convert_table;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lovekey_core::Lexicon;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lexicon-tool", about = "Build and inspect lovekey lexicon files")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile table files into lexicon.fst + lexicon.bincode
    Build {
        #[arg(long, num_args = 1.., required = true)]
        inputs: Vec<PathBuf>,

        #[arg(long, default_value = "data")]
        out_dir: PathBuf,
    },
    /// Print the words stored under a syllable (or every syllable it prefixes)
    Show {
        #[arg(long, default_value = "data")]
        dir: PathBuf,

        key: String,

        /// Also list syllables that start with KEY
        #[arg(long)]
        prefix: bool,
    },
    /// List every syllable with its word count
    List {
        #[arg(long, default_value = "data")]
        dir: PathBuf,
    },
}

fn load(dir: &Path) -> Result<Lexicon> {
    Lexicon::load_dir(dir).with_context(|| format!("loading lexicon from {}", dir.display()))
}

fn main() -> Result<()> {
    match Args::parse().command {
        Command::Build { inputs, out_dir } => {
            let lexicon = convert_table::run(&inputs, &out_dir)?;
            println!(
                "Wrote {} syllables to {}",
                lexicon.len(),
                out_dir.display()
            );
        }
        Command::Show { dir, key, prefix } => {
            let lexicon = load(&dir)?;
            if prefix {
                for (syllable, words) in lexicon.prefixed(&key) {
                    println!("{}\t{}", syllable, words.join(" "));
                }
            } else if lexicon.contains(&key) {
                let words = lexicon.lookup(&key);
                println!("Key '{}' has {} words:", key, words.len());
                for (i, w) in words.iter().enumerate() {
                    println!("  {}. {}", i + 1, w);
                }
            } else {
                println!("Key '{}' not found", key);
            }
        }
        Command::List { dir } => {
            let lexicon = load(&dir)?;
            for syllable in lexicon.syllables() {
                println!("{}\t{}", syllable, lexicon.lookup(&syllable).len());
            }
        }
    }
    Ok(())
}
