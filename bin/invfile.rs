use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use invfile::index::BuiltinScorer;
use invfile::{
    build_index, load, merge, merge_all, save, scan_keys, Corpus, FrameLayout, IndexSettings,
    Message, Tokenizer,
};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "invfile")]
#[command(about = "Build, inspect and merge inverted index segment files", long_about = None)]
struct Args {
    /// JSON file with index settings (frame layout, tokenizer)
    #[arg(long, global = true, env = "INVFILE_SETTINGS")]
    settings: Option<PathBuf>,

    /// Document id width in bytes, overrides the settings file
    #[arg(long, global = true, env = "INVFILE_ID_WIDTH")]
    id_width: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index a JSON array of messages and save it as a segment
    Build {
        /// Messages to index
        #[arg(long)]
        messages: PathBuf,

        /// Segment file to write
        #[arg(long)]
        output: PathBuf,

        /// Scoring function (length, tf, normalized)
        #[arg(long, default_value = "length")]
        scorer: BuiltinScorer,

        /// Also write the tokenized documents as JSON
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
    /// Merge segments into one; shared terms keep input order
    Merge {
        /// Segment file to write
        #[arg(long)]
        output: PathBuf,

        /// Segments to merge, at least two
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,
    },
    /// Print every term with the byte offset of its frame
    Keys { segment: PathBuf },
    /// Print posting lists as JSON lines
    Show {
        segment: PathBuf,

        /// Only show these terms
        #[arg(long = "term")]
        terms: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!("Starting invfile v{}", invfile::VERSION);

    let mut settings = match &args.settings {
        Some(path) => IndexSettings::from_json_file(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?,
        None => IndexSettings::default(),
    };
    if let Some(id_width) = args.id_width {
        settings = settings.with_layout(FrameLayout::new(id_width)?);
    }
    let layout = settings.layout;

    match args.command {
        Command::Build {
            messages,
            output,
            scorer,
            corpus,
        } => {
            let raw = std::fs::read_to_string(&messages)
                .with_context(|| format!("failed to read {}", messages.display()))?;
            let messages: Vec<Message> =
                serde_json::from_str(&raw).context("messages must be a JSON array")?;

            let tokenizer = Tokenizer::new(&settings.tokenizer_config);
            let documents = Corpus::from_messages(&messages, &tokenizer);
            info!(documents = documents.len(), %scorer, "Indexing messages");

            if let Some(path) = corpus {
                std::fs::write(&path, documents.to_json()?)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }

            let index = build_index(documents.documents(), scorer);
            save(&index, &output, layout)
                .with_context(|| format!("failed to save {}", output.display()))?;
        }
        Command::Merge { output, inputs } => {
            if let [a, b] = inputs.as_slice() {
                merge(&output, a, b, layout)?;
            } else {
                merge_all(&output, inputs.as_slice(), layout)?;
            }
        }
        Command::Keys { segment } => {
            for (term, offset) in scan_keys(&segment, layout)
                .with_context(|| format!("failed to scan {}", segment.display()))?
            {
                println!("{}\t{}", term, offset);
            }
        }
        Command::Show { segment, terms } => {
            let keys: HashSet<String> = terms.into_iter().collect();
            let selected = (!keys.is_empty()).then_some(&keys);
            let index = load(&segment, selected, layout)
                .with_context(|| format!("failed to load {}", segment.display()))?;
            for (term, postings) in &index {
                println!(
                    "{}",
                    serde_json::json!({ "term": term, "postings": postings })
                );
            }
        }
    }

    Ok(())
}
