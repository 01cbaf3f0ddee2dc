use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bidalign_align::AlignmentPipeline;
use bidalign_core::chunker::{paragraphs_from_plain_text, Chunker};
use bidalign_core::config::{expand_path, AlignmentSettings, Config, ScorerKind};
use bidalign_core::error::Error;
use bidalign_core::types::{CoverageReport, DocumentStructure, OutlineDocument};

/// Align a generated tender outline with the text of an earlier plan document.
#[derive(Parser)]
#[command(name = "bidalign", version)]
struct Cli {
    /// Directory containing config.toml / config.<env>.toml
    #[arg(long, global = true, default_value = ".")]
    config_dir: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split a source document into overlapping chunks
    Chunk {
        /// Parsed document (.json with "paragraphs") or plain text
        source: String,
        #[command(flatten)]
        chunking: ChunkingArgs,
        #[arg(long)]
        output: Option<String>,
    },
    /// Assign source chunks to every outline node
    Align {
        /// Parsed document (.json with "paragraphs") or plain text
        source: String,
        /// Outline JSON: {"outline": [...]}
        #[arg(long)]
        outline: String,
        #[command(flatten)]
        chunking: ChunkingArgs,
        /// lexical or embedding
        #[arg(long)]
        scorer: Option<ScorerKind>,
        #[arg(long)]
        top_k: Option<usize>,
        #[arg(long)]
        min_score: Option<f64>,
        /// Print the raw node-to-chunk mapping instead of the annotated outline
        #[arg(long)]
        mapping_only: bool,
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(Args)]
struct ChunkingArgs {
    #[arg(long)]
    target_chars: Option<usize>,
    #[arg(long)]
    overlap_chars: Option<usize>,
}

impl ChunkingArgs {
    fn apply(&self, settings: &mut AlignmentSettings) {
        if let Some(n) = self.target_chars { settings.chunking.target_chars = n; }
        if let Some(n) = self.overlap_chars { settings.chunking.overlap_chars = n; }
    }
}

#[derive(Serialize)]
struct AlignOutput<'a> {
    aligned_outline: &'a OutlineDocument,
    report: &'a CoverageReport,
}

fn init_tracing() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("bidalign=info"))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}

fn read_source(source: &str) -> Result<DocumentStructure> {
    let path = expand_path(source);
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()).into());
    }
    let raw = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    if is_json(&path) {
        serde_json::from_str(&raw).with_context(|| format!("parsing document structure {}", path.display()))
    } else {
        Ok(DocumentStructure { paragraphs: paragraphs_from_plain_text(&raw) })
    }
}

fn read_outline(outline: &str) -> Result<OutlineDocument> {
    let path = expand_path(outline);
    let raw = fs::read_to_string(&path).with_context(|| format!("reading outline {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing outline {}", path.display()))
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn emit<T: Serialize>(value: &T, output: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(out) => {
            let path: PathBuf = expand_path(out);
            fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    let config = Config::load_from(&expand_path(&cli.config_dir)).context("loading configuration")?;
    let mut settings = config.alignment()?;

    match cli.command {
        Command::Chunk { source, chunking, output } => {
            chunking.apply(&mut settings);
            settings.validate()?;
            let structure = read_source(&source)?;
            let chunks = Chunker::with_config(settings.chunking).chunk_structure(&structure);
            info!(paragraphs = structure.paragraphs.len(), chunks = chunks.len(), "chunked source");
            emit(&chunks, output.as_deref())?;
        }
        Command::Align { source, outline, chunking, scorer, top_k, min_score, mapping_only, output } => {
            chunking.apply(&mut settings);
            if let Some(kind) = scorer { settings.matching.scorer = kind; }
            if let Some(k) = top_k { settings.matching.top_k = k; }
            if min_score.is_some() { settings.matching.min_score = min_score; }
            settings.validate()?;

            let structure = read_source(&source)?;
            let outline = read_outline(&outline)?;
            let pipeline = AlignmentPipeline::from_settings(&settings);
            let aligned = pipeline.run(&structure, &outline)?;

            if mapping_only {
                emit(&aligned.alignment, output.as_deref())?;
            } else {
                emit(&AlignOutput { aligned_outline: &aligned.outline, report: &aligned.report }, output.as_deref())?;
            }
        }
    }
    Ok(())
}
