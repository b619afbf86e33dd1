mod answers;
mod catalog;
mod enrich;
mod error;
mod lesson;
mod parser;
mod settings;
mod source;
mod store;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use enrich::dictionary::DictionaryApi;
use enrich::translate::MyMemory;
use enrich::{Enricher, Options, Pacer};
use lesson::LessonStats;
use parser::{LessonKind, LessonMeta};
use settings::Settings;

#[derive(Parser)]
#[command(name = "lesson_converter", about = "Convert lesson documents to JSON and fill in missing vocabulary data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one document, or every catalog lesson when no path is given
    Convert {
        /// .docx or .txt lesson document
        path: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = LessonKind::Listening)]
        kind: LessonKind,
        /// Unit number for metadata
        #[arg(short, long)]
        unit: Option<u32>,
        /// Metadata title when the document has none
        #[arg(short, long, default_value = "")]
        title: String,
        /// Output JSON (default: <output_dir>/<file stem>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fill missing vocabulary fields and translations in one lesson JSON, or all catalog outputs
    Enrich {
        path: Option<PathBuf>,
    },
    /// Apply a JSON answer key to a lesson
    Answers {
        lesson: PathBuf,
        key: PathBuf,
    },
    /// Convert then enrich the whole catalog
    Run,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(?settings, "settings loaded");

    match cli.command {
        Commands::Convert { path: Some(path), kind, unit, title, output } => {
            let meta = LessonMeta {
                unit: unit.map(|n| format!("Unit {n}")).unwrap_or_default(),
                title,
            };
            let output = output.unwrap_or_else(|| default_output(&settings, &path));
            let stats = convert_file(&path, kind, &meta, &output)?;
            println!("Converted {} -> {}", path.display(), output.display());
            stats.print();
        }
        Commands::Convert { path: None, .. } => convert_catalog(&settings),
        Commands::Enrich { path: Some(path) } => {
            let enricher = build_enricher(&settings)?;
            enrich_file(&enricher, &path)?.print();
        }
        Commands::Enrich { path: None } => enrich_catalog(&settings)?,
        Commands::Answers { lesson, key } => {
            let mut doc = store::load(&lesson)?;
            let text = std::fs::read_to_string(&key)
                .with_context(|| format!("Failed to read {}", key.display()))?;
            let key: answers::AnswerKey =
                serde_json::from_str(&text).with_context(|| format!("Invalid answer key {}", key.display()))?;
            let n = answers::apply(&mut doc, &key);
            store::save(&lesson, &doc)?;
            println!("Filled {} questions in {}", n, lesson.display());
        }
        Commands::Run => {
            convert_catalog(&settings);
            enrich_catalog(&settings)?;
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

fn default_output(settings: &Settings, path: &Path) -> PathBuf {
    let mut name = path.file_stem().map(|s| s.to_os_string()).unwrap_or_else(|| "lesson".into());
    name.push(".json");
    settings.output_dir.join(name)
}

fn convert_file(path: &Path, kind: LessonKind, meta: &LessonMeta, output: &Path) -> Result<LessonStats> {
    let lines = source::read_lines(path)?;
    let lesson = parser::convert(&lines, kind, meta);
    store::save(output, &lesson)?;
    Ok(LessonStats::of(&lesson))
}

/// Lessons are independent, so they convert in parallel. A missing document
/// is skipped; any other failure is reported and the batch carries on.
fn convert_catalog(settings: &Settings) {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(catalog::LESSONS.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let results: Vec<_> = catalog::LESSONS
        .par_iter()
        .map(|entry| {
            let source = entry.source_path(settings);
            let result = if source.exists() {
                convert_file(&source, entry.kind, &entry.meta(), &entry.output_path(settings)).map(Some)
            } else {
                Ok(None)
            };
            pb.inc(1);
            (entry, result)
        })
        .collect();
    pb.finish_and_clear();

    let mut converted = 0;
    for (entry, result) in results {
        let source = entry.source_path(settings);
        match result {
            Ok(Some(stats)) => {
                converted += 1;
                println!("\n{} -> {}", source.display(), entry.output_path(settings).display());
                stats.print();
            }
            Ok(None) => warn!(path = %source.display(), "source document not found, skipping"),
            Err(e) => error!(path = %source.display(), "conversion failed: {:#}", e),
        }
    }
    println!("\nConverted {}/{} lessons.", converted, catalog::LESSONS.len());
}

fn build_enricher(settings: &Settings) -> Result<Enricher<DictionaryApi, MyMemory>> {
    Ok(Enricher::new(
        DictionaryApi::new(&settings.dictionary_url, settings.timeout())?,
        MyMemory::new(&settings.translate_url, &settings.lang_pair, settings.timeout())?,
        Pacer::new(settings.cooldown()),
        Options {
            chunk_limit: settings.chunk_limit,
            translate_questions: settings.translate_questions,
        },
    ))
}

fn enrich_file(enricher: &Enricher<DictionaryApi, MyMemory>, path: &Path) -> Result<LessonStats> {
    let mut lesson = store::load(path)?;
    info!(path = %path.display(), words = lesson.vocabulary.len(), "enriching");
    enricher.enrich(&mut lesson);
    store::save(path, &lesson)?;
    Ok(LessonStats::of(&lesson))
}

/// Sequential: every call is paced.
fn enrich_catalog(settings: &Settings) -> Result<()> {
    let enricher = build_enricher(settings)?;
    for entry in catalog::LESSONS {
        let path = entry.output_path(settings);
        if !path.exists() {
            warn!(path = %path.display(), "lesson JSON not found, skipping");
            continue;
        }
        println!("\nEnriching {}", path.display());
        match enrich_file(&enricher, &path) {
            Ok(stats) => stats.print(),
            Err(e) => error!(path = %path.display(), "enrichment failed: {:#}", e),
        }
    }
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
