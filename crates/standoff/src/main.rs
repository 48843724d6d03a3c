use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ingest::DocumentReader;
use standoff::{Conversion, ConvertConfig, Converter, Metrics, TimedOperation, brat};

/// Convert span-extraction pipeline output into char-offset standoff JSON
#[derive(Parser, Debug)]
#[command(name = "standoff", version)]
struct Args {
    /// Pipeline output, one JSON document or JSON lines
    input: PathBuf,

    /// JSON file with converter and repair settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print brat `.txt`/`.ann` pairs instead of JSON
    #[arg(long)]
    brat: bool,
}

/// Standoff JSON as printed: the document plus the key it came in with.
#[derive(Serialize)]
struct Output<'a> {
    doc_key: &'a str,
    #[serde(flatten)]
    document: &'a extract::Document,
}

fn print_conversion(conversion: &Conversion, config: &ConvertConfig, as_brat: bool) -> Result<()> {
    if as_brat {
        match brat::render(&conversion.document) {
            Ok(ann) => {
                println!("# {}.txt", conversion.doc_key);
                println!("{}", conversion.document.text);
                println!("# {}.ann", conversion.doc_key);
                print!("{}", ann);
            }
            Err(e) => {
                tracing::warn!(doc_key = %conversion.doc_key, error = %e, "Skipping brat output");
            }
        }
        return Ok(());
    }

    let output = Output {
        doc_key: &conversion.doc_key,
        document: &conversion.document,
    };
    let json = if config.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConvertConfig::load(path).await?,
        None => ConvertConfig::default(),
    };
    let converter = Converter::new(config.repair)?;

    let documents = DocumentReader::read_file(&args.input).await?;
    tracing::info!(
        path = %args.input.display(),
        documents = documents.len(),
        "Loaded pipeline output"
    );

    let metrics = Metrics::new();
    for doc in &documents {
        let timer = TimedOperation::start();
        match converter.convert(doc) {
            Ok(conversion) => {
                metrics.record_conversion(&conversion, timer.elapsed());
                for record in conversion.repairs.iter().filter(|r| r.unresolved) {
                    tracing::warn!(
                        doc_key = %conversion.doc_key,
                        entity = %record.entity_id,
                        reason = %record.reason,
                        "Entity left with unrepaired span"
                    );
                }
                print_conversion(&conversion, &config, args.brat)?;
            }
            Err(e) => {
                metrics.record_failure(timer.elapsed());
                tracing::error!(doc_key = %doc.doc_key, error = %e, "Failed to convert document");
            }
        }
    }

    let snapshot = metrics.snapshot();
    tracing::info!(
        converted = snapshot.documents_converted,
        failed = snapshot.documents_failed,
        entities = snapshot.entities_emitted,
        relations = snapshot.relations_emitted,
        dropped_relations = snapshot.relations_dropped,
        relocated_spans = snapshot.spans_relocated,
        unresolved_entities = snapshot.entities_unresolved,
        avg_ms = snapshot.avg_convert_time_ms,
        "Conversion complete"
    );

    Ok(())
}
