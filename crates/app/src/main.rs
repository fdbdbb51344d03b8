use anyhow::anyhow;
use chrono::Utc;
use clap::{Parser, Subcommand};
use kb_search_core::{
    ingest_folder, FsBlobStore, IngestionReport, KnowledgeBase, ListOptions, SearchOptions,
    SortField, SortOrder,
};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "kb-search", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Owner identifier all operations are scoped to.
    #[arg(long, default_value = "local")]
    owner: String,

    /// Directory where original uploads are kept.
    #[arg(long, default_value = "./kb-uploads")]
    blob_root: String,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest every supported file under a folder (pdf, txt, md).
    Ingest {
        /// Folder scanned recursively for documents.
        #[arg(long)]
        folder: String,
    },
    /// Ingest a folder, then run a ranked search over it.
    Search {
        #[arg(long)]
        folder: String,
        /// Search query.
        #[arg(long)]
        query: String,
        /// Maximum number of documents to return.
        #[arg(long, default_value = "10")]
        limit: usize,
        /// Only return documents in this category.
        #[arg(long)]
        category: Option<String>,
        /// Print results as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Ingest a folder, then list its documents.
    List {
        #[arg(long)]
        folder: String,
        /// 1-indexed page number.
        #[arg(long, default_value = "1")]
        page: usize,
        #[arg(long, default_value = "20")]
        limit: usize,
        #[arg(long)]
        category: Option<String>,
        /// title | file_name | file_size | word_count | category | created_at | updated_at
        #[arg(long, default_value = "created_at")]
        sort_by: String,
        /// asc | desc
        #[arg(long, default_value = "desc")]
        order: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let kb = KnowledgeBase::new(FsBlobStore::new(&cli.blob_root));

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        owner = %cli.owner,
        "kb-search boot"
    );

    match cli.command {
        Command::Ingest { folder } => {
            let report = ingest_with_report(&kb, &folder, &cli.owner).await?;
            println!(
                "{} documents ingested at {}",
                report.documents.len(),
                Utc::now().to_rfc3339()
            );
        }
        Command::Search {
            folder,
            query,
            limit,
            category,
            json,
        } => {
            ingest_with_report(&kb, &folder, &cli.owner).await?;

            let options = SearchOptions { limit, category };
            let results = kb.search(&query, &cli.owner, &options)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(());
            }

            println!("query: {query}");
            if results.is_empty() {
                println!("no matching documents");
            }
            for result in results {
                println!(
                    "[score={}] {} ({}) id={}",
                    result.score, result.document.title, result.document.file_name, result.document.id
                );
                if !result.matched_terms.is_empty() {
                    println!("  matched: {}", result.matched_terms.join(", "));
                }
                for scored in &result.relevant_chunks {
                    println!(
                        "  chunk@{} occurrences={}",
                        scored.chunk.start_index, scored.score
                    );
                    println!("    {}", excerpt(&scored.chunk.text));
                }
            }
        }
        Command::List {
            folder,
            page,
            limit,
            category,
            sort_by,
            order,
        } => {
            ingest_with_report(&kb, &folder, &cli.owner).await?;

            let sort_by = SortField::from_key(&sort_by)
                .ok_or_else(|| anyhow!("unknown sort field: {sort_by}"))?;
            let sort_order = match order.as_str() {
                "asc" => SortOrder::Asc,
                "desc" => SortOrder::Desc,
                other => return Err(anyhow!("unknown sort order: {other}")),
            };

            let options = ListOptions {
                page,
                limit,
                category,
                sort_by,
                sort_order,
            };
            let summaries = kb.list_documents(&cli.owner, &options);

            for summary in summaries {
                println!(
                    "{}\t{}\t{} words\t{}\t{}",
                    summary.id,
                    summary.title,
                    summary.word_count,
                    summary.media_type,
                    summary.created_at.to_rfc3339()
                );
            }
        }
    }

    Ok(())
}

async fn ingest_with_report(
    kb: &KnowledgeBase<FsBlobStore>,
    folder: &str,
    owner: &str,
) -> anyhow::Result<IngestionReport> {
    let report = ingest_folder(kb, Path::new(folder), owner).await?;

    if !report.skipped_files.is_empty() {
        warn!(
            "skipped_files={} for folder={}",
            report.skipped_files.len(),
            folder
        );
        for skipped in &report.skipped_files {
            warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipped file");
        }
    }

    info!(
        folder = %folder,
        document_count = report.documents.len(),
        "documents ingested"
    );
    Ok(report)
}

fn excerpt(text: &str) -> String {
    const MAX_CHARS: usize = 240;
    if text.chars().count() <= MAX_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_CHARS).collect();
    format!("{cut}…")
}
