// src/scrape/orchestrator.rs
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::catalog::{enabled_sources, SourceDescriptor};
use crate::config::Config;
use crate::dedupe::dedupe;
use crate::export;
use crate::logging::FileLogger;
use crate::models::{
    EntityRecord, ProgressSnapshot, RawRecord, Result, RunSummary, SourceError,
};
use crate::normalize::finalize_record;
use crate::scrape::session::{create_session_pool, FetchSession};
use crate::scrape::strategy::StrategyRegistry;
use crate::scrape::pace;

/// Final product of a run: the deduplicated records plus the summary that
/// was logged and exported.
pub struct RunReport {
    pub summary: RunSummary,
    pub records: Vec<EntityRecord>,
}

/// A successful source's batch, stamped with source metadata at collection
/// time. Normalization happens once, at the end of the run.
struct StampedBatch {
    raw: Vec<RawRecord>,
    scraped_at: DateTime<Utc>,
    source_type: String,
    source_region: String,
}

impl StampedBatch {
    fn finalize(&self) -> Vec<EntityRecord> {
        self.raw
            .iter()
            .cloned()
            .map(|raw| {
                finalize_record(raw, self.scraped_at, &self.source_type, &self.source_region)
            })
            .collect()
    }
}

struct SourceOutcome {
    source_name: String,
    source_type: String,
    source_region: String,
    worker: usize,
    result: std::result::Result<Vec<RawRecord>, SourceError>,
}

/// Owns the worker pool and drives the whole run: select sources, dispatch
/// each to its strategy on a pooled session, collect outcomes, checkpoint,
/// and export. A failed source never halts the run; only pool setup can.
pub struct Orchestrator {
    config: Arc<Config>,
    registry: Arc<StrategyRegistry>,
    logger: FileLogger,
}

impl Orchestrator {
    pub fn new(config: Arc<Config>, registry: Arc<StrategyRegistry>, logger: FileLogger) -> Self {
        Self {
            config,
            registry,
            logger,
        }
    }

    pub async fn run(&self, catalog: &[SourceDescriptor]) -> Result<RunReport> {
        let run_id = Uuid::new_v4().to_string();
        let selected = enabled_sources(catalog, &self.config);
        let total = selected.len();
        self.logger
            .info(&format!("Found {} enabled data sources to process", total));

        let worker_count = self.config.scraping.worker_count.max(1);
        // Pool setup is the one fatal failure mode; sessions built before a
        // failure are dropped on the error path.
        let sessions = create_session_pool(worker_count)?;
        self.logger
            .info(&format!("Started {} fetch sessions", worker_count));

        // Round-robin partition: source i goes to worker i % worker_count,
        // preserving selection order within each worker.
        let mut queues: Vec<Vec<SourceDescriptor>> = vec![Vec::new(); worker_count];
        for (i, source) in selected.into_iter().enumerate() {
            queues[i % worker_count].push(source);
        }

        let save_every = self.config.scraping.save_progress_every.max(1);
        let (tx, mut rx) = mpsc::channel::<SourceOutcome>(32);
        let mut handles = Vec::with_capacity(worker_count);
        for (session, queue) in sessions.into_iter().zip(queues) {
            handles.push(tokio::spawn(worker_loop(
                session,
                queue,
                Arc::clone(&self.config),
                Arc::clone(&self.registry),
                self.logger.clone(),
                tx.clone(),
            )));
        }
        drop(tx);

        // Single writer: only this loop touches the accumulator.
        let mut batches: Vec<StampedBatch> = Vec::new();
        let mut processed = 0usize;
        let mut errors = 0usize;

        while let Some(outcome) = rx.recv().await {
            processed += 1;
            match outcome.result {
                Ok(raw) if raw.is_empty() => {
                    self.logger
                        .info(&format!("No results found for {}", outcome.source_name));
                }
                Ok(raw) => {
                    self.logger.info(&format!(
                        "Collected {} results from {} (worker {})",
                        raw.len(),
                        outcome.source_name,
                        outcome.worker
                    ));
                    batches.push(StampedBatch {
                        raw,
                        scraped_at: Utc::now(),
                        source_type: outcome.source_type,
                        source_region: outcome.source_region,
                    });
                }
                Err(e) => {
                    errors += 1;
                    self.logger
                        .error(&format!("Error processing {}: {}", outcome.source_name, e));
                }
            }

            if processed % save_every == 0 {
                let snapshot = ProgressSnapshot {
                    processed,
                    total,
                    timestamp: Utc::now(),
                    results: batches.iter().flat_map(StampedBatch::finalize).collect(),
                };
                if let Err(e) =
                    export::save_progress(&snapshot, &self.config.output.temp_data_dir).await
                {
                    self.logger.error(&format!("Failed to save progress: {}", e));
                }
            }
        }

        // The channel closing means every worker finished its queue.
        for handle in handles {
            if let Err(e) = handle.await {
                self.logger.error(&format!("Worker task failed: {}", e));
            }
        }

        self.logger.info("Processing and cleaning collected data...");
        let finalized: Vec<EntityRecord> =
            batches.iter().flat_map(StampedBatch::finalize).collect();
        let cleaned = dedupe(finalized);

        let summary = RunSummary::compute(run_id, &cleaned, total, processed, errors);
        self.log_summary(&summary);
        self.export_all(&cleaned, &summary).await;

        Ok(RunReport {
            summary,
            records: cleaned,
        })
    }

    /// Each export artifact is attempted independently; a failed sink is
    /// logged, never silently dropped, and never kills the others.
    async fn export_all(&self, records: &[EntityRecord], summary: &RunSummary) {
        let output = &self.config.output;
        if let Err(e) = export::export_json(records, &output.json_path, output.pretty_json).await {
            self.logger
                .error(&format!("JSON export to {} failed: {}", output.json_path, e));
        }
        if let Err(e) = export::export_csv(records, &output.csv_path).await {
            self.logger
                .error(&format!("CSV export to {} failed: {}", output.csv_path, e));
        }
        if let Err(e) =
            export::save_summary(summary, &output.summary_path, output.pretty_json).await
        {
            self.logger.error(&format!(
                "Summary export to {} failed: {}",
                output.summary_path, e
            ));
        }
    }

    fn log_summary(&self, summary: &RunSummary) {
        self.logger.info("=== SCRAPING SUMMARY ===");
        self.logger.info(&format!(
            "Sources processed: {}/{}",
            summary.processed_sources, summary.total_sources
        ));
        self.logger
            .info(&format!("Total entities found: {}", summary.total_results));
        self.logger.info(&format!("HOAs: {}", summary.hoa_count));
        self.logger.info(&format!(
            "Property Management: {}",
            summary.property_management_count
        ));
        self.logger
            .info(&format!("Both types: {}", summary.both_count));
        self.logger
            .info(&format!("Unknown type: {}", summary.unknown_count));
        self.logger
            .info(&format!("With email: {}", summary.with_email));
        self.logger
            .info(&format!("With phone: {}", summary.with_phone));
        self.logger
            .info(&format!("With website: {}", summary.with_website));
        self.logger
            .info(&format!("Errors encountered: {}", summary.total_errors));
    }
}

/// One pooled worker: processes its queue strictly in order, retrying each
/// failed source up to `max_retries` times, and paces between sources
/// regardless of outcome. The session is released when the task ends.
async fn worker_loop(
    session: FetchSession,
    queue: Vec<SourceDescriptor>,
    config: Arc<Config>,
    registry: Arc<StrategyRegistry>,
    logger: FileLogger,
    tx: mpsc::Sender<SourceOutcome>,
) {
    let queue_len = queue.len();
    for (i, source) in queue.into_iter().enumerate() {
        let strategy = registry.resolve(source.special_type.as_deref());
        logger.info(&format!(
            "Processing source {}/{} on worker {}: {} ({})",
            i + 1,
            queue_len,
            session.id(),
            source.name,
            strategy.name()
        ));

        let mut attempt = 0;
        let result = loop {
            match strategy.extract(&session, &source, &config).await {
                Ok(records) => break Ok(records),
                Err(e) if attempt < config.scraping.max_retries => {
                    attempt += 1;
                    logger.error(&format!(
                        "Attempt {}/{} for {} failed: {}",
                        attempt, config.scraping.max_retries, source.name, e
                    ));
                    tokio::time::sleep(std::time::Duration::from_millis(
                        config.scraping.retry_delay_ms,
                    ))
                    .await;
                }
                Err(e) => break Err(e),
            }
        };

        let outcome = SourceOutcome {
            source_name: source.name.clone(),
            source_type: source.source_type.clone(),
            source_region: source.region.clone(),
            worker: session.id(),
            result,
        };
        if tx.send(outcome).await.is_err() {
            // Receiver is gone; nothing left to report to.
            break;
        }

        pace(config.scraping.request_delay_ms).await;
    }
}
