// src/jobs/coordinator.rs
use crate::config::Config;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::site_crawler::SiteCrawler;
use crate::crawler::site_processor::SiteProcessor;
use crate::crawler::url_utils::normalize_target;
use crate::jobs::registry::JobRegistry;
use crate::models::JobEvent;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Number of events the streaming channel buffers before the producer
/// waits on the consumer.
const EVENT_BUFFER: usize = 16;

#[derive(Debug)]
pub enum JobError {
    InvalidInput(String),
    NotFound(String),
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            JobError::NotFound(id) => write!(f, "job not found: {}", id),
        }
    }
}

impl std::error::Error for JobError {}

/// Accepts batches of targets and streams per-target results back in
/// submission order. Targets within a job run strictly sequentially;
/// independent jobs run concurrently and share only the registry.
pub struct JobCoordinator {
    registry: JobRegistry,
    processor: Arc<SiteProcessor>,
}

impl JobCoordinator {
    pub fn new(config: &Config) -> crate::models::Result<Self> {
        let fetcher = PageFetcher::new()?;
        let crawler = SiteCrawler::new(fetcher, config.crawler.clone());
        let processor = SiteProcessor::new(crawler, config.crawler.clone());
        let registry = JobRegistry::new(Duration::from_secs(config.jobs.expiry_seconds));
        Ok(Self {
            registry,
            processor: Arc::new(processor),
        })
    }

    /// Register a batch of targets and return the job id. Targets are
    /// normalized here; the original strings are kept for display.
    pub fn submit(&self, targets: Vec<String>) -> std::result::Result<String, JobError> {
        if targets.is_empty() {
            return Err(JobError::InvalidInput("target list is empty".to_string()));
        }

        let normalized = targets.iter().map(|t| normalize_target(t)).collect();
        let id = self.registry.insert(normalized, targets);
        info!("Submitted job {}", id);
        Ok(id)
    }

    /// Claim a job and stream its events: one Progress per target in
    /// submission order, then one Done. The job id is unusable after
    /// the stream ends; dropping the receiver cancels further targets.
    pub fn stream(
        &self,
        job_id: &str,
    ) -> std::result::Result<mpsc::Receiver<JobEvent>, JobError> {
        let job = self
            .registry
            .claim(job_id)
            .ok_or_else(|| JobError::NotFound(job_id.to_string()))?;

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let processor = Arc::clone(&self.processor);
        let registry = self.registry.clone();
        let id = job_id.to_string();

        tokio::spawn(async move {
            let total = job.targets.len();
            for (i, (target, original)) in
                job.targets.iter().zip(job.originals.iter()).enumerate()
            {
                if tx.is_closed() {
                    debug!("Receiver dropped; cancelling job {}", id);
                    break;
                }

                let result = processor.process(target).await;
                let event = JobEvent::Progress {
                    website: result.website,
                    emails: result.emails,
                    error: result.error,
                    processed_count: i + 1,
                    total_count: total,
                    current_website: original.clone(),
                };
                if tx.send(event).await.is_err() {
                    debug!("Receiver dropped mid-job; cancelling job {}", id);
                    break;
                }
            }

            let _ = tx.send(JobEvent::Done).await;
            registry.remove(&id);
            info!("🏁 Job {} finished", id);
        });

        Ok(rx)
    }
}
