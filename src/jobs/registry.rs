// src/jobs/registry.rs
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Created,
    Streaming,
}

/// One submitted batch. Immutable after creation apart from the state
/// flag; the entry is removed, never edited.
#[derive(Debug, Clone)]
pub struct Job {
    /// Normalized target URLs, in submission order.
    pub targets: Vec<String>,
    /// The caller's original strings, for display in progress events.
    pub originals: Vec<String>,
    pub created_at: String,
    pub state: JobState,
}

/// In-memory job table shared across concurrently running jobs. This is
/// the only mutable state shared between jobs.
#[derive(Clone)]
pub struct JobRegistry {
    jobs: Arc<DashMap<String, Job>>,
    expiry: Duration,
}

impl JobRegistry {
    pub fn new(expiry: Duration) -> Self {
        Self {
            jobs: Arc::new(DashMap::new()),
            expiry,
        }
    }

    /// Store a new job and schedule its expiry. Returns the job id.
    pub fn insert(&self, targets: Vec<String>, originals: Vec<String>) -> String {
        let id = Uuid::new_v4().to_string();
        self.jobs.insert(
            id.clone(),
            Job {
                targets,
                originals,
                created_at: chrono::Utc::now().to_rfc3339(),
                state: JobState::Created,
            },
        );

        // Expiry sweep for jobs that are never consumed. Streaming jobs
        // were claimed and will be removed by the coordinator instead.
        let jobs = Arc::clone(&self.jobs);
        let expiry_id = id.clone();
        let expiry = self.expiry;
        tokio::spawn(async move {
            tokio::time::sleep(expiry).await;
            if jobs
                .remove_if(&expiry_id, |_, job| job.state == JobState::Created)
                .is_some()
            {
                debug!("Expired unconsumed job {}", expiry_id);
            }
        });

        id
    }

    /// Atomically transition a job from Created to Streaming and hand
    /// back its contents. Returns None for unknown, expired, or
    /// already-claimed ids.
    pub fn claim(&self, id: &str) -> Option<Job> {
        let mut entry = self.jobs.get_mut(id)?;
        if entry.state != JobState::Created {
            return None;
        }
        entry.state = JobState::Streaming;
        Some(entry.clone())
    }

    pub fn remove(&self, id: &str) {
        self.jobs.remove(id);
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
