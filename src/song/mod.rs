//! Song generation against an asynchronous backend: submit a description,
//! poll for audio, retry the whole cycle with exponential backoff.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{Result, TunesmithError};
use crate::http::shared_client;
use crate::util::backoff::BackoffPolicy;
use crate::vision::Description;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Backend status value that means audio is ready to fetch. Every other
/// status, known or not, means keep waiting.
const STATUS_STREAMING: &str = "streaming";

/// Failure of a single submit+poll attempt.
///
/// Attempt failures are retried by [`SongClient::generate_song`] and only
/// ever reach the caller wrapped in [`TunesmithError::SongGeneration`].
#[derive(Error, Debug)]
pub enum SongAttemptError {
    #[error("song request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("song backend returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed song backend response: {0}")]
    Malformed(String),

    #[error("timed out after {0:?} waiting for audio")]
    Timeout(Duration),
}

/// One submitted generation request, identified by the backend-assigned ids
/// (usually two candidate takes). Discarded once an attempt ends.
#[derive(Debug, Clone)]
struct SongJob {
    ids: Vec<String>,
}

impl SongJob {
    fn joined_ids(&self) -> String {
        self.ids.join(",")
    }
}

/// Client for the song-generation backend.
///
/// `generate_song` runs up to `max_retries` submit+poll attempts; within an
/// attempt the status endpoint is polled every `poll_interval` until
/// `timeout` elapses. The intervals are tunable so hosts and tests can run
/// the same state machine on different clocks.
pub struct SongClient {
    base_url: String,
    backoff: BackoffPolicy,
    timeout: Duration,
    poll_interval: Duration,
}

impl SongClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            backoff: BackoffPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Total attempts allowed, including the first (default 3).
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.backoff.max_attempts = max_retries;
        self
    }

    /// Per-attempt budget for the poll loop (default 300 s).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sleep between status polls (default 5 s).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Backoff before the second attempt; doubles each retry (default 1 s).
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff.base = base;
        self
    }

    /// Generate a song from `description` and return the audio URL.
    ///
    /// Each attempt submits the description, then polls until the first
    /// returned record reports `streaming` or the attempt times out. Any
    /// attempt failure (submission error, malformed body, timeout) is
    /// retried after an exponential backoff until attempts are exhausted,
    /// at which point the last cause surfaces inside
    /// [`TunesmithError::SongGeneration`].
    pub async fn generate_song(&self, description: &Description) -> Result<String> {
        let mut last_error: Option<SongAttemptError> = None;

        for attempt in 0..self.backoff.max_attempts {
            if let Some(delay) = self.backoff.delay_before(attempt) {
                debug!(attempt, ?delay, "backing off before retry");
                tokio::time::sleep(delay).await;
            }

            match self.run_attempt(description).await {
                Ok(audio_url) => return Ok(audio_url),
                Err(e) => {
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = self.backoff.max_attempts,
                        error = %e,
                        "song generation attempt failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let attempts = self.backoff.max_attempts;
        Err(match last_error {
            Some(cause) => TunesmithError::song_generation(attempts, cause),
            None => TunesmithError::SongGeneration {
                attempts,
                source: None,
            },
        })
    }

    async fn run_attempt(
        &self,
        description: &Description,
    ) -> std::result::Result<String, SongAttemptError> {
        let job = self.submit(description).await?;
        debug!(ids = %job.joined_ids(), "submitted song job");

        let started = Instant::now();
        while started.elapsed() < self.timeout {
            if let Some(audio_url) = self.poll_once(&job).await? {
                return Ok(audio_url);
            }
            tokio::time::sleep(self.poll_interval).await;
        }

        Err(SongAttemptError::Timeout(self.timeout))
    }

    async fn submit(
        &self,
        description: &Description,
    ) -> std::result::Result<SongJob, SongAttemptError> {
        let payload = GenerateRequest {
            prompt: description.as_str(),
            make_instrumental: false,
            wait_audio: true,
        };
        let url = format!("{}/api/generate", self.base_url);

        let resp = shared_client().post(&url).json(&payload).send().await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(SongAttemptError::Api { status, body });
        }

        let body = resp.text().await?;
        let records: Vec<GenerateRecord> = serde_json::from_str(&body)
            .map_err(|e| SongAttemptError::Malformed(format!("generate response: {e}")))?;
        if records.is_empty() {
            return Err(SongAttemptError::Malformed(
                "generate response contained no job records".into(),
            ));
        }

        Ok(SongJob {
            ids: records.into_iter().map(|r| r.id).collect(),
        })
    }

    async fn poll_once(
        &self,
        job: &SongJob,
    ) -> std::result::Result<Option<String>, SongAttemptError> {
        let url = format!("{}/api/get", self.base_url);

        let resp = shared_client()
            .get(&url)
            .query(&[("ids", job.joined_ids())])
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(SongAttemptError::Api { status, body });
        }

        let body = resp.text().await?;
        let records: Vec<StatusRecord> = serde_json::from_str(&body)
            .map_err(|e| SongAttemptError::Malformed(format!("status response: {e}")))?;

        // Only the first take is ever considered, even when two ids were
        // submitted.
        let first = records.first().ok_or_else(|| {
            SongAttemptError::Malformed("status response contained no records".into())
        })?;

        if first.status == STATUS_STREAMING {
            let audio_url = first.audio_url.clone().ok_or_else(|| {
                SongAttemptError::Malformed("streaming record missing audio_url".into())
            })?;
            return Ok(Some(audio_url));
        }

        Ok(None)
    }
}

// Song API wire types (internal)

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    make_instrumental: bool,
    wait_audio: bool,
}

#[derive(Deserialize)]
struct GenerateRecord {
    id: String,
}

#[derive(Deserialize)]
struct StatusRecord {
    status: String,
    audio_url: Option<String>,
}
