//! Browser-automation scraping client. Starts one task per configured robot,
//! polls each task until it settles, and maps the captured rows into
//! [`ScrapedJob`] values.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::scrape::{JobSource, ScrapeError, ScrapedJob};

const POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Hard deadline for one robot task. Exceeding it is terminal for the fetch —
/// callers must not retry within the same call.
const TASK_DEADLINE: Duration = Duration::from_secs(90);

/// HTTP client for a robot/actor scraping API (one task per robot run,
/// poll-until-settled).
pub struct RobotClient {
    client: Client,
    base_url: String,
    api_key: String,
    robot_ids: Vec<String>,
    poll_interval: Duration,
    task_deadline: Duration,
}

impl RobotClient {
    pub fn new(base_url: String, api_key: String, robot_ids: Vec<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            robot_ids,
            poll_interval: POLL_INTERVAL,
            task_deadline: TASK_DEADLINE,
        }
    }

    #[cfg(test)]
    fn with_timing(mut self, poll_interval: Duration, task_deadline: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.task_deadline = task_deadline;
        self
    }

    /// Runs one robot end to end: start a task, poll until it settles or the
    /// deadline passes, then map its captured rows.
    async fn run_robot(&self, robot_id: &str) -> Result<Vec<ScrapedJob>, ScrapeError> {
        let task_id = self.start_task(robot_id).await?;
        debug!("robot {robot_id}: started task {task_id}");

        let deadline = Instant::now() + self.task_deadline;
        loop {
            tokio::time::sleep(self.poll_interval).await;
            if Instant::now() >= deadline {
                return Err(ScrapeError::Timeout {
                    task_id,
                    deadline_secs: self.task_deadline.as_secs(),
                });
            }

            let task = self.fetch_task(&task_id).await?;
            match task.status.as_str() {
                "successful" => {
                    let jobs = map_captured_lists(task.captured_lists);
                    debug!("robot {robot_id}: task {task_id} captured {} jobs", jobs.len());
                    return Ok(jobs);
                }
                "failed" => return Err(ScrapeError::TaskFailed { task_id }),
                _ => {} // in-progress; keep polling
            }
        }
    }

    async fn start_task(&self, robot_id: &str) -> Result<String, ScrapeError> {
        let url = format!("{}/robots/{}/tasks", self.base_url, robot_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: TaskEnvelope = response.json().await?;
        Ok(body.result.id)
    }

    async fn fetch_task(&self, task_id: &str) -> Result<TaskResult, ScrapeError> {
        let url = format!("{}/tasks/{}", self.base_url, task_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: TaskEnvelope = response.json().await?;
        Ok(body.result)
    }
}

#[async_trait]
impl JobSource for RobotClient {
    /// Runs all configured robots in parallel and flattens their captures.
    /// A robot that fails is logged and skipped as long as another robot
    /// produced postings; if nothing was captured at all, the first error is
    /// surfaced to the caller.
    async fn fetch_latest_postings(&self) -> Result<Vec<ScrapedJob>, ScrapeError> {
        let runs = join_all(self.robot_ids.iter().map(|id| self.run_robot(id))).await;

        let mut postings = Vec::new();
        let mut first_error: Option<ScrapeError> = None;
        for (robot_id, run) in self.robot_ids.iter().zip(runs) {
            match run {
                Ok(jobs) => postings.extend(jobs),
                Err(e) => {
                    warn!("robot {robot_id} failed: {e}");
                    first_error.get_or_insert(e);
                }
            }
        }

        match (postings.is_empty(), first_error) {
            (true, Some(e)) => Err(e),
            _ => Ok(postings),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TaskEnvelope {
    result: TaskResult,
}

#[derive(Debug, Deserialize)]
struct TaskResult {
    #[serde(default)]
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default, rename = "capturedLists")]
    captured_lists: HashMap<String, Vec<CapturedRow>>,
}

#[derive(Debug, Deserialize)]
struct CapturedRow {
    #[serde(default)]
    title: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    location: String,
    #[serde(default, alias = "jobType")]
    job_type: Option<String>,
    #[serde(default, alias = "shortDescription")]
    short_description: Option<String>,
    #[serde(default, alias = "description", alias = "fullDescription")]
    full_description: String,
    #[serde(default, alias = "url", alias = "link")]
    source_url: Option<String>,
}

/// Flattens every captured list into `ScrapedJob`s, dropping rows the robot
/// captured without a title or company (navigation chrome, ads).
fn map_captured_lists(lists: HashMap<String, Vec<CapturedRow>>) -> Vec<ScrapedJob> {
    let mut jobs = Vec::new();
    let mut skipped = 0usize;
    for rows in lists.into_values() {
        for row in rows {
            if row.title.trim().is_empty() || row.company.trim().is_empty() {
                skipped += 1;
                continue;
            }
            jobs.push(ScrapedJob {
                title: row.title.trim().to_string(),
                company: row.company.trim().to_string(),
                location: row.location.trim().to_string(),
                job_type: row.job_type.filter(|s| !s.trim().is_empty()),
                short_description: row.short_description.filter(|s| !s.trim().is_empty()),
                full_description: row.full_description,
                source_url: row.source_url.filter(|s| !s.trim().is_empty()),
            });
        }
    }
    if skipped > 0 {
        warn!("dropped {skipped} captured rows missing title/company");
    }
    jobs
}
