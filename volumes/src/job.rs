// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Asynchronous job tracking.
//!
//! A submitted volume operation answers with the job resource path in its
//! `Location` header; the tracker polls that resource at a fixed interval
//! until it reaches a terminal state or the wall-clock budget runs out.
//! Every poll is a read — the tracker never mutates the job resource, and
//! it never re-submits the operation.

use crate::error::Error;
use crate::schema::Job;
use crate::schema::JobState;
use redstor_core::ODataId;
use redstor_core::RedfishClient;
use std::time::Duration;
use tokio::time::sleep;

pub(crate) const JOB_COMPLETED_MSG: &str = "The job is successfully completed.";
pub(crate) const JOB_SUBMITTED_MSG: &str = "The job is successfully submitted.";
pub(crate) const JOB_NO_RESPONSE_MSG: &str = "The job has no response.";

pub(crate) fn incomplete_message(waited_secs: u64) -> String {
    format!("The job is not complete after {waited_secs} seconds.")
}

pub(crate) fn job_failure_message(verb: &str) -> String {
    format!("Unable to complete the task initiated for {verb} the storage volume.")
}

/// Outcome of waiting on a job resource.
#[derive(Debug)]
pub enum JobWait {
    /// The job reached a terminal state.
    Finished(Job),
    /// The budget ran out first. Carries the last observation, if any poll
    /// got through at all.
    TimedOut {
        last: Option<Job>,
        waited_secs: u64,
    },
}

/// Polls a job resource until a terminal state or timeout.
#[derive(Debug, Clone)]
pub struct JobTracker {
    poll_interval: Duration,
    wait_timeout: Duration,
}

impl JobTracker {
    #[must_use]
    pub const fn new(poll_interval: Duration, wait_timeout: Duration) -> Self {
        Self {
            poll_interval,
            wait_timeout,
        }
    }

    /// Poll until the job is terminal or the budget elapses.
    ///
    /// Transport errors and error statuses during a poll are tolerated and
    /// retried until the deadline; a flaky read must not fail a job that is
    /// still making progress.
    pub async fn wait<C: RedfishClient>(&self, client: &C, job_uri: &ODataId) -> JobWait {
        let mut waited = Duration::from_secs(0);
        let mut last: Option<Job> = None;
        loop {
            match client.get(job_uri).await {
                Ok(resp) if resp.success() => match resp.parse::<Job>() {
                    Ok(job) => {
                        if job.state().map(JobState::is_terminal).unwrap_or(false) {
                            tracing::debug!(state = ?job.state(), "job reached terminal state");
                            return JobWait::Finished(job);
                        }
                        tracing::trace!(state = ?job.state(), "job not terminal yet");
                        last = Some(job);
                    }
                    Err(err) => tracing::trace!(%err, "unparsable job body; retrying"),
                },
                Ok(resp) => {
                    tracing::trace!(status = %resp.status(), "job poll rejected; retrying");
                }
                Err(err) => tracing::trace!(%err, "job poll failed; retrying"),
            }

            if waited >= self.wait_timeout {
                return JobWait::TimedOut {
                    last,
                    waited_secs: self.wait_timeout.as_secs(),
                };
            }
            sleep(self.poll_interval).await;
            waited += self.poll_interval;
        }
    }

    /// Track a submitted job to a user-facing outcome.
    ///
    /// With `job_wait` unset this is fire-and-forget: a single read reports
    /// the submission without waiting for completion. `verb` names the
    /// submitting operation in the failure message ("creating",
    /// "deleting", ...).
    ///
    /// # Errors
    ///
    /// - `OperationFailed` when the job reported `Failed`, or when no
    ///   response was ever obtained;
    /// - `Timeout` with the elapsed-seconds message when the budget ran out
    ///   on a live but unfinished job.
    pub async fn track<C: RedfishClient>(
        &self,
        client: &C,
        job_uri: &ODataId,
        job_wait: bool,
        verb: &str,
    ) -> Result<(String, Job), Error<C>> {
        if !job_wait {
            let job = match client.get(job_uri).await {
                Ok(resp) if resp.success() => resp.parse::<Job>().ok(),
                _ => None,
            };
            let job = match job {
                Some(job) => job,
                None => return Err(Error::OperationFailed(JOB_NO_RESPONSE_MSG.to_string())),
            };
            return match job.state() {
                Some(state) if state.is_failure() => {
                    Err(Error::OperationFailed(job_failure_message(verb)))
                }
                Some(state) if state.is_success() => Ok((JOB_COMPLETED_MSG.to_string(), job)),
                _ => Ok((JOB_SUBMITTED_MSG.to_string(), job)),
            };
        }

        match self.wait(client, job_uri).await {
            JobWait::Finished(job) => match job.state() {
                Some(state) if state.is_failure() => {
                    Err(Error::OperationFailed(job_failure_message(verb)))
                }
                _ => Ok((JOB_COMPLETED_MSG.to_string(), job)),
            },
            JobWait::TimedOut {
                last: Some(_),
                waited_secs,
            } => Err(Error::Timeout(incomplete_message(waited_secs))),
            JobWait::TimedOut { last: None, .. } => {
                Err(Error::OperationFailed(JOB_NO_RESPONSE_MSG.to_string()))
            }
        }
    }
}
