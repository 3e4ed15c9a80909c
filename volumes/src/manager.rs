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

//! High-level volume task execution.

use crate::apply::job_tracking_required;
use crate::apply::reboot_required;
use crate::context::StorageContext;
use crate::error::Error;
use crate::job::JobTracker;
use crate::params::Operation;
use crate::params::VolumeTask;
use redstor_core::ODataId;
use redstor_core::RedfishClient;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
const DEFAULT_REBOOT_TIMEOUT: Duration = Duration::from_secs(900);

/// Reference to the asynchronous job a submission produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskHandle {
    /// Job identifier — the trailing segment of the job path.
    pub id: String,
    /// Job resource path.
    pub uri: ODataId,
}

/// Outcome of a volume task: the operator-facing message, the submitted
/// job when one was scheduled, and whether anything changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskHandle>,
    pub changed: bool,
}

/// Orchestrates volume operations against one controller.
///
/// The manager is generic over the transport ([`RedfishClient`]), so the
/// same workflow runs against a live controller or the scripted mock.
pub struct VolumeManager<C: RedfishClient> {
    client: Arc<C>,
    poll_interval: Duration,
    reboot_timeout: Duration,
}

impl<C: RedfishClient> VolumeManager<C> {
    #[must_use]
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
            reboot_timeout: DEFAULT_REBOOT_TIMEOUT,
        }
    }

    /// Interval between job polls.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Wall-clock budget for tracking a reboot job.
    #[must_use]
    pub const fn with_reboot_timeout(mut self, reboot_timeout: Duration) -> Self {
        self.reboot_timeout = reboot_timeout;
        self
    }

    pub(crate) fn client(&self) -> &C {
        self.client.as_ref()
    }

    pub(crate) fn job_tracker(&self, wait_timeout_secs: i64) -> JobTracker {
        let wait_timeout = Duration::from_secs(wait_timeout_secs.max(0) as u64);
        JobTracker::new(self.poll_interval, wait_timeout)
    }

    pub(crate) fn reboot_tracker(&self) -> JobTracker {
        JobTracker::new(self.poll_interval, self.reboot_timeout)
    }

    /// Locate the storage collection for the target system.
    ///
    /// # Errors
    ///
    /// See [`StorageContext::discover`].
    pub async fn discover(&self) -> Result<StorageContext, Error<C>> {
        StorageContext::discover(self.client()).await
    }

    /// Run one volume task end to end: validate the options, resolve the
    /// apply time, submit the operation, carry out the reboot when the
    /// change needs one, and track the job to its outcome.
    ///
    /// The operation is submitted at most once; a triggered reboot is
    /// tracked to a single terminal outcome before job tracking proceeds.
    ///
    /// # Errors
    ///
    /// Any validation, capability, transport, HTTP, job or timeout failure
    /// of the workflow, carrying the exact operator-facing message.
    pub async fn execute(
        &self,
        ctx: &StorageContext,
        task: &VolumeTask,
    ) -> Result<OperationResult, Error<C>> {
        if let Err(msg) = task.options.ensure_valid() {
            return Err(Error::InvalidInput(msg.to_string()));
        }

        // Apply-time negotiation only concerns controller-addressed writes;
        // it must run before submission so an unsupported request fails
        // without side effects.
        let apply_time = match &task.operation {
            Operation::Present(spec) => match &spec.controller_id {
                Some(controller_id) => {
                    self.resolve_apply_time(ctx, controller_id, spec.apply_time.as_ref())
                        .await?
                }
                None => None,
            },
            _ => None,
        };
        let reboot_needed = reboot_required(apply_time.as_ref(), &task.options);

        let (mut result, action) = self.dispatch(ctx, task).await?;
        if task.check_mode {
            return Ok(result);
        }

        if reboot_needed {
            self.perform_reboot(ctx, &task.options).await?;
        }

        if job_tracking_required(apply_time.as_ref(), &task.options, reboot_needed) {
            if let Some(handle) = result.task.clone() {
                let tracker = self.job_tracker(task.options.job_wait_timeout);
                let (msg, _job) = tracker
                    .track(
                        self.client(),
                        &handle.uri,
                        task.options.job_wait,
                        action.verb(),
                    )
                    .await?;
                result.msg = msg;
            }
        }

        Ok(result)
    }
}
