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

//! Apply-time and reboot coordination.
//!
//! A change resolved to `OnReset` only takes effect at the next host
//! reboot. When the caller allows it, the coordinator triggers that reboot
//! through the system reset action and follows the reboot job to a single
//! terminal outcome before job tracking proceeds. An `OnReset` change
//! without permission to reboot leaves the job pending server-side — that
//! is a quiet success, not an error.

use crate::context::StorageContext;
use crate::error::Error;
use crate::job::incomplete_message;
use crate::job::JobWait;
use crate::manager::VolumeManager;
use crate::params::TaskOptions;
use crate::schema::ApplyTime;
use redstor_core::ODataId;
use redstor_core::RedfishClient;
use serde::Serialize;

pub(crate) const REBOOT_FAILED_MSG: &str = "Failed to reboot the server.";

/// Reboot is needed exactly when the change waits for a reset and the
/// caller allowed one.
pub(crate) fn reboot_required(apply_time: Option<&ApplyTime>, options: &TaskOptions) -> bool {
    matches!(apply_time, Some(ApplyTime::OnReset)) && options.reboot_server
}

/// Tracking runs when the caller wants to wait and the job can actually
/// finish: either the change applied immediately, or the required reboot
/// was just carried out. An on-reset job with no reboot stays pending
/// server-side and is deliberately not waited on.
pub(crate) fn job_tracking_required(
    apply_time: Option<&ApplyTime>,
    options: &TaskOptions,
    reboot_performed: bool,
) -> bool {
    options.job_wait && (reboot_performed || !matches!(apply_time, Some(ApplyTime::OnReset)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
enum ResetType {
    GracefulRestart,
    ForceRestart,
}

#[derive(Debug, Serialize)]
struct ResetRequest {
    #[serde(rename = "ResetType")]
    reset_type: ResetType,
}

impl<C: RedfishClient> VolumeManager<C> {
    /// POST the system reset action. The job the controller schedules for
    /// the reset, if any, comes back in the `Location` header.
    async fn request_reset(
        &self,
        ctx: &StorageContext,
        reset_type: ResetType,
    ) -> Result<Option<ODataId>, Error<C>> {
        tracing::debug!(?reset_type, "requesting system reset");
        let resp = self
            .client()
            .post(ctx.reset_target(), &ResetRequest { reset_type })
            .await
            .map_err(Error::Client)?;
        if !resp.success() {
            return Err(Error::http(&resp));
        }
        Ok(resp.location().cloned())
    }

    /// Graceful reboot, escalating to a forced one when the caller allowed
    /// it and the graceful attempt failed or timed out.
    ///
    /// Returns false when the controller declined to schedule a reboot job
    /// — hardware that reset synchronously or does not track resets. That
    /// is "no action taken", not an error.
    pub(crate) async fn perform_reboot(
        &self,
        ctx: &StorageContext,
        options: &TaskOptions,
    ) -> Result<bool, Error<C>> {
        let job_uri = match self.request_reset(ctx, ResetType::GracefulRestart).await? {
            Some(uri) => uri,
            None => {
                tracing::debug!("controller did not schedule a reboot job");
                return Ok(false);
            }
        };

        match self.reboot_tracker().wait(self.client(), &job_uri).await {
            JobWait::Finished(job) if job.is_success() => Ok(true),
            JobWait::Finished(_) if options.force_reboot => {
                tracing::warn!("graceful reboot job failed; forcing");
                self.perform_force_reboot(ctx).await
            }
            JobWait::Finished(_) => Err(Error::OperationFailed(REBOOT_FAILED_MSG.to_string())),
            JobWait::TimedOut { .. } if options.force_reboot => {
                tracing::warn!("graceful reboot did not finish in time; forcing");
                self.perform_force_reboot(ctx).await
            }
            JobWait::TimedOut { waited_secs, .. } => {
                Err(Error::Timeout(incomplete_message(waited_secs)))
            }
        }
    }

    /// Immediate power-cycle, tracked to completion.
    pub(crate) async fn perform_force_reboot(
        &self,
        ctx: &StorageContext,
    ) -> Result<bool, Error<C>> {
        let job_uri = match self.request_reset(ctx, ResetType::ForceRestart).await? {
            Some(uri) => uri,
            None => {
                tracing::debug!("controller did not schedule a forced reboot job");
                return Ok(false);
            }
        };

        match self.reboot_tracker().wait(self.client(), &job_uri).await {
            JobWait::Finished(job) if job.is_success() => Ok(true),
            JobWait::Finished(_) => Err(Error::OperationFailed(REBOOT_FAILED_MSG.to_string())),
            JobWait::TimedOut { waited_secs, .. } => {
                Err(Error::Timeout(incomplete_message(waited_secs)))
            }
        }
    }
}
