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

//! Operation dispatch and per-operation validators.
//!
//! Each operation validates its own required fields, checks the live state
//! it depends on (controller, drives, existing volume, in-progress jobs)
//! and submits exactly one write. In check mode the intended effect is
//! reported and nothing is written.

use crate::capability::check_raid_type_supported;
use crate::context::StorageContext;
use crate::error::ensure_success;
use crate::error::Error;
use crate::manager::OperationResult;
use crate::manager::TaskHandle;
use crate::manager::VolumeManager;
use crate::params::InitializeType;
use crate::params::Operation;
use crate::params::VolumeSpec;
use crate::params::VolumeTask;
use crate::payload::VolumePayload;
use crate::schema::Storage;
use crate::schema::Volume;
use crate::schema::VolumeCollection;
use crate::schema::VolumeOperation;
use http::StatusCode;
use redstor_core::ODataId;
use redstor_core::RedfishClient;
use redstor_core::Response;
use serde::Serialize;

pub(crate) const PRESENT_REQUIRES_ID_MSG: &str =
    "When state is present, either controller_id or volume_id must be specified to perform further actions.";
pub(crate) const MODIFY_INPUT_MSG: &str =
    "Input options are not provided for the modify volume task.";
pub(crate) const DELETE_REQUIRES_VOLUME_ID_MSG: &str =
    "'volume_id' option is a required property for deleting a volume.";
pub(crate) const INITIALIZE_REQUIRES_VOLUME_ID_MSG: &str =
    "'volume_id' option is a required property for initializing a volume.";
pub(crate) const CHANGES_FOUND_MSG: &str = "Changes found to be applied.";
pub(crate) const NO_CHANGES_FOUND_MSG: &str = "No changes found to be applied.";
pub(crate) const CONFIGURATION_JOB_EXISTS_MSG: &str =
    "Cannot perform the configuration operations because a configuration job for the device already exists.";

const EXPAND_MEMBERS_QUERY: &str = "?$expand=*($levels=1)";

fn volume_missing_message(volume_id: &str) -> String {
    format!("Specified Volume Id {volume_id} does not exist in the System.")
}

fn controller_missing_message(controller_id: &str) -> String {
    format!("Specified Controller {controller_id} does not exist in the System.")
}

fn controller_fetch_failed_message(controller_id: &str) -> String {
    format!("Failed to retrieve the details of the specified Controller Id {controller_id}.")
}

fn drives_not_attached_message(missing: &[&str], controller_id: &str) -> String {
    format!(
        "Following Drive(s) {} are not attached to the specified Controller Id: {}.",
        missing.join(","),
        controller_id
    )
}

fn no_drives_attached_message(controller_id: &str) -> String {
    format!("No Drive(s) are attached to the specified Controller Id: {controller_id}.")
}

fn initialization_in_progress_message(operation_name: &str, percentage: u8) -> String {
    format!(
        "Cannot perform the configuration operation because the configuration job '{operation_name}' in progress is at '{percentage}' percentage."
    )
}

/// Which write a dispatched operation performed; drives result phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VolumeAction {
    Create,
    Modify,
    Delete,
    Initialize,
}

impl VolumeAction {
    /// Label used in the submission message.
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Delete => "delete",
            Self::Initialize => "initialize",
        }
    }

    /// Verb used in the job-failure message.
    pub(crate) const fn verb(self) -> &'static str {
        match self {
            Self::Create => "creating",
            Self::Modify => "modifying",
            Self::Delete => "deleting",
            Self::Initialize => "initializing",
        }
    }
}

fn submitted_result(action: VolumeAction, location: Option<&ODataId>) -> OperationResult {
    let task = location.map(|uri| TaskHandle {
        id: uri.last_segment().unwrap_or_default().to_string(),
        uri: uri.clone(),
    });
    OperationResult {
        msg: format!("Successfully submitted {} volume task.", action.as_str()),
        task,
        changed: true,
    }
}

fn changes_found() -> OperationResult {
    OperationResult {
        msg: CHANGES_FOUND_MSG.to_string(),
        task: None,
        changed: true,
    }
}

fn no_changes_found() -> OperationResult {
    OperationResult {
        msg: NO_CHANGES_FOUND_MSG.to_string(),
        task: None,
        changed: false,
    }
}

/// Every requested drive must be attached to the addressed controller.
fn check_physical_disk_exists<C: RedfishClient>(
    requested: &[String],
    controller: &Storage,
    controller_id: &str,
) -> Result<(), Error<C>> {
    if requested.is_empty() {
        return Ok(());
    }
    if controller.drives.is_empty() {
        return Err(Error::InvalidInput(no_drives_attached_message(
            controller_id,
        )));
    }
    let attached: Vec<&str> = controller
        .drives
        .iter()
        .filter_map(|r| r.id.last_segment())
        .collect();
    let missing: Vec<&str> = requested
        .iter()
        .map(String::as_str)
        .filter(|drive| !attached.contains(drive))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidInput(drives_not_attached_message(
            &missing,
            controller_id,
        )))
    }
}

#[derive(Debug, Serialize)]
struct InitializeRequest {
    #[serde(rename = "InitializeType")]
    initialize_type: InitializeType,
}

impl<C: RedfishClient> VolumeManager<C> {
    pub(crate) async fn dispatch(
        &self,
        ctx: &StorageContext,
        task: &VolumeTask,
    ) -> Result<(OperationResult, VolumeAction), Error<C>> {
        match &task.operation {
            Operation::Present(spec) => {
                self.perform_volume_create_modify(ctx, spec, task.check_mode)
                    .await
            }
            Operation::Delete { volume_id } => Ok((
                self.perform_volume_deletion(ctx, volume_id.as_deref(), task.check_mode)
                    .await?,
                VolumeAction::Delete,
            )),
            Operation::Initialize {
                volume_id,
                initialize_type,
            } => Ok((
                self.perform_volume_initialization(
                    ctx,
                    volume_id.as_deref(),
                    *initialize_type,
                    task.check_mode,
                )
                .await?,
                VolumeAction::Initialize,
            )),
        }
    }

    async fn get(&self, id: &ODataId) -> Result<Response, Error<C>> {
        self.client().get(id).await.map_err(Error::Client)
    }

    /// GET a resource that must exist: 404 becomes `missing`, any other
    /// error status propagates as an HTTP error.
    async fn fetch_existing(&self, uri: &ODataId, missing: String) -> Result<Response, Error<C>> {
        let resp = self.get(uri).await?;
        if resp.success() {
            Ok(resp)
        } else if resp.status() == StatusCode::NOT_FOUND {
            Err(Error::InvalidInput(missing))
        } else {
            Err(Error::http(&resp))
        }
    }

    async fn perform_volume_create_modify(
        &self,
        ctx: &StorageContext,
        spec: &VolumeSpec,
        check_mode: bool,
    ) -> Result<(OperationResult, VolumeAction), Error<C>> {
        match (&spec.volume_id, &spec.controller_id) {
            (Some(volume_id), _) => Ok((
                self.modify_volume(ctx, spec, volume_id, check_mode).await?,
                VolumeAction::Modify,
            )),
            (None, Some(controller_id)) => Ok((
                self.create_volume(ctx, spec, controller_id, check_mode)
                    .await?,
                VolumeAction::Create,
            )),
            (None, None) => Err(Error::InvalidInput(PRESENT_REQUIRES_ID_MSG.to_string())),
        }
    }

    async fn modify_volume(
        &self,
        ctx: &StorageContext,
        spec: &VolumeSpec,
        volume_id: &str,
        check_mode: bool,
    ) -> Result<OperationResult, Error<C>> {
        let uri = ctx.volume_uri(volume_id);
        self.fetch_existing(&uri, volume_missing_message(volume_id))
            .await?;

        let payload = VolumePayload::from_spec(spec, ctx.storage_base());
        if payload.is_empty() {
            return Err(Error::InvalidInput(MODIFY_INPUT_MSG.to_string()));
        }
        if check_mode {
            return Ok(changes_found());
        }

        tracing::debug!(volume = volume_id, "submitting volume modify");
        let resp = self
            .client()
            .patch(&uri, &payload)
            .await
            .map_err(Error::Client)?;
        let resp = ensure_success(resp)?;
        Ok(submitted_result(VolumeAction::Modify, resp.location()))
    }

    async fn create_volume(
        &self,
        ctx: &StorageContext,
        spec: &VolumeSpec,
        controller_id: &str,
        check_mode: bool,
    ) -> Result<OperationResult, Error<C>> {
        let controller = self.fetch_controller(ctx, controller_id).await?;
        check_physical_disk_exists::<C>(&spec.drives, &controller, controller_id)?;
        check_raid_type_supported::<C>(spec, &controller)?;

        let payload = VolumePayload::from_spec(spec, ctx.storage_base());
        let volumes_uri = ctx.volumes_uri(controller_id);
        if let Some(result) = self
            .check_mode_validation(spec, &payload, &volumes_uri, check_mode)
            .await?
        {
            return Ok(result);
        }

        tracing::debug!(controller = controller_id, "submitting volume create");
        let resp = self
            .client()
            .post(&volumes_uri, &payload)
            .await
            .map_err(Error::Client)?;
        let resp = ensure_success(resp)?;
        Ok(submitted_result(VolumeAction::Create, resp.location()))
    }

    /// One snapshot of the controller serves drive validation and the RAID
    /// capability check.
    async fn fetch_controller(
        &self,
        ctx: &StorageContext,
        controller_id: &str,
    ) -> Result<Storage, Error<C>> {
        let resp = self.get(&ctx.controller_uri(controller_id)).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(Error::InvalidInput(controller_missing_message(
                controller_id,
            )));
        }
        if !resp.success() {
            return Err(Error::OperationFailed(controller_fetch_failed_message(
                controller_id,
            )));
        }
        resp.parse().map_err(Error::Json)
    }

    /// Compare the computed payload against the expanded volumes
    /// collection. Returns the final result when the flow should stop
    /// here: in check mode always, and outside check mode when an
    /// identical volume already exists (an idempotent no-op).
    async fn check_mode_validation(
        &self,
        spec: &VolumeSpec,
        payload: &VolumePayload,
        volumes_uri: &ODataId,
        check_mode: bool,
    ) -> Result<Option<OperationResult>, Error<C>> {
        if spec.name.is_none() {
            // Nothing to compare against by name; a write would happen.
            return Ok(if check_mode {
                Some(changes_found())
            } else {
                None
            });
        }

        let expanded = ODataId::from(format!("{volumes_uri}{EXPAND_MEMBERS_QUERY}"));
        let resp = ensure_success(self.get(&expanded).await?)?;
        let collection: VolumeCollection = resp.parse().map_err(Error::Json)?;
        let existing = collection
            .members
            .iter()
            .find(|member| member.name == spec.name);

        match existing {
            Some(volume) if payload.matches_existing(volume) => Ok(Some(no_changes_found())),
            _ if check_mode => Ok(Some(changes_found())),
            _ => Ok(None),
        }
    }

    async fn perform_volume_deletion(
        &self,
        ctx: &StorageContext,
        volume_id: Option<&str>,
        check_mode: bool,
    ) -> Result<OperationResult, Error<C>> {
        let volume_id = match volume_id {
            Some(volume_id) => volume_id,
            None => {
                return Err(Error::MissingParameter(
                    DELETE_REQUIRES_VOLUME_ID_MSG.to_string(),
                ))
            }
        };
        let uri = ctx.volume_uri(volume_id);

        if check_mode {
            let resp = self.get(&uri).await?;
            if resp.success() {
                return Ok(changes_found());
            }
            if resp.status() == StatusCode::NOT_FOUND {
                return Ok(no_changes_found());
            }
            return Err(Error::http(&resp));
        }

        self.fetch_existing(&uri, volume_missing_message(volume_id))
            .await?;
        tracing::debug!(volume = volume_id, "submitting volume delete");
        let resp = self.client().delete(&uri).await.map_err(Error::Client)?;
        let resp = ensure_success(resp)?;
        Ok(submitted_result(VolumeAction::Delete, resp.location()))
    }

    async fn perform_volume_initialization(
        &self,
        ctx: &StorageContext,
        volume_id: Option<&str>,
        initialize_type: InitializeType,
        check_mode: bool,
    ) -> Result<OperationResult, Error<C>> {
        let volume_id = match volume_id {
            Some(volume_id) => volume_id,
            None => {
                return Err(Error::MissingParameter(
                    INITIALIZE_REQUIRES_VOLUME_ID_MSG.to_string(),
                ))
            }
        };

        let operations = self.check_initialization_progress(ctx, volume_id).await?;
        if let Some(operation) = operations.first() {
            let msg = match (&operation.operation_name, operation.percentage_complete) {
                (Some(name), Some(percentage)) => {
                    initialization_in_progress_message(name, percentage)
                }
                _ => CONFIGURATION_JOB_EXISTS_MSG.to_string(),
            };
            return Err(Error::ResourceBusy(msg));
        }

        if check_mode {
            return Ok(changes_found());
        }

        tracing::debug!(
            volume = volume_id,
            ?initialize_type,
            "submitting volume initialize"
        );
        let resp = self
            .client()
            .post(
                &ctx.initialize_uri(volume_id),
                &InitializeRequest { initialize_type },
            )
            .await
            .map_err(Error::Client)?;
        let resp = ensure_success(resp)?;
        Ok(submitted_result(VolumeAction::Initialize, resp.location()))
    }

    /// Operations already running on the volume. An unreadable volume
    /// reports nothing in progress; the write will surface the real
    /// failure.
    async fn check_initialization_progress(
        &self,
        ctx: &StorageContext,
        volume_id: &str,
    ) -> Result<Vec<VolumeOperation>, Error<C>> {
        let resp = self.get(&ctx.volume_uri(volume_id)).await?;
        if !resp.success() {
            return Ok(Vec::new());
        }
        let volume: Volume = resp.parse().map_err(Error::Json)?;
        Ok(volume.operations)
    }
}
