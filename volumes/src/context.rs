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

//! Discovery of the storage collection for the target system.

use crate::error::ensure_success;
use crate::error::Error;
use crate::schema::ComputerSystem;
use crate::schema::SystemCollection;
use redstor_core::ODataId;
use redstor_core::RedfishClient;

pub(crate) const STORAGE_NOT_SUPPORTED_MSG: &str =
    "Target out-of-band controller does not support storage feature using Redfish API.";

/// Addressing context for one target system.
///
/// Produced once per invocation by [`StorageContext::discover`] and threaded
/// explicitly through every subsequent call; nothing here is process-global
/// state.
#[derive(Debug, Clone)]
pub struct StorageContext {
    system: ODataId,
    storage_base: ODataId,
    reset_target: ODataId,
}

impl StorageContext {
    /// Assemble a context from known paths.
    #[must_use]
    pub const fn new(system: ODataId, storage_base: ODataId, reset_target: ODataId) -> Self {
        Self {
            system,
            storage_base,
            reset_target,
        }
    }

    /// Locate the storage collection of the first system behind the
    /// service root, along with the system's reset action target.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedOperation` when the controller exposes no
    /// system or no storage collection. Transport and HTTP errors propagate
    /// unmodified.
    pub async fn discover<C: RedfishClient>(client: &C) -> Result<Self, Error<C>> {
        let systems_id = ODataId::service_root().join("Systems");
        let resp = ensure_success(client.get(&systems_id).await.map_err(Error::Client)?)?;
        let systems: SystemCollection = resp.parse().map_err(Error::Json)?;
        let system_id = match systems.members.first() {
            Some(member) => member.id.clone(),
            None => {
                return Err(Error::UnsupportedOperation(
                    STORAGE_NOT_SUPPORTED_MSG.to_string(),
                ))
            }
        };

        let resp = ensure_success(client.get(&system_id).await.map_err(Error::Client)?)?;
        let system: ComputerSystem = resp.parse().map_err(Error::Json)?;
        let storage_base = match system.storage {
            Some(storage) => storage.id,
            None => {
                return Err(Error::UnsupportedOperation(
                    STORAGE_NOT_SUPPORTED_MSG.to_string(),
                ))
            }
        };
        let reset_target = system
            .actions
            .and_then(|actions| actions.reset)
            .map(|reset| reset.target)
            .unwrap_or_else(|| system_id.join("Actions").join("ComputerSystem.Reset"));

        tracing::debug!(storage_base = %storage_base, "discovered storage collection");
        Ok(Self {
            system: system_id,
            storage_base,
            reset_target,
        })
    }

    /// The discovered system resource.
    #[must_use]
    pub fn system(&self) -> &ODataId {
        &self.system
    }

    /// The system's storage collection.
    #[must_use]
    pub fn storage_base(&self) -> &ODataId {
        &self.storage_base
    }

    pub(crate) fn reset_target(&self) -> &ODataId {
        &self.reset_target
    }

    /// `{storage_base}/{controller_id}` — a storage controller resource.
    #[must_use]
    pub fn controller_uri(&self, controller_id: &str) -> ODataId {
        self.storage_base.join(controller_id)
    }

    /// The volumes collection of a controller.
    #[must_use]
    pub fn volumes_uri(&self, controller_id: &str) -> ODataId {
        self.controller_uri(controller_id).join("Volumes")
    }

    /// A volume addressed flat under the storage base, the way iDRAC-class
    /// controllers expose volume ids.
    #[must_use]
    pub fn volume_uri(&self, volume_id: &str) -> ODataId {
        self.storage_base.join("Volumes").join(volume_id)
    }

    pub(crate) fn initialize_uri(&self, volume_id: &str) -> ODataId {
        self.volume_uri(volume_id)
            .join("Actions")
            .join("Volume.Initialize")
    }
}
