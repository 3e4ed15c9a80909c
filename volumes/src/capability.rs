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

//! Controller capability checks: supported RAID types and operation apply
//! times.
//!
//! Capabilities are fetched fresh for every operation — they describe the
//! current hardware state and are never cached across operations.

use crate::context::StorageContext;
use crate::error::ensure_success;
use crate::error::Error;
use crate::manager::VolumeManager;
use crate::params::VolumeSpec;
use crate::schema::ApplyTime;
use crate::schema::Storage;
use crate::schema::VolumeCollection;
use redstor_core::RedfishClient;

/// Render a value list the way operators have always seen it in these
/// messages: `['OnReset']`.
pub(crate) fn value_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("'{v}'")).collect();
    format!("[{}]", quoted.join(", "))
}

pub(crate) fn unsupported_raid_type_message(raid_type: &str) -> String {
    format!("RAID Type {raid_type} is not supported.")
}

pub(crate) fn unsupported_apply_time_message(
    requested: &ApplyTime,
    supported: &[String],
) -> String {
    format!(
        "Apply time {} is not supported. The supported values are {}. Enter the valid values and retry the operation.",
        requested,
        value_list(supported)
    )
}

/// The requested RAID type (explicit or inferred from the volume type)
/// must be advertised by the controller.
pub(crate) fn check_raid_type_supported<C: RedfishClient>(
    spec: &VolumeSpec,
    controller: &Storage,
) -> Result<(), Error<C>> {
    let raid_type = match spec.effective_raid_type() {
        Some(raid_type) => raid_type,
        None => return Ok(()),
    };
    let supported = controller
        .storage_controllers
        .first()
        .map(|c| c.supported_raid_types.as_slice())
        .unwrap_or(&[]);
    if supported.iter().any(|s| s.as_str() == raid_type.as_str()) {
        Ok(())
    } else {
        Err(Error::UnsupportedOperation(unsupported_raid_type_message(
            raid_type.as_str(),
        )))
    }
}

impl<C: RedfishClient> VolumeManager<C> {
    /// Resolve the effective apply time for a controller-addressed write.
    ///
    /// Returns `None` when the controller advertises no apply-time support
    /// at all — negotiation is not applicable and the operation is treated
    /// as immediate. A requested value the controller does not list fails
    /// before anything is submitted; with no request, the controller's
    /// first advertised value is the default.
    pub(crate) async fn resolve_apply_time(
        &self,
        ctx: &StorageContext,
        controller_id: &str,
        requested: Option<&ApplyTime>,
    ) -> Result<Option<ApplyTime>, Error<C>> {
        let volumes_uri = ctx.volumes_uri(controller_id);
        let resp = ensure_success(self.client().get(&volumes_uri).await.map_err(Error::Client)?)?;
        let collection: VolumeCollection = resp.parse().map_err(Error::Json)?;
        let support = match collection.apply_time_support {
            Some(support) => support,
            None => return Ok(None),
        };
        match requested {
            Some(requested) => {
                if support
                    .supported_values
                    .iter()
                    .any(|v| v.as_str() == requested.as_str())
                {
                    Ok(Some(requested.clone()))
                } else {
                    Err(Error::UnsupportedOperation(unsupported_apply_time_message(
                        requested,
                        &support.supported_values,
                    )))
                }
            }
            None => Ok(support.supported_values.first().cloned().map(ApplyTime::from)),
        }
    }
}
