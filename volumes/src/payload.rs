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

//! Mapping from user parameters to the Redfish volume schema.

use crate::params::EncryptionType;
use crate::params::RaidType;
use crate::params::VolumeSpec;
use crate::schema::ApplyTime;
use crate::schema::ODataRef;
use crate::schema::Volume;
use redstor_core::ODataId;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Volume resource payload, POSTed on create and PATCHed on modify.
/// Options the user did not set are omitted from the serialized body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolumePayload {
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "RAIDType", skip_serializing_if = "Option::is_none")]
    pub raid_type: Option<RaidType>,
    #[serde(rename = "BlockSizeBytes", skip_serializing_if = "Option::is_none")]
    pub block_size_bytes: Option<u64>,
    #[serde(rename = "CapacityBytes", skip_serializing_if = "Option::is_none")]
    pub capacity_bytes: Option<u64>,
    #[serde(rename = "OptimumIOSizeBytes", skip_serializing_if = "Option::is_none")]
    pub optimum_io_size_bytes: Option<u64>,
    #[serde(rename = "Encrypted", skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<bool>,
    #[serde(rename = "EncryptionTypes", skip_serializing_if = "Option::is_none")]
    pub encryption_types: Option<Vec<EncryptionType>>,
    #[serde(rename = "Drives", skip_serializing_if = "Option::is_none")]
    pub drives: Option<Vec<ODataRef>>,
    #[serde(
        rename = "@Redfish.OperationApplyTime",
        skip_serializing_if = "Option::is_none"
    )]
    pub apply_time: Option<ApplyTime>,
    /// Vendor extension keys, flattened into the top level of the payload.
    #[serde(flatten)]
    pub oem: Map<String, Value>,
}

impl VolumePayload {
    /// Build the payload from a spec. Drive ids are expanded to references
    /// under `{storage_base}/Drives`; a single encryption type is wrapped
    /// in the list the schema expects.
    #[must_use]
    pub fn from_spec(spec: &VolumeSpec, storage_base: &ODataId) -> Self {
        let drives = if spec.drives.is_empty() {
            None
        } else {
            let drives_base = storage_base.join("Drives");
            Some(
                spec.drives
                    .iter()
                    .map(|drive| ODataRef {
                        id: drives_base.join(drive),
                    })
                    .collect(),
            )
        };

        Self {
            name: spec.name.clone(),
            raid_type: spec.effective_raid_type(),
            block_size_bytes: spec.block_size_bytes,
            capacity_bytes: spec.capacity_bytes,
            optimum_io_size_bytes: spec.optimum_io_size_bytes,
            encrypted: spec.encrypted,
            encryption_types: spec.encryption_types.map(|e| vec![e]),
            drives,
            apply_time: spec.apply_time.clone(),
            oem: spec.oem.clone(),
        }
    }

    /// True when no option is present at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.raid_type.is_none()
            && self.block_size_bytes.is_none()
            && self.capacity_bytes.is_none()
            && self.optimum_io_size_bytes.is_none()
            && self.encrypted.is_none()
            && self.encryption_types.is_none()
            && self.drives.is_none()
            && self.apply_time.is_none()
            && self.oem.is_empty()
    }

    /// Compare the requested options against an existing volume; options
    /// that were not requested do not participate. Drive sets are compared
    /// by drive id, order-insensitively.
    #[must_use]
    pub fn matches_existing(&self, existing: &Volume) -> bool {
        if let Some(name) = &self.name {
            if existing.name.as_ref() != Some(name) {
                return false;
            }
        }
        if let Some(raid_type) = self.raid_type {
            if existing.raid_type.as_deref() != Some(raid_type.as_str()) {
                return false;
            }
        }
        if let Some(block_size_bytes) = self.block_size_bytes {
            if existing.block_size_bytes != Some(block_size_bytes) {
                return false;
            }
        }
        if let Some(capacity_bytes) = self.capacity_bytes {
            if existing.capacity_bytes != Some(capacity_bytes) {
                return false;
            }
        }
        if let Some(optimum_io_size_bytes) = self.optimum_io_size_bytes {
            if existing.optimum_io_size_bytes != Some(optimum_io_size_bytes) {
                return false;
            }
        }
        if let Some(encrypted) = self.encrypted {
            if existing.encrypted != Some(encrypted) {
                return false;
            }
        }
        if let Some(encryption_types) = &self.encryption_types {
            let requested: Vec<&str> = encryption_types.iter().map(|e| e.as_str()).collect();
            let present: Vec<&str> = existing
                .encryption_types
                .iter()
                .map(String::as_str)
                .collect();
            if requested != present {
                return false;
            }
        }
        if let Some(drives) = &self.drives {
            let mut requested: Vec<&str> =
                drives.iter().filter_map(|r| r.id.last_segment()).collect();
            let mut present: Vec<&str> = existing
                .links
                .as_ref()
                .map(|links| {
                    links
                        .drives
                        .iter()
                        .filter_map(|r| r.id.last_segment())
                        .collect()
                })
                .unwrap_or_default();
            requested.sort_unstable();
            present.sort_unstable();
            if requested != present {
                return false;
            }
        }
        true
    }
}
