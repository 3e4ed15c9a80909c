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

//! Shapes of the Redfish resources this crate consumes.
//!
//! Only the properties the workflow reads are modelled; everything else in
//! a response is ignored. Enumerations that carry vendor-specific strings
//! on the wire ([`JobState`], [`ApplyTime`]) preserve unknown values
//! instead of failing deserialization.

use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use redstor_core::ODataId;
use serde::Deserialize;
use serde::Serialize;
use std::str::FromStr;

/// Reference to another resource by `@odata.id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ODataRef {
    #[serde(rename = "@odata.id")]
    pub id: ODataId,
}

/// `/redfish/v1/Systems` collection.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemCollection {
    #[serde(rename = "Members", default)]
    pub members: Vec<ODataRef>,
}

/// The subset of `ComputerSystem` the workflow needs: the storage link and
/// the reset action target.
#[derive(Debug, Clone, Deserialize)]
pub struct ComputerSystem {
    #[serde(rename = "Storage")]
    pub storage: Option<ODataRef>,
    #[serde(rename = "Actions")]
    pub actions: Option<SystemActions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemActions {
    #[serde(rename = "#ComputerSystem.Reset")]
    pub reset: Option<ResetActionInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetActionInfo {
    #[serde(rename = "target")]
    pub target: ODataId,
}

/// A storage (controller) resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
    #[serde(rename = "StorageControllers", default)]
    pub storage_controllers: Vec<StorageController>,
    #[serde(rename = "Drives", default)]
    pub drives: Vec<ODataRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageController {
    #[serde(rename = "SupportedRAIDTypes", default)]
    pub supported_raid_types: Vec<String>,
}

/// A volumes collection, possibly `$expand`ed so members carry their
/// fields inline.
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeCollection {
    #[serde(rename = "Members@odata.count")]
    pub members_count: Option<u64>,
    #[serde(rename = "Members", default)]
    pub members: Vec<Volume>,
    #[serde(rename = "@Redfish.OperationApplyTimeSupport")]
    pub apply_time_support: Option<OperationApplyTimeSupport>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationApplyTimeSupport {
    #[serde(rename = "SupportedValues", default)]
    pub supported_values: Vec<String>,
}

/// A volume resource. Every field is optional so the same shape covers
/// both plain member references and expanded members.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Volume {
    #[serde(rename = "@odata.id")]
    pub odata_id: Option<ODataId>,
    #[serde(rename = "Id")]
    pub id: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "BlockSizeBytes")]
    pub block_size_bytes: Option<u64>,
    #[serde(rename = "CapacityBytes")]
    pub capacity_bytes: Option<u64>,
    #[serde(rename = "Encrypted")]
    pub encrypted: Option<bool>,
    #[serde(rename = "EncryptionTypes", default)]
    pub encryption_types: Vec<String>,
    #[serde(rename = "OptimumIOSizeBytes")]
    pub optimum_io_size_bytes: Option<u64>,
    #[serde(rename = "RAIDType")]
    pub raid_type: Option<String>,
    #[serde(rename = "Operations", default)]
    pub operations: Vec<VolumeOperation>,
    #[serde(rename = "Links")]
    pub links: Option<VolumeLinks>,
}

/// An in-progress operation reported on a volume.
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeOperation {
    #[serde(rename = "OperationName")]
    pub operation_name: Option<String>,
    #[serde(rename = "PercentageComplete")]
    pub percentage_complete: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolumeLinks {
    #[serde(rename = "Drives", default)]
    pub drives: Vec<ODataRef>,
}

/// An asynchronous job resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    #[serde(rename = "Id")]
    pub id: Option<String>,
    #[serde(rename = "JobState")]
    pub job_state: Option<JobState>,
    #[serde(rename = "PercentComplete")]
    pub percent_complete: Option<u8>,
}

impl Job {
    #[must_use]
    pub fn state(&self) -> Option<&JobState> {
        self.job_state.as_ref()
    }

    /// Terminal and successful.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.job_state
            .as_ref()
            .map(JobState::is_success)
            .unwrap_or(false)
    }
}

/// `JobState` as reported by the controller. Vendors report states beyond
/// the standard set; those survive as [`JobState::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum JobState {
    New,
    Scheduled,
    Running,
    Completed,
    Success,
    Failed,
    Other(String),
}

impl JobState {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "New",
            Self::Scheduled => "Scheduled",
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Other(s) => s,
        }
    }

    /// The job will not change state anymore.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Success | Self::Failed)
    }

    /// Terminal success. `Completed` and `Success` are distinct labels on
    /// the wire but both mean the job finished cleanly.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed | Self::Success)
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl From<String> for JobState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "New" => Self::New,
            "Scheduled" => Self::Scheduled,
            "Running" => Self::Running,
            "Completed" => Self::Completed,
            "Success" => Self::Success,
            "Failed" => Self::Failed,
            _ => Self::Other(s),
        }
    }
}

impl Display for JobState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// When a configuration change takes effect: right away, or at the next
/// host reset. Vendor-specific values survive as [`ApplyTime::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplyTime {
    Immediate,
    OnReset,
    Other(String),
}

impl ApplyTime {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Immediate => "Immediate",
            Self::OnReset => "OnReset",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ApplyTime {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Immediate" => Self::Immediate,
            "OnReset" => Self::OnReset,
            _ => Self::Other(s),
        }
    }
}

impl From<ApplyTime> for String {
    fn from(apply_time: ApplyTime) -> Self {
        match apply_time {
            ApplyTime::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl Display for ApplyTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplyTime {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}
