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

//! User-facing request model for volume tasks.
//!
//! A [`VolumeTask`] pairs an [`Operation`] — the tagged variant carries its
//! own required fields — with the caller's [`TaskOptions`] and check-mode
//! flag.

use crate::schema::ApplyTime;
use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use std::str::FromStr;

pub(crate) const NEGATIVE_TIMEOUT_MSG: &str =
    "The parameter job_wait_timeout value cannot be negative or zero.";

/// RAID level of a volume, in Redfish wire spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RaidType {
    RAID0,
    RAID1,
    RAID5,
    RAID6,
    RAID10,
    RAID50,
    RAID60,
}

impl RaidType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RAID0 => "RAID0",
            Self::RAID1 => "RAID1",
            Self::RAID5 => "RAID5",
            Self::RAID6 => "RAID6",
            Self::RAID10 => "RAID10",
            Self::RAID50 => "RAID50",
            Self::RAID60 => "RAID60",
        }
    }
}

impl Display for RaidType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for RaidType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RAID0" => Ok(Self::RAID0),
            "RAID1" => Ok(Self::RAID1),
            "RAID5" => Ok(Self::RAID5),
            "RAID6" => Ok(Self::RAID6),
            "RAID10" => Ok(Self::RAID10),
            "RAID50" => Ok(Self::RAID50),
            "RAID60" => Ok(Self::RAID60),
            _ => Err(format!(
                "invalid RAID type '{s}', expected one of RAID0, RAID1, RAID5, RAID6, RAID10, RAID50, RAID60"
            )),
        }
    }
}

/// Legacy volume type; each value implies a RAID level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeType {
    NonRedundant,
    Mirrored,
    StripedWithParity,
    SpannedMirrors,
    SpannedStripesWithParity,
}

impl VolumeType {
    /// The RAID level this volume type maps to.
    #[must_use]
    pub const fn raid_type(self) -> RaidType {
        match self {
            Self::NonRedundant => RaidType::RAID0,
            Self::Mirrored => RaidType::RAID1,
            Self::StripedWithParity => RaidType::RAID5,
            Self::SpannedMirrors => RaidType::RAID10,
            Self::SpannedStripesWithParity => RaidType::RAID50,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NonRedundant => "NonRedundant",
            Self::Mirrored => "Mirrored",
            Self::StripedWithParity => "StripedWithParity",
            Self::SpannedMirrors => "SpannedMirrors",
            Self::SpannedStripesWithParity => "SpannedStripesWithParity",
        }
    }
}

impl Display for VolumeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for VolumeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NonRedundant" => Ok(Self::NonRedundant),
            "Mirrored" => Ok(Self::Mirrored),
            "StripedWithParity" => Ok(Self::StripedWithParity),
            "SpannedMirrors" => Ok(Self::SpannedMirrors),
            "SpannedStripesWithParity" => Ok(Self::SpannedStripesWithParity),
            _ => Err(format!("invalid volume type '{s}'")),
        }
    }
}

/// Volume encryption capability requested for the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EncryptionType {
    NativeDriveEncryption,
    ControllerAssisted,
    SoftwareAssisted,
}

impl EncryptionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NativeDriveEncryption => "NativeDriveEncryption",
            Self::ControllerAssisted => "ControllerAssisted",
            Self::SoftwareAssisted => "SoftwareAssisted",
        }
    }
}

impl Display for EncryptionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncryptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NativeDriveEncryption" => Ok(Self::NativeDriveEncryption),
            "ControllerAssisted" => Ok(Self::ControllerAssisted),
            "SoftwareAssisted" => Ok(Self::SoftwareAssisted),
            _ => Err(format!("invalid encryption type '{s}'")),
        }
    }
}

/// How a volume initialization runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InitializeType {
    Fast,
    Slow,
}

impl Default for InitializeType {
    fn default() -> Self {
        Self::Fast
    }
}

impl InitializeType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "Fast",
            Self::Slow => "Slow",
        }
    }
}

impl Display for InitializeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for InitializeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fast" => Ok(Self::Fast),
            "Slow" => Ok(Self::Slow),
            _ => Err(format!("invalid initialize type '{s}', expected Fast or Slow")),
        }
    }
}

/// Parameters for creating or modifying a volume. Unset options are left
/// out of the submitted payload.
#[derive(Debug, Clone, Default)]
pub struct VolumeSpec {
    pub name: Option<String>,
    pub raid_type: Option<RaidType>,
    /// Legacy volume type; used to infer the RAID level when `raid_type`
    /// is not given.
    pub volume_type: Option<VolumeType>,
    /// Controller addressed on create.
    pub controller_id: Option<String>,
    /// Existing volume addressed on modify.
    pub volume_id: Option<String>,
    /// Drive ids that back the volume.
    pub drives: Vec<String>,
    pub block_size_bytes: Option<u64>,
    pub capacity_bytes: Option<u64>,
    pub optimum_io_size_bytes: Option<u64>,
    pub encrypted: Option<bool>,
    pub encryption_types: Option<EncryptionType>,
    /// Requested apply time; validated against what the controller
    /// advertises before submission.
    pub apply_time: Option<ApplyTime>,
    /// Vendor extension object passed through at the payload top level.
    pub oem: Map<String, Value>,
}

impl VolumeSpec {
    /// Explicit RAID type, or the one the volume type implies.
    #[must_use]
    pub fn effective_raid_type(&self) -> Option<RaidType> {
        self.raid_type
            .or_else(|| self.volume_type.map(VolumeType::raid_type))
    }
}

/// The requested operation. Each variant carries its own required-field
/// contract.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Ensure the volume exists: create under a controller, or modify when
    /// addressed by volume id.
    Present(VolumeSpec),
    /// Delete the volume.
    Delete { volume_id: Option<String> },
    /// Start initialization of the volume.
    Initialize {
        volume_id: Option<String>,
        initialize_type: InitializeType,
    },
}

/// Caller knobs for reboot handling and job tracking.
#[derive(Debug, Clone)]
pub struct TaskOptions {
    /// Reboot the host when the change applies on reset.
    pub reboot_server: bool,
    /// Escalate to a forced reset when the graceful reboot job fails or
    /// times out.
    pub force_reboot: bool,
    /// Wait for the submitted task to reach a terminal state.
    pub job_wait: bool,
    /// Seconds to wait for the task before giving up.
    pub job_wait_timeout: i64,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            reboot_server: false,
            force_reboot: false,
            job_wait: true,
            job_wait_timeout: 1200,
        }
    }
}

impl TaskOptions {
    /// Reject a non-positive wait budget before any request is issued.
    pub fn ensure_valid(&self) -> Result<(), &'static str> {
        if self.job_wait && self.job_wait_timeout <= 0 {
            Err(NEGATIVE_TIMEOUT_MSG)
        } else {
            Ok(())
        }
    }
}

/// One volume task: what to do, how to handle reboot/tracking, and whether
/// this is a dry run.
#[derive(Debug, Clone)]
pub struct VolumeTask {
    pub operation: Operation,
    pub options: TaskOptions,
    /// Dry run: report the intended effect, perform no write.
    pub check_mode: bool,
}
