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

//! Shared fixtures for the end-to-end workflow tests.

pub use redstor_bmc_mock::Client;
pub use redstor_bmc_mock::Expect;
pub use redstor_bmc_mock::Failure;
pub use redstor_bmc_mock::Reply;

use redstor_core::ODataId;
use redstor_volumes::StorageContext;
use redstor_volumes::VolumeManager;
use serde_json::json;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const SYSTEMS_URI: &str = "/redfish/v1/Systems";
pub const SYSTEM_URI: &str = "/redfish/v1/Systems/System.Embedded.1";
pub const STORAGE_BASE: &str = "/redfish/v1/Systems/System.Embedded.1/Storage";
pub const RESET_URI: &str = "/redfish/v1/Systems/System.Embedded.1/Actions/ComputerSystem.Reset";
pub const CONTROLLER_ID: &str = "RAID.Integrated.1-1";
pub const DRIVE_ID: &str = "Disk.Bay.0:Enclosure.Internal.0-0:RAID.Integrated.1-1";
pub const VOLUME_ID: &str = "Disk.Virtual.0:RAID.Integrated.1-1";
pub const JOB_ID: &str = "JID_123456789";
pub const JOB_URI: &str = "/redfish/v1/JobService/Jobs/JID_123456789";
pub const REBOOT_JOB_URI: &str = "/redfish/v1/JobService/Jobs/RID_987654321";

#[must_use]
pub fn controller_uri() -> String {
    format!("{STORAGE_BASE}/{CONTROLLER_ID}")
}

#[must_use]
pub fn volumes_uri() -> String {
    format!("{STORAGE_BASE}/{CONTROLLER_ID}/Volumes")
}

#[must_use]
pub fn expanded_volumes_uri() -> String {
    format!("{}?$expand=*($levels=1)", volumes_uri())
}

#[must_use]
pub fn volume_uri() -> String {
    format!("{STORAGE_BASE}/Volumes/{VOLUME_ID}")
}

#[must_use]
pub fn initialize_uri() -> String {
    format!("{}/Actions/Volume.Initialize", volume_uri())
}

#[must_use]
pub fn drive_ref() -> String {
    format!("{STORAGE_BASE}/Drives/{DRIVE_ID}")
}

/// The context discovery would produce, for tests that skip the discovery
/// exchange.
#[must_use]
pub fn context() -> StorageContext {
    StorageContext::new(
        ODataId::from(SYSTEM_URI),
        ODataId::from(STORAGE_BASE),
        ODataId::from(RESET_URI),
    )
}

/// Manager tuned for tests: millisecond polls, two-second reboot budget.
#[must_use]
pub fn manager(client: &Arc<Client>) -> VolumeManager<Client> {
    VolumeManager::new(Arc::clone(client))
        .with_poll_interval(Duration::from_millis(2))
        .with_reboot_timeout(Duration::from_secs(2))
}

/// Queue the discovery exchange: systems collection, then the system with
/// its storage link and reset action.
pub fn expect_discovery(client: &Client) {
    client.expect(Expect::get(
        SYSTEMS_URI,
        Reply::ok(json!({
            "Members": [{"@odata.id": SYSTEM_URI}]
        })),
    ));
    client.expect(Expect::get(
        SYSTEM_URI,
        Reply::ok(json!({
            "Storage": {"@odata.id": STORAGE_BASE},
            "Actions": {"#ComputerSystem.Reset": {"target": RESET_URI}}
        })),
    ));
}

/// Controller resource advertising the given RAID types, with the standard
/// test drive attached.
#[must_use]
pub fn controller_json(supported_raid_types: &[&str]) -> Value {
    json!({
        "StorageControllers": [{"SupportedRAIDTypes": supported_raid_types}],
        "Drives": [{"@odata.id": drive_ref()}]
    })
}

/// Volumes collection advertising the given apply times (or none at all).
#[must_use]
pub fn volumes_collection_json(supported_apply_times: Option<&[&str]>) -> Value {
    match supported_apply_times {
        Some(values) => json!({
            "Members": [],
            "@Redfish.OperationApplyTimeSupport": {"SupportedValues": values}
        }),
        None => json!({"Members": []}),
    }
}

#[must_use]
pub fn job_json(id: &str, state: &str) -> Value {
    json!({"Id": id, "JobState": state})
}
