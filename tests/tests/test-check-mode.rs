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

use redstor_tests::context;
use redstor_tests::controller_json;
use redstor_tests::controller_uri;
use redstor_tests::drive_ref;
use redstor_tests::expanded_volumes_uri;
use redstor_tests::manager;
use redstor_tests::volume_uri;
use redstor_tests::volumes_collection_json;
use redstor_tests::volumes_uri;
use redstor_tests::Client;
use redstor_tests::Expect;
use redstor_tests::Reply;
use redstor_tests::CONTROLLER_ID;
use redstor_tests::DRIVE_ID;
use redstor_tests::VOLUME_ID;

use redstor_volumes::params::EncryptionType;
use redstor_volumes::params::Operation;
use redstor_volumes::params::RaidType;
use redstor_volumes::params::TaskOptions;
use redstor_volumes::params::VolumeSpec;
use redstor_volumes::params::VolumeTask;
use serde_json::json;
use serde_json::Value;
use std::sync::Arc;
use tokio::test;

fn existing_member() -> Value {
    json!({
        "@odata.id": format!("{}/{}", volumes_uri(), VOLUME_ID),
        "Id": VOLUME_ID,
        "Name": "VD0",
        "BlockSizeBytes": 512,
        "CapacityBytes": 214_748_364_800_u64,
        "Encrypted": false,
        "EncryptionTypes": ["NativeDriveEncryption"],
        "OptimumIOSizeBytes": 65536,
        "RAIDType": "RAID0",
        "Links": {"Drives": [{"@odata.id": drive_ref()}]}
    })
}

fn matching_spec() -> VolumeSpec {
    let mut spec = VolumeSpec::default();
    spec.name = Some("VD0".to_string());
    spec.controller_id = Some(CONTROLLER_ID.to_string());
    spec.raid_type = Some(RaidType::RAID0);
    spec.drives = vec![DRIVE_ID.to_string()];
    spec.block_size_bytes = Some(512);
    spec.capacity_bytes = Some(214_748_364_800);
    spec.optimum_io_size_bytes = Some(65536);
    spec.encrypted = Some(false);
    spec.encryption_types = Some(EncryptionType::NativeDriveEncryption);
    spec
}

fn check_task(spec: VolumeSpec) -> VolumeTask {
    VolumeTask {
        operation: Operation::Present(spec),
        options: TaskOptions::default(),
        check_mode: true,
    }
}

fn expect_capability_reads(client: &Client) {
    client.expect(Expect::get(
        volumes_uri(),
        Reply::ok(volumes_collection_json(None)),
    ));
    client.expect(Expect::get(
        controller_uri(),
        Reply::ok(controller_json(&["RAID0"])),
    ));
}

#[test]
async fn an_identical_volume_means_no_changes() {
    let client = Arc::new(Client::default());
    expect_capability_reads(&client);
    client.expect(Expect::get(
        expanded_volumes_uri(),
        Reply::ok(json!({
            "Members@odata.count": 1,
            "Members": [existing_member()]
        })),
    ));

    let result = manager(&client)
        .execute(&context(), &check_task(matching_spec()))
        .await
        .expect("dry run succeeds");

    assert_eq!(result.msg, "No changes found to be applied.");
    assert!(!result.changed);
    assert!(result.task.is_none());
    assert_eq!(client.remaining(), 0);
}

#[test]
async fn a_differing_volume_means_changes() {
    let client = Arc::new(Client::default());
    expect_capability_reads(&client);
    client.expect(Expect::get(
        expanded_volumes_uri(),
        Reply::ok(json!({
            "Members@odata.count": 1,
            "Members": [existing_member()]
        })),
    ));

    let mut spec = matching_spec();
    spec.capacity_bytes = Some(1_073_741_824);

    let result = manager(&client)
        .execute(&context(), &check_task(spec))
        .await
        .expect("dry run succeeds");

    assert_eq!(result.msg, "Changes found to be applied.");
    assert!(result.changed);
    assert_eq!(client.remaining(), 0);
}

#[test]
async fn an_absent_volume_means_changes() {
    let client = Arc::new(Client::default());
    expect_capability_reads(&client);
    client.expect(Expect::get(
        expanded_volumes_uri(),
        Reply::ok(json!({"Members@odata.count": 0, "Members": []})),
    ));

    let result = manager(&client)
        .execute(&context(), &check_task(matching_spec()))
        .await
        .expect("dry run succeeds");

    assert_eq!(result.msg, "Changes found to be applied.");
    assert!(result.changed);
    assert_eq!(client.remaining(), 0);
}

// Without a name there is nothing to compare against; a write would
// happen.
#[test]
async fn an_unnamed_create_reports_changes_without_comparing() {
    let client = Arc::new(Client::default());
    expect_capability_reads(&client);

    let mut spec = VolumeSpec::default();
    spec.controller_id = Some(CONTROLLER_ID.to_string());

    let result = manager(&client)
        .execute(&context(), &check_task(spec))
        .await
        .expect("dry run succeeds");

    assert_eq!(result.msg, "Changes found to be applied.");
    assert_eq!(client.remaining(), 0);
}

#[test]
async fn check_mode_modify_reports_changes_without_writing() {
    let client = Arc::new(Client::default());
    client.expect(Expect::get(
        volume_uri(),
        Reply::ok(json!({"Id": VOLUME_ID, "Name": "VD0"})),
    ));

    let mut spec = VolumeSpec::default();
    spec.volume_id = Some(VOLUME_ID.to_string());
    spec.name = Some("VD1".to_string());

    let result = manager(&client)
        .execute(&context(), &check_task(spec))
        .await
        .expect("dry run succeeds");

    assert_eq!(result.msg, "Changes found to be applied.");
    assert!(result.changed);
    // No PATCH was queued and none was sent.
    assert_eq!(client.remaining(), 0);
}

// Outside check mode an identical existing volume is an idempotent no-op.
#[test]
async fn an_identical_volume_is_a_no_op_outside_check_mode() {
    let client = Arc::new(Client::default());
    expect_capability_reads(&client);
    client.expect(Expect::get(
        expanded_volumes_uri(),
        Reply::ok(json!({
            "Members@odata.count": 1,
            "Members": [existing_member()]
        })),
    ));

    let task = VolumeTask {
        operation: Operation::Present(matching_spec()),
        options: TaskOptions::default(),
        check_mode: false,
    };
    let result = manager(&client)
        .execute(&context(), &task)
        .await
        .expect("no-op succeeds");

    assert_eq!(result.msg, "No changes found to be applied.");
    assert!(!result.changed);
    assert_eq!(client.remaining(), 0);
}
