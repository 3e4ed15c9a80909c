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
use redstor_tests::job_json;
use redstor_tests::manager;
use redstor_tests::volumes_collection_json;
use redstor_tests::volumes_uri;
use redstor_tests::Client;
use redstor_tests::Expect;
use redstor_tests::Reply;
use redstor_tests::CONTROLLER_ID;
use redstor_tests::JOB_ID;
use redstor_tests::JOB_URI;
use redstor_tests::REBOOT_JOB_URI;
use redstor_tests::RESET_URI;

use redstor_volumes::params::Operation;
use redstor_volumes::params::TaskOptions;
use redstor_volumes::params::VolumeSpec;
use redstor_volumes::params::VolumeTask;
use redstor_volumes::schema::ApplyTime;
use redstor_volumes::Error;
use serde_json::json;
use std::sync::Arc;
use tokio::test;

const REBOOT_JOB_ID: &str = "RID_987654321";

// Queue everything up to and including the volume submission for an
// OnReset create that will want a reboot.
fn expect_submission(client: &Client) {
    client.expect(Expect::get(
        volumes_uri(),
        Reply::ok(volumes_collection_json(Some(&["OnReset"]))),
    ));
    client.expect(Expect::get(
        controller_uri(),
        Reply::ok(controller_json(&["RAID0"])),
    ));
    client.expect(Expect::post(
        volumes_uri(),
        json!({"@Redfish.OperationApplyTime": "OnReset"}),
        Reply::empty(202).location(JOB_URI),
    ));
}

fn reboot_task(force_reboot: bool) -> VolumeTask {
    let mut spec = VolumeSpec::default();
    spec.controller_id = Some(CONTROLLER_ID.to_string());
    spec.apply_time = Some(ApplyTime::OnReset);
    VolumeTask {
        operation: Operation::Present(spec),
        options: TaskOptions {
            reboot_server: true,
            force_reboot,
            job_wait: true,
            job_wait_timeout: 5,
        },
        check_mode: false,
    }
}

#[test]
async fn a_graceful_reboot_gates_job_tracking() {
    let client = Arc::new(Client::default());
    expect_submission(&client);
    client.expect(Expect::post(
        RESET_URI,
        json!({"ResetType": "GracefulRestart"}),
        Reply::empty(204).location(REBOOT_JOB_URI),
    ));
    client.expect(Expect::get(
        REBOOT_JOB_URI,
        Reply::ok(job_json(REBOOT_JOB_ID, "Completed")),
    ));
    client.expect(Expect::get(
        JOB_URI,
        Reply::ok(job_json(JOB_ID, "Completed")),
    ));

    let result = manager(&client)
        .execute(&context(), &reboot_task(false))
        .await
        .expect("workflow succeeds");

    assert_eq!(result.msg, "The job is successfully completed.");
    assert_eq!(client.remaining(), 0);
}

#[test]
async fn a_failed_graceful_reboot_escalates_when_forcing_is_allowed() {
    let client = Arc::new(Client::default());
    expect_submission(&client);
    client.expect(Expect::post(
        RESET_URI,
        json!({"ResetType": "GracefulRestart"}),
        Reply::empty(204).location(REBOOT_JOB_URI),
    ));
    client.expect(Expect::get(
        REBOOT_JOB_URI,
        Reply::ok(job_json(REBOOT_JOB_ID, "Failed")),
    ));
    client.expect(Expect::post(
        RESET_URI,
        json!({"ResetType": "ForceRestart"}),
        Reply::empty(204).location(REBOOT_JOB_URI),
    ));
    client.expect(Expect::get(
        REBOOT_JOB_URI,
        Reply::ok(job_json(REBOOT_JOB_ID, "Completed")),
    ));
    client.expect(Expect::get(
        JOB_URI,
        Reply::ok(job_json(JOB_ID, "Completed")),
    ));

    let result = manager(&client)
        .execute(&context(), &reboot_task(true))
        .await
        .expect("forced reboot rescues the workflow");

    assert_eq!(result.msg, "The job is successfully completed.");
    assert_eq!(client.remaining(), 0);
}

#[test]
async fn a_failed_graceful_reboot_without_forcing_fails() {
    let client = Arc::new(Client::default());
    expect_submission(&client);
    client.expect(Expect::post(
        RESET_URI,
        json!({"ResetType": "GracefulRestart"}),
        Reply::empty(204).location(REBOOT_JOB_URI),
    ));
    client.expect(Expect::get(
        REBOOT_JOB_URI,
        Reply::ok(job_json(REBOOT_JOB_ID, "Failed")),
    ));

    let err = manager(&client)
        .execute(&context(), &reboot_task(false))
        .await
        .expect_err("reboot failed");

    assert!(matches!(err, Error::OperationFailed(_)));
    assert_eq!(err.to_string(), "Failed to reboot the server.");
    assert_eq!(client.remaining(), 0);
}

// The controller may decline to schedule a reboot job (hardware that
// resets synchronously). That is no action taken, and the flow proceeds.
#[test]
async fn a_declined_reboot_job_is_not_an_error() {
    let client = Arc::new(Client::default());
    expect_submission(&client);
    client.expect(Expect::post(
        RESET_URI,
        json!({"ResetType": "GracefulRestart"}),
        Reply::empty(204),
    ));
    client.expect(Expect::get(
        JOB_URI,
        Reply::ok(job_json(JOB_ID, "Completed")),
    ));

    let result = manager(&client)
        .execute(&context(), &reboot_task(false))
        .await
        .expect("workflow succeeds");

    assert_eq!(result.msg, "The job is successfully completed.");
    assert_eq!(client.remaining(), 0);
}

#[test]
async fn a_failed_forced_reboot_fails_the_workflow() {
    let client = Arc::new(Client::default());
    expect_submission(&client);
    client.expect(Expect::post(
        RESET_URI,
        json!({"ResetType": "GracefulRestart"}),
        Reply::empty(204).location(REBOOT_JOB_URI),
    ));
    client.expect(Expect::get(
        REBOOT_JOB_URI,
        Reply::ok(job_json(REBOOT_JOB_ID, "Failed")),
    ));
    client.expect(Expect::post(
        RESET_URI,
        json!({"ResetType": "ForceRestart"}),
        Reply::empty(204).location(REBOOT_JOB_URI),
    ));
    client.expect(Expect::get(
        REBOOT_JOB_URI,
        Reply::ok(job_json(REBOOT_JOB_ID, "Failed")),
    ));

    let err = manager(&client)
        .execute(&context(), &reboot_task(true))
        .await
        .expect_err("forced reboot failed");
    assert_eq!(err.to_string(), "Failed to reboot the server.");
    assert_eq!(client.remaining(), 0);
}

#[test]
async fn a_timed_out_graceful_reboot_reports_the_elapsed_budget() {
    let client = Arc::new(Client::default());
    expect_submission(&client);
    client.expect(Expect::post(
        RESET_URI,
        json!({"ResetType": "GracefulRestart"}),
        Reply::empty(204).location(REBOOT_JOB_URI),
    ));
    // One live observation, then nothing until the two-second reboot
    // budget configured by the test manager runs out.
    client.expect(Expect::get(
        REBOOT_JOB_URI,
        Reply::ok(job_json(REBOOT_JOB_ID, "Running")),
    ));

    let err = manager(&client)
        .execute(&context(), &reboot_task(false))
        .await
        .expect_err("reboot budget runs out");

    assert!(matches!(err, Error::Timeout(_)));
    assert_eq!(err.to_string(), "The job is not complete after 2 seconds.");
}
