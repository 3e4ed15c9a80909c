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

use redstor_tests::job_json;
use redstor_tests::Client;
use redstor_tests::Expect;
use redstor_tests::Reply;
use redstor_tests::JOB_ID;
use redstor_tests::JOB_URI;

use redstor_core::ODataId;
use redstor_volumes::schema::JobState;
use redstor_volumes::Error;
use redstor_volumes::JobTracker;
use std::time::Duration;
use tokio::test;

fn tracker(wait_timeout: Duration) -> JobTracker {
    JobTracker::new(Duration::from_millis(2), wait_timeout)
}

fn job_uri() -> ODataId {
    ODataId::from(JOB_URI)
}

#[test]
async fn tracking_polls_until_the_job_completes() {
    let client = Client::default();
    client.expect(Expect::get(JOB_URI, Reply::ok(job_json(JOB_ID, "Scheduled"))));
    client.expect(Expect::get(JOB_URI, Reply::ok(job_json(JOB_ID, "Running"))));
    client.expect(Expect::get(JOB_URI, Reply::ok(job_json(JOB_ID, "Completed"))));

    let (msg, job) = tracker(Duration::from_secs(2))
        .track(&client, &job_uri(), true, "creating")
        .await
        .expect("job completes");

    assert_eq!(msg, "The job is successfully completed.");
    assert_eq!(job.state(), Some(&JobState::Completed));
    assert_eq!(client.remaining(), 0);
}

// `Success` is a distinct terminal label from `Completed`; both finish the
// job cleanly and the caller can still see which one was reported.
#[test]
async fn the_success_label_is_preserved() {
    let client = Client::default();
    client.expect(Expect::get(JOB_URI, Reply::ok(job_json(JOB_ID, "Success"))));

    let (msg, job) = tracker(Duration::from_secs(2))
        .track(&client, &job_uri(), true, "creating")
        .await
        .expect("job succeeds");

    assert_eq!(msg, "The job is successfully completed.");
    assert_eq!(job.state(), Some(&JobState::Success));
}

#[test]
async fn a_failed_job_fails_the_operation() {
    let client = Client::default();
    client.expect(Expect::get(JOB_URI, Reply::ok(job_json(JOB_ID, "Failed"))));

    let err = tracker(Duration::from_secs(2))
        .track(&client, &job_uri(), true, "creating")
        .await
        .expect_err("job failed");

    assert!(matches!(err, Error::OperationFailed(_)));
    assert_eq!(
        err.to_string(),
        "Unable to complete the task initiated for creating the storage volume."
    );
}

#[test]
async fn an_unfinished_job_times_out_with_the_elapsed_budget() {
    let client = Client::default();
    // One live observation; every later poll finds nothing scripted and is
    // tolerated until the budget runs out.
    client.expect(Expect::get(JOB_URI, Reply::ok(job_json(JOB_ID, "Running"))));

    let err = tracker(Duration::from_secs(2))
        .track(&client, &job_uri(), true, "creating")
        .await
        .expect_err("budget runs out");

    assert!(matches!(err, Error::Timeout(_)));
    assert_eq!(err.to_string(), "The job is not complete after 2 seconds.");
}

#[test]
async fn no_response_at_all_is_its_own_failure() {
    let client = Client::default();

    let err = tracker(Duration::from_secs(1))
        .track(&client, &job_uri(), true, "creating")
        .await
        .expect_err("nothing ever answers");

    assert!(matches!(err, Error::OperationFailed(_)));
    assert_eq!(err.to_string(), "The job has no response.");
}

#[test]
async fn fire_and_forget_reports_the_submission() {
    let client = Client::default();
    client.expect(Expect::get(JOB_URI, Reply::ok(job_json(JOB_ID, "Scheduled"))));

    let (msg, job) = tracker(Duration::from_secs(2))
        .track(&client, &job_uri(), false, "creating")
        .await
        .expect("single read succeeds");

    assert_eq!(msg, "The job is successfully submitted.");
    assert_eq!(job.state(), Some(&JobState::Scheduled));
    assert_eq!(client.remaining(), 0);
}

#[test]
async fn fire_and_forget_still_reports_an_already_failed_job() {
    let client = Client::default();
    client.expect(Expect::get(JOB_URI, Reply::ok(job_json(JOB_ID, "Failed"))));

    let err = tracker(Duration::from_secs(2))
        .track(&client, &job_uri(), false, "deleting")
        .await
        .expect_err("job already failed");
    assert_eq!(
        err.to_string(),
        "Unable to complete the task initiated for deleting the storage volume."
    );
}

#[test]
async fn fire_and_forget_without_a_response_fails() {
    let client = Client::default();

    let err = tracker(Duration::from_secs(2))
        .track(&client, &job_uri(), false, "creating")
        .await
        .expect_err("nothing answers");
    assert_eq!(err.to_string(), "The job has no response.");
}

// Vendor-specific states are non-terminal: the tracker keeps polling
// through them.
#[test]
async fn vendor_states_do_not_terminate_tracking() {
    let client = Client::default();
    client.expect(Expect::get(
        JOB_URI,
        Reply::ok(job_json(JOB_ID, "ReadyForExecution")),
    ));
    client.expect(Expect::get(JOB_URI, Reply::ok(job_json(JOB_ID, "Completed"))));

    let (msg, _job) = tracker(Duration::from_secs(2))
        .track(&client, &job_uri(), true, "creating")
        .await
        .expect("job completes");
    assert_eq!(msg, "The job is successfully completed.");
    assert_eq!(client.remaining(), 0);
}
