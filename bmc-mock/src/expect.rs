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

//! Expectations scripted into the mock controller.

use http::StatusCode;
use redstor_core::{ODataId, Response};
use serde_json::Value;

/// One scripted exchange: the request the test expects the code under test
/// to issue, and what the controller answers.
#[derive(Debug)]
pub struct Expect {
    pub request: ExpectedRequest,
    pub reply: Result<Reply, Failure>,
}

/// Request shape matched against what the code under test actually sends.
/// Bodies are compared as JSON values.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedRequest {
    Get { id: ODataId },
    Post { id: ODataId, body: Value },
    Patch { id: ODataId, body: Value },
    Delete { id: ODataId },
}

/// Scripted HTTP answer.
#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    json: Option<Value>,
    location: Option<String>,
}

impl Reply {
    /// 200 with a JSON body.
    #[must_use]
    pub fn ok(json: Value) -> Self {
        Self {
            status: 200,
            json: Some(json),
            location: None,
        }
    }

    /// A bodyless answer with the given status.
    #[must_use]
    pub const fn empty(status: u16) -> Self {
        Self {
            status,
            json: None,
            location: None,
        }
    }

    /// Override the status code.
    #[must_use]
    pub const fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn json(mut self, json: Value) -> Self {
        self.json = Some(json);
        self
    }

    /// Attach a `Location` header.
    #[must_use]
    pub fn location<S: Into<String>>(mut self, location: S) -> Self {
        self.location = Some(location.into());
        self
    }

    pub(crate) fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).expect("valid status code");
        Response::new(status, self.json, self.location.map(ODataId::from))
    }
}

/// Scripted transport failure.
#[derive(Debug, Clone)]
pub enum Failure {
    /// Connect/DNS failure; the host never answered.
    Unreachable(String),
    /// Any other transport failure.
    Transport(String),
}

impl Expect {
    #[must_use]
    pub fn get<I: Into<ODataId>>(id: I, reply: Reply) -> Self {
        Self {
            request: ExpectedRequest::Get { id: id.into() },
            reply: Ok(reply),
        }
    }

    #[must_use]
    pub fn post<I: Into<ODataId>>(id: I, body: Value, reply: Reply) -> Self {
        Self {
            request: ExpectedRequest::Post {
                id: id.into(),
                body,
            },
            reply: Ok(reply),
        }
    }

    #[must_use]
    pub fn patch<I: Into<ODataId>>(id: I, body: Value, reply: Reply) -> Self {
        Self {
            request: ExpectedRequest::Patch {
                id: id.into(),
                body,
            },
            reply: Ok(reply),
        }
    }

    #[must_use]
    pub fn delete<I: Into<ODataId>>(id: I, reply: Reply) -> Self {
        Self {
            request: ExpectedRequest::Delete { id: id.into() },
            reply: Ok(reply),
        }
    }

    /// Expect a GET and answer with a transport failure.
    #[must_use]
    pub fn get_failure<I: Into<ODataId>>(id: I, failure: Failure) -> Self {
        Self {
            request: ExpectedRequest::Get { id: id.into() },
            reply: Err(failure),
        }
    }
}
