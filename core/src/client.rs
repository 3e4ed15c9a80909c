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

//! Redfish client abstraction
//!
//! This module defines the transport-agnostic [`RedfishClient`] trait — a
//! minimal interface for issuing requests against a Redfish service.
//! Implementors provide asynchronous GET/POST/PATCH/DELETE operations
//! addressed by `@odata.id` ([`crate::ODataId`]) and return a uniform
//! [`Response`].
//!
//! Operation semantics:
//! - Any HTTP response, including 4xx/5xx statuses, is an `Ok(Response)`;
//!   callers inspect [`Response::status`] and decide.
//! - `Err` is reserved for transport failures: connection, name resolution,
//!   TLS, or an unreadable body.
//! - [`UnreachableError`] classifies transport errors so the outermost
//!   boundary can report "host down" distinctly from "request rejected".
//!
//! Notes for implementors:
//! - The trait is `Send + Sync` and returns `Send` futures to support use in
//!   async runtimes and multithreaded contexts.
//! - Errors should implement `std::error::Error` and be safely transferable
//!   across threads.

use crate::ODataId;
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::error::Error as StdError;
use std::future::Future;

/// Uniform response surface: status code, decoded JSON body and the
/// `Location` header, which on volume writes carries the job resource path.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    json: Option<Value>,
    location: Option<ODataId>,
}

impl Response {
    /// Assemble a response.
    #[must_use]
    pub const fn new(status: StatusCode, json: Option<Value>, location: Option<ODataId>) -> Self {
        Self {
            status,
            json,
            location,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// True for 2xx statuses.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.is_success()
    }

    /// Decoded JSON body, if the service returned one.
    #[must_use]
    pub fn json_data(&self) -> Option<&Value> {
        self.json.as_ref()
    }

    /// Value of the `Location` response header, when present.
    #[must_use]
    pub fn location(&self) -> Option<&ODataId> {
        self.location.as_ref()
    }

    /// Deserialize the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns a deserialization error when the body is absent or does not
    /// match the expected shape.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.json.clone().unwrap_or(Value::Null))
    }
}

/// Minimal async interface to a Redfish service.
pub trait RedfishClient: Send + Sync {
    /// Transport error.
    type Error: StdError + Send + Sync;

    /// Perform an HTTP GET request.
    fn get(&self, id: &ODataId) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// Perform an HTTP POST request with a JSON body.
    fn post<B: Serialize + Send + Sync>(
        &self,
        id: &ODataId,
        body: &B,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// Perform an HTTP PATCH request with a JSON body.
    fn patch<B: Serialize + Send + Sync>(
        &self,
        id: &ODataId,
        body: &B,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// Perform an HTTP DELETE request.
    fn delete(&self, id: &ODataId) -> impl Future<Output = Result<Response, Self::Error>> + Send;
}

/// Trait for transport errors that can indicate an unreachable host.
///
/// Connection and name-resolution failures mean the host never answered;
/// everything else means the host answered and the exchange itself failed.
pub trait UnreachableError {
    /// Returns true when the host could not be reached at all.
    fn is_unreachable(&self) -> bool;
}
