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

//! Error type for volume orchestration.
//!
//! Validation and capability errors carry the exact operator-facing message
//! and propagate to the outermost boundary unmodified — nothing at this
//! layer retries. Transport failures keep their reachability classification
//! so "host down" can be reported distinctly from "request rejected".

use http::StatusCode;
use redstor_core::RedfishClient;
use redstor_core::Response;
use redstor_core::UnreachableError;
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;

pub enum Error<C: RedfishClient> {
    /// Transport failure reported by the client.
    Client(C::Error),
    /// The service answered with an HTTP error status.
    Http {
        status: StatusCode,
        body: Option<Value>,
    },
    /// A response body did not match the expected resource shape.
    Json(serde_json::Error),
    /// A required option is missing.
    MissingParameter(String),
    /// An option combination the operation cannot work with.
    InvalidInput(String),
    /// The controller does not support what was requested.
    UnsupportedOperation(String),
    /// A configuration job for the device is already in progress.
    ResourceBusy(String),
    /// The operation was carried out but did not succeed.
    OperationFailed(String),
    /// A tracked job did not finish within the wall-clock budget.
    Timeout(String),
}

impl<C: RedfishClient> Error<C> {
    pub(crate) fn http(resp: &Response) -> Self {
        Self::Http {
            status: resp.status(),
            body: resp.json_data().cloned(),
        }
    }

    /// True when the failure means the controller could not be reached at
    /// all.
    pub fn is_unreachable(&self) -> bool
    where
        C::Error: UnreachableError,
    {
        match self {
            Self::Client(err) => err.is_unreachable(),
            _ => false,
        }
    }
}

/// Fold an HTTP error status into [`Error::Http`].
pub(crate) fn ensure_success<C: RedfishClient>(resp: Response) -> Result<Response, Error<C>> {
    if resp.success() {
        Ok(resp)
    } else {
        Err(Error::http(&resp))
    }
}

impl<C: RedfishClient> fmt::Debug for Error<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(err) => f.debug_tuple("Client").field(err).finish(),
            Self::Http { status, body } => f
                .debug_struct("Http")
                .field("status", status)
                .field("body", body)
                .finish(),
            Self::Json(err) => f.debug_tuple("Json").field(err).finish(),
            Self::MissingParameter(msg) => f.debug_tuple("MissingParameter").field(msg).finish(),
            Self::InvalidInput(msg) => f.debug_tuple("InvalidInput").field(msg).finish(),
            Self::UnsupportedOperation(msg) => {
                f.debug_tuple("UnsupportedOperation").field(msg).finish()
            }
            Self::ResourceBusy(msg) => f.debug_tuple("ResourceBusy").field(msg).finish(),
            Self::OperationFailed(msg) => f.debug_tuple("OperationFailed").field(msg).finish(),
            Self::Timeout(msg) => f.debug_tuple("Timeout").field(msg).finish(),
        }
    }
}

impl<C: RedfishClient> fmt::Display for Error<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(err) => write!(f, "transport error: {err}"),
            Self::Http { status, .. } => write!(f, "HTTP error response: {status}"),
            Self::Json(err) => write!(f, "unexpected response body: {err}"),
            Self::MissingParameter(msg)
            | Self::InvalidInput(msg)
            | Self::UnsupportedOperation(msg)
            | Self::ResourceBusy(msg)
            | Self::OperationFailed(msg)
            | Self::Timeout(msg) => f.write_str(msg),
        }
    }
}

impl<C: RedfishClient> StdError for Error<C>
where
    C::Error: 'static,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Client(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}
