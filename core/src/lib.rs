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

//! Transport core for Redfish out-of-band controllers.
//!
//! This crate defines the transport seam the orchestration layer builds on:
//! - [`RedfishClient`]: a minimal async interface for issuing GET/POST/PATCH/
//!   DELETE requests against `@odata.id` paths.
//! - [`Response`]: the uniform response surface (status code, JSON body,
//!   `Location` header). HTTP error statuses are responses, not errors;
//!   the `Err` channel is reserved for transport failures.
//! - [`UnreachableError`]: classification of transport errors so callers can
//!   report "host down" distinctly from "request rejected".
//! - [`http::ReqwestClient`]: the reqwest-backed implementation (cargo
//!   feature `reqwest`, enabled by default).

/// Credentials used to access the controller.
pub mod bmc;
/// Client trait and response model.
pub mod client;
/// HTTP transport built on reqwest.
pub mod http;
/// Type for `@odata.id` identifier.
pub mod odata;

#[doc(inline)]
pub use bmc::BmcCredentials;
pub use client::RedfishClient;
pub use client::Response;
pub use client::UnreachableError;
pub use odata::ODataId;
