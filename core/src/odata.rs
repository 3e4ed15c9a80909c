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

//! OData identifiers
//!
//! Minimal wrapper for Redfish/OData resource identifiers:
//! [`ODataId`], the value of `@odata.id` — the canonical resource path,
//! treated as an opaque string.
//!
//! Notes
//! - The type is intentionally semantic-unaware; it does not validate
//!   content.
//! - [`ODataId::service_root()`] returns the conventional Redfish service
//!   root path.
//! - Formatting/Display returns the raw underlying string.
//!
//! Example
//! ```rust
//! use redstor_core::ODataId;
//!
//! let root = ODataId::service_root();
//! assert_eq!(root.join("Systems").to_string(), "/redfish/v1/Systems");
//! ```

use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use serde::Deserialize;
use serde::Serialize;

/// Type for `@odata.id` identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ODataId(String);

impl ODataId {
    /// Redfish service root id.
    #[must_use]
    pub fn service_root() -> Self {
        Self("/redfish/v1".into())
    }

    /// Append a path segment.
    #[must_use]
    pub fn join(&self, segment: &str) -> Self {
        Self(format!("{}/{}", self.0.trim_end_matches('/'), segment))
    }

    /// Final non-empty path segment.
    ///
    /// Identifiers carried in `Location` response headers are addressed this
    /// way: the job id is the trailing segment of the job resource path.
    #[must_use]
    pub fn last_segment(&self) -> Option<&str> {
        self.0.split('/').filter(|s| !s.is_empty()).last()
    }

    /// Raw string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ODataId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ODataId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for ODataId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt(f)
    }
}
