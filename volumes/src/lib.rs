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

//! RAID storage volume management for Redfish out-of-band controllers.
//!
//! The library turns declarative volume intent — create, modify, delete or
//! initialize — into the request sequence the controller expects:
//!
//! 1. [`StorageContext::discover`] locates the storage collection of the
//!    target system once per invocation.
//! 2. [`VolumeManager::execute`] validates the request against what the
//!    controller advertises (supported RAID types, supported operation
//!    apply times), maps it onto the Redfish volume schema and submits it.
//! 3. A change resolved to apply `OnReset` can trigger a tracked host
//!    reboot; the submitted job is then polled to a terminal state.
//!
//! Requests travel through the [`redstor_core::RedfishClient`] seam, so the
//! whole workflow runs unchanged against the reqwest transport or the
//! scripted mock used in tests.

/// Apply-time resolution and reboot coordination.
mod apply;
/// Controller capability checks.
mod capability;
/// Storage collection discovery.
pub mod context;
/// Error type for volume orchestration.
pub mod error;
/// Asynchronous job tracking.
pub mod job;
/// High-level task execution.
mod manager;
/// Operation dispatch and per-operation validators.
mod operations;
/// User-facing request model.
pub mod params;
/// Mapping from user parameters to the Redfish volume schema.
pub mod payload;
/// Consumed Redfish resource shapes.
pub mod schema;

pub use context::StorageContext;
pub use error::Error;
pub use job::JobTracker;
pub use job::JobWait;
pub use manager::OperationResult;
pub use manager::TaskHandle;
pub use manager::VolumeManager;
