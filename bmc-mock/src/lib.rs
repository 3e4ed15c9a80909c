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

//! Scripted mock of a Redfish controller.
//!
//! Tests queue [`Expect`] entries — the request the code under test must
//! issue next and the scripted answer — and hand the [`Client`] to the code
//! under test. Requests are matched in FIFO order; any deviation (wrong
//! request, or a request with nothing queued) fails the exchange with a
//! descriptive error.

pub mod expect;

#[doc(inline)]
pub use expect::Expect;
pub use expect::ExpectedRequest;
pub use expect::Failure;
pub use expect::Reply;

use redstor_core::{ODataId, RedfishClient, Response, UnreachableError};
use serde::Serialize;
use serde_json::to_value;
use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Mutex;
use std::sync::PoisonError;

#[derive(Debug)]
pub enum Error {
    Unreachable(String),
    Transport(String),
    MutexLock(String),
    NothingIsExpected,
    UnserializableBody(serde_json::Error),
    Unexpected {
        got: String,
        expected: ExpectedRequest,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Unreachable(reason) => write!(f, "host unreachable: {reason}"),
            Self::Transport(reason) => write!(f, "transport failure: {reason}"),
            Self::MutexLock(err) => write!(f, "lock error: {err}"),
            Self::NothingIsExpected => {
                write!(f, "nothing is expected to happen but something happened")
            }
            Self::UnserializableBody(err) => write!(f, "unserializable request body: {err}"),
            Self::Unexpected { got, expected } => {
                write!(f, "unexpected request: {got}; expected: {expected:?}")
            }
        }
    }
}

impl StdError for Error {}

impl UnreachableError for Error {
    fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

impl Error {
    fn mutex_lock<T>(err: PoisonError<T>) -> Self {
        Self::MutexLock(err.to_string())
    }
}

impl From<Failure> for Error {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Unreachable(reason) => Self::Unreachable(reason),
            Failure::Transport(reason) => Self::Transport(reason),
        }
    }
}

/// Scripted controller double implementing [`RedfishClient`].
#[derive(Default)]
pub struct Client {
    expect: Mutex<VecDeque<Expect>>,
}

impl Client {
    /// Queue an expected exchange. Expectations are consumed in FIFO order.
    pub fn expect(&self, exp: Expect) {
        let expect: &mut VecDeque<Expect> = &mut self.expect.lock().expect("not poisoned");
        expect.push_back(exp);
    }

    /// Number of expectations not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.expect.lock().expect("not poisoned").len()
    }

    /// Dump queued expectations to stdout, oldest first.
    pub fn debug_expect(&self) {
        let expect: &VecDeque<Expect> = &self.expect.lock().expect("not poisoned");
        println!("Expectations (total: {})", expect.len());
        for v in expect {
            println!("{:#?}", v.request);
        }
    }

    fn respond(&self, got: ExpectedRequest) -> Result<Response, Error> {
        let expect = self
            .expect
            .lock()
            .map_err(Error::mutex_lock)?
            .pop_front()
            .ok_or(Error::NothingIsExpected)?;
        if expect.request == got {
            match expect.reply {
                Ok(reply) => Ok(reply.into_response()),
                Err(failure) => Err(failure.into()),
            }
        } else {
            Err(Error::Unexpected {
                got: format!("{got:?}"),
                expected: expect.request,
            })
        }
    }
}

impl RedfishClient for Client {
    type Error = Error;

    async fn get(&self, id: &ODataId) -> Result<Response, Self::Error> {
        self.respond(ExpectedRequest::Get { id: id.clone() })
    }

    async fn post<B: Serialize + Send + Sync>(
        &self,
        id: &ODataId,
        body: &B,
    ) -> Result<Response, Self::Error> {
        let body = to_value(body).map_err(Error::UnserializableBody)?;
        self.respond(ExpectedRequest::Post {
            id: id.clone(),
            body,
        })
    }

    async fn patch<B: Serialize + Send + Sync>(
        &self,
        id: &ODataId,
        body: &B,
    ) -> Result<Response, Self::Error> {
        let body = to_value(body).map_err(Error::UnserializableBody)?;
        self.respond(ExpectedRequest::Patch {
            id: id.clone(),
            body,
        })
    }

    async fn delete(&self, id: &ODataId) -> Result<Response, Self::Error> {
        self.respond(ExpectedRequest::Delete { id: id.clone() })
    }
}
