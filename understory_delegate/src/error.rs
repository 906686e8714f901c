// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for listener registration.

use alloc::string::String;

/// Errors returned by [`Delegator`](crate::Delegator) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DelegateError {
    /// A listener was added for an event type that has no descriptor.
    ///
    /// This is a registration ordering bug in the caller: event types must be registered
    /// before listeners for them are added.
    #[error("event type `{name}` has not been registered")]
    UnregisteredEventType {
        /// The name that failed to resolve.
        name: String,
    },
}
