// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small shared types: handler outcomes and the call payload handed to handlers.

/// Propagation control returned by a handler.
///
/// Mirrors the responder dispatcher rules:
/// - [`Outcome::Continue`]: keep walking toward the root.
/// - [`Outcome::Stop`]: abort the walk; no further ancestors are visited.
/// - [`Outcome::StopAndConsume`]: abort the walk and report the event as consumed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Keep propagating.
    #[default]
    Continue,
    /// Stop propagation.
    Stop,
    /// Stop propagation and mark the event as consumed.
    StopAndConsume,
}

impl Outcome {
    /// Returns `true` for [`Outcome::Stop`] and [`Outcome::StopAndConsume`].
    #[must_use]
    #[inline]
    pub const fn stops(self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// What a handler is called with.
///
/// When a setup hook is registered for the event type and the visited node's element kind, the
/// handler receives the hook's output as [`Call::Args`]. Otherwise it gets the raw host event.
#[derive(Debug)]
pub enum Call<'a, E, A> {
    /// The raw host event, passed through unmodified.
    Event(&'a mut E),
    /// Arguments produced by a setup hook from `(node, event)`.
    Args(A),
}

impl<E, A> Call<'_, E, A> {
    /// Returns the raw event, if this call carries one.
    #[must_use]
    pub fn event(&mut self) -> Option<&mut E> {
        match self {
            Self::Event(event) => Some(&mut **event),
            Self::Args(_) => None,
        }
    }

    /// Returns the hook arguments, if this call carries them.
    #[must_use]
    pub fn args(&self) -> Option<&A> {
        match self {
            Self::Event(_) => None,
            Self::Args(args) => Some(args),
        }
    }

    /// Consumes the call and returns the hook arguments, if any.
    #[must_use]
    pub fn into_args(self) -> Option<A> {
        match self {
            Self::Event(_) => None,
            Self::Args(args) => Some(args),
        }
    }

    /// Returns `true` if a setup hook shaped this call.
    #[must_use]
    #[inline]
    pub fn is_args(&self) -> bool {
        matches!(self, Self::Args(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_continue_keeps_walking() {
        assert!(!Outcome::Continue.stops());
        assert!(Outcome::Stop.stops());
        assert!(Outcome::StopAndConsume.stops());
        assert_eq!(Outcome::default(), Outcome::Continue);
    }

    #[test]
    fn call_accessors() {
        let mut raw = 7_u32;
        let mut call: Call<'_, u32, &str> = Call::Event(&mut raw);
        assert!(!call.is_args());
        if let Some(event) = call.event() {
            *event += 1;
        }
        assert!(call.args().is_none());
        assert_eq!(raw, 8);

        let shaped: Call<'_, u32, &str> = Call::Args("value");
        assert!(shaped.is_args());
        assert_eq!(shaped.args(), Some(&"value"));
        assert_eq!(shaped.into_args(), Some("value"));
    }
}
