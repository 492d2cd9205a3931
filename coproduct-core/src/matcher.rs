// Dispatch engine - route a tagged value to the handler for its label

use std::collections::HashMap;
use std::fmt;

use log::{debug, trace};

use crate::data::{Tagged, FALLBACK_KEY};
use crate::error::{DispatchFailure, FailureReason};

/// Handler registered for one label
enum Arm<'a, P, R> {
    /// Receives the payload
    Payload(Box<dyn FnOnce(P) -> R + 'a>),
    /// Receives nothing; any payload is dropped
    Unit(Box<dyn FnOnce() -> R + 'a>),
    /// Receives the whole value
    Whole(Box<dyn FnOnce(Tagged<P>) -> R + 'a>),
}

/// Handler used when no label-specific arm matches
enum Fallback<'a, P, R> {
    Unit(Box<dyn FnOnce() -> R + 'a>),
    Whole(Box<dyn FnOnce(Tagged<P>) -> R + 'a>),
}

/// A dispatch table: label to handler, plus an optional fallback.
///
/// Built fresh per call site and consumed by [`Matcher::case`] or
/// [`Matcher::partial`]. Registering a label twice keeps the later handler.
pub struct Handlers<'a, P, R> {
    arms: HashMap<String, Arm<'a, P, R>>,
    fallback: Option<Fallback<'a, P, R>>,
}

impl<'a, P, R> Handlers<'a, P, R> {
    pub fn new() -> Self {
        Handlers {
            arms: HashMap::new(),
            fallback: None,
        }
    }

    /// Handle `label` with a function of its payload
    pub fn on(mut self, label: impl Into<String>, handler: impl FnOnce(P) -> R + 'a) -> Self {
        self.arms
            .insert(label.into(), Arm::Payload(Box::new(handler)));
        self
    }

    /// Handle a tag-only `label`
    pub fn on_unit(mut self, label: impl Into<String>, handler: impl FnOnce() -> R + 'a) -> Self {
        self.arms.insert(label.into(), Arm::Unit(Box::new(handler)));
        self
    }

    /// Handle `label` with a function of the whole value
    pub fn on_value(
        mut self,
        label: impl Into<String>,
        handler: impl FnOnce(Tagged<P>) -> R + 'a,
    ) -> Self {
        self.arms.insert(label.into(), Arm::Whole(Box::new(handler)));
        self
    }

    /// Fallback arm taking no argument, the `_` entry
    pub fn otherwise(mut self, handler: impl FnOnce() -> R + 'a) -> Self {
        self.fallback = Some(Fallback::Unit(Box::new(handler)));
        self
    }

    /// Fallback arm receiving the unmatched value
    pub fn otherwise_with(mut self, handler: impl FnOnce(Tagged<P>) -> R + 'a) -> Self {
        self.fallback = Some(Fallback::Whole(Box::new(handler)));
        self
    }

    pub fn handles(&self, label: &str) -> bool {
        self.arms.contains_key(label)
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Labels with a dedicated handler, in no particular order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.arms.keys().map(String::as_str)
    }

    fn dispatch(
        mut self,
        value: Tagged<P>,
        unmatched: FailureReason,
    ) -> Result<R, DispatchFailure<P>> {
        if let Some(arm) = self.arms.remove(value.tag()) {
            trace!("dispatching '{}' to its handler", value.tag());
            return match arm {
                Arm::Whole(handler) => Ok(handler(value)),
                Arm::Unit(handler) => Ok(handler()),
                Arm::Payload(handler) => {
                    let (tag, payload) = value.into_parts();
                    match payload {
                        Some(payload) => Ok(handler(payload)),
                        None => {
                            debug!("handler for '{}' expects a payload, none present", tag);
                            Err(DispatchFailure::new(
                                FailureReason::MissingPayload,
                                Tagged::from_parts(tag, None),
                            ))
                        }
                    }
                }
            };
        }

        match self.fallback {
            Some(fallback) => {
                debug!("no handler for '{}', using fallback", value.tag());
                Ok(match fallback {
                    Fallback::Unit(handler) => handler(),
                    Fallback::Whole(handler) => handler(value),
                })
            }
            None => {
                debug!("{}: {}", unmatched, value.tag());
                Err(DispatchFailure::new(unmatched, value))
            }
        }
    }
}

impl<'a, P, R> Default for Handlers<'a, P, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, P, R> fmt::Debug for Handlers<'a, P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut labels: Vec<&str> = self.labels().collect();
        labels.sort_unstable();
        if self.has_fallback() {
            labels.push(FALLBACK_KEY);
        }
        f.debug_struct("Handlers").field("labels", &labels).finish()
    }
}

/// A value waiting to be dispatched
#[derive(Debug, Clone, PartialEq)]
pub struct Matcher<P> {
    value: Tagged<P>,
}

/// Start a dispatch on `value`
pub fn matching<P>(value: Tagged<P>) -> Matcher<P> {
    Matcher::new(value)
}

impl<P> Matcher<P> {
    pub fn new(value: Tagged<P>) -> Self {
        Matcher { value }
    }

    pub fn value(&self) -> &Tagged<P> {
        &self.value
    }

    /// Total dispatch.
    ///
    /// Call sites are expected to cover every label, or to supply a fallback.
    /// A value that slips past both fails with
    /// [`FailureReason::UnexpectedInput`].
    pub fn case<R>(self, handlers: Handlers<'_, P, R>) -> Result<R, DispatchFailure<P>> {
        handlers.dispatch(self.value, FailureReason::UnexpectedInput)
    }

    /// Dispatch over any subset of labels, fallback optional.
    ///
    /// Same resolution as [`Matcher::case`]; an unmatched value fails with
    /// [`FailureReason::UnhandledBranch`].
    pub fn partial<R>(self, handlers: Handlers<'_, P, R>) -> Result<R, DispatchFailure<P>> {
        handlers.dispatch(self.value, FailureReason::UnhandledBranch)
    }
}
