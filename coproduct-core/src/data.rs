// Core type definitions for coproduct

use serde::{Deserialize, Serialize};

/// Reserved handler key for the fallback arm. No variant may use it as a label.
pub const FALLBACK_KEY: &str = "_";

/// A tagged value: one alternative of a closed set, identified by its label.
///
/// This is the canonical `{tag, payload}` representation every convention is
/// decoded into. Values are immutable once built; the only way to change one
/// is to take it apart with [`Tagged::into_parts`] and build a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tagged<P = serde_json::Value> {
    tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<P>,
}

impl<P> Tagged<P> {
    pub(crate) fn from_parts(tag: String, payload: Option<P>) -> Self {
        Tagged { tag, payload }
    }

    /// The discriminant label
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// True when the value carries the given label
    pub fn is(&self, label: &str) -> bool {
        self.tag == label
    }

    pub fn into_parts(self) -> (String, Option<P>) {
        (self.tag, self.payload)
    }

    pub fn into_payload(self) -> Option<P> {
        self.payload
    }

    /// Rebuild the value with a transformed payload, keeping the label
    pub fn map_payload<Q>(self, f: impl FnOnce(P) -> Q) -> Tagged<Q> {
        Tagged {
            tag: self.tag,
            payload: self.payload.map(f),
        }
    }
}
