// Reference variants - Option and Result built from the constructor and matcher

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::data::Tagged;
use crate::error::{DispatchFailure, RecordError};
use crate::matcher::{matching, Handlers};
use crate::variant::{tag_only, tag_with_payload};

pub const SOME: &str = "some";
pub const NONE: &str = "none";
pub const OK: &str = "ok";
pub const ERR: &str = "err";

pub fn some<P>(value: P) -> Tagged<P> {
    tag_with_payload(SOME)(value)
}

pub fn none<P>() -> Tagged<P> {
    tag_only(NONE)
}

pub fn ok<P>(value: P) -> Tagged<P> {
    tag_with_payload(OK)(value)
}

pub fn err<P>(info: P) -> Tagged<P> {
    tag_with_payload(ERR)(info)
}

/// A native enum that can travel as a [`Tagged`] value.
///
/// The enum side gets exhaustive `match` from the compiler; the tagged side
/// is checked at runtime by the matcher when converting back.
pub trait Coproduct: Sized {
    type Payload;
    type Error: From<DispatchFailure<Self::Payload>>;

    /// Every label this type can produce, in declaration order
    const LABELS: &'static [&'static str];

    fn label(&self) -> &'static str;

    fn into_tagged(self) -> Result<Tagged<Self::Payload>, Self::Error>;

    fn from_tagged(value: Tagged<Self::Payload>) -> Result<Self, Self::Error>;
}

impl<T> Coproduct for Option<T> {
    type Payload = T;
    type Error = DispatchFailure<T>;

    const LABELS: &'static [&'static str] = &[SOME, NONE];

    fn label(&self) -> &'static str {
        match self {
            Some(_) => SOME,
            None => NONE,
        }
    }

    fn into_tagged(self) -> Result<Tagged<T>, Self::Error> {
        Ok(self.into())
    }

    fn from_tagged(value: Tagged<T>) -> Result<Self, Self::Error> {
        matching(value).case(Handlers::new().on(SOME, Some).on_unit(NONE, || None))
    }
}

impl<T> From<Option<T>> for Tagged<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => some(value),
            None => none(),
        }
    }
}

/// The two arms carry different types, so the payload travels as JSON
impl<T, E> Coproduct for Result<T, E>
where
    T: Serialize + DeserializeOwned,
    E: Serialize + DeserializeOwned,
{
    type Payload = serde_json::Value;
    type Error = RecordError;

    const LABELS: &'static [&'static str] = &[OK, ERR];

    fn label(&self) -> &'static str {
        match self {
            Ok(_) => OK,
            Err(_) => ERR,
        }
    }

    fn into_tagged(self) -> Result<Tagged<serde_json::Value>, Self::Error> {
        Ok(match self {
            Ok(value) => ok(serde_json::to_value(value)?),
            Err(info) => err(serde_json::to_value(info)?),
        })
    }

    fn from_tagged(value: Tagged<serde_json::Value>) -> Result<Self, Self::Error> {
        let decoded = matching(value).case(
            Handlers::new()
                .on(OK, |v| serde_json::from_value::<T>(v).map(Ok))
                .on(ERR, |e| serde_json::from_value::<E>(e).map(Err)),
        )?;
        Ok(decoded?)
    }
}
