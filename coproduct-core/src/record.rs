// Record adapters - JSON records to and from the canonical tagged value

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::data::Tagged;
use crate::error::RecordError;
use crate::matcher::Matcher;
use crate::schema::Layout;

/// Reads and writes records of one discriminant field and payload layout.
///
/// Every layout decodes into the same [`Tagged`] value, so one dispatch
/// engine serves all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCodec {
    discriminant: String,
    layout: Layout,
}

impl RecordCodec {
    pub fn new(discriminant: impl Into<String>, layout: Layout) -> Self {
        RecordCodec {
            discriminant: discriminant.into(),
            layout,
        }
    }

    /// `{"<d>": "some", "some": 1}`
    pub fn tag_keyed(discriminant: impl Into<String>) -> Self {
        Self::new(discriminant, Layout::TagKeyed)
    }

    /// `{"<d>": "some", "<field>": 1}`
    pub fn payload_field(discriminant: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(discriminant, Layout::Field(field.into()))
    }

    /// `{"<d>": "a", "a": 1}` with the whole record as payload
    pub fn whole_record(discriminant: impl Into<String>) -> Self {
        Self::new(discriminant, Layout::Whole)
    }

    pub fn discriminant(&self) -> &str {
        &self.discriminant
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn decode(&self, record: Value) -> Result<Tagged<Value>, RecordError> {
        let mut map = match record {
            Value::Object(map) => map,
            other => return Err(RecordError::NotAnObject(other)),
        };

        let tag = match map.get(&self.discriminant) {
            None => return Err(RecordError::MissingDiscriminant(self.discriminant.clone())),
            Some(Value::String(tag)) if tag.is_empty() => {
                return Err(RecordError::EmptyLabel(self.discriminant.clone()))
            }
            Some(Value::String(tag)) => tag.clone(),
            Some(other) => {
                return Err(RecordError::DiscriminantNotString {
                    field: self.discriminant.clone(),
                    actual: other.clone(),
                })
            }
        };

        let payload = match &self.layout {
            Layout::TagKeyed if tag == self.discriminant => None,
            Layout::TagKeyed => map.remove(&tag),
            Layout::Field(field) if *field == self.discriminant => None,
            Layout::Field(field) => map.remove(field),
            Layout::Whole => Some(Value::Object(map)),
        };

        Ok(Tagged::from_parts(tag, payload))
    }

    /// Decode and deserialise the payload into `T`
    pub fn decode_as<T: DeserializeOwned>(&self, record: Value) -> Result<Tagged<T>, RecordError> {
        let (tag, payload) = self.decode(record)?.into_parts();
        let payload = payload.map(serde_json::from_value).transpose()?;
        Ok(Tagged::from_parts(tag, payload))
    }

    pub fn encode(&self, value: Tagged<Value>) -> Result<Value, RecordError> {
        let (tag, payload) = value.into_parts();
        let mut map = Map::new();

        match (&self.layout, payload) {
            (_, None) => {}
            (Layout::TagKeyed, Some(payload)) => {
                if tag == self.discriminant {
                    return Err(RecordError::PayloadFieldCollision(tag));
                }
                map.insert(tag.clone(), payload);
            }
            (Layout::Field(field), Some(payload)) => {
                if *field == self.discriminant {
                    return Err(RecordError::PayloadFieldCollision(field.clone()));
                }
                map.insert(field.clone(), payload);
            }
            (Layout::Whole, Some(Value::Object(fields))) => map = fields,
            (Layout::Whole, Some(other)) => return Err(RecordError::NotAnObject(other)),
        }

        map.insert(self.discriminant.clone(), Value::String(tag));
        Ok(Value::Object(map))
    }

    /// Serialise a typed payload and encode the result
    pub fn encode_from<T: Serialize>(&self, value: Tagged<T>) -> Result<Value, RecordError> {
        let (tag, payload) = value.into_parts();
        let payload = payload.map(serde_json::to_value).transpose()?;
        self.encode(Tagged::from_parts(tag, payload))
    }

    /// Decode `record` and start a dispatch on it
    pub fn matching(&self, record: Value) -> Result<Matcher<Value>, RecordError> {
        self.decode(record).map(Matcher::new)
    }
}

/// Bind a discriminant field once, then dispatch whole records on it.
///
/// Handlers receive the complete record, discriminant included.
pub fn create_matcher(
    discriminant: impl Into<String>,
) -> impl Fn(Value) -> Result<Matcher<Value>, RecordError> {
    let codec = RecordCodec::whole_record(discriminant);
    move |record| codec.matching(record)
}
