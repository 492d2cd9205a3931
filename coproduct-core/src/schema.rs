// Tag schema - the contract shared by a family of variants

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::data::{Tagged, FALLBACK_KEY};
use crate::error::SchemaError;
use crate::matcher::Handlers;
use crate::record::RecordCodec;
use crate::variant::Variant;

/// Where a record keeps its payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Under a field named after the label: `{"tag": "some", "some": 1}`
    #[default]
    TagKeyed,
    /// Under one fixed field: `{"tag": "some", "value": 1}`
    Field(String),
    /// The whole record is the payload: `{"type": "a", "a": 1}`
    Whole,
}

/// One declared alternative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSchema {
    pub label: String,
    #[serde(default)]
    pub payload: bool,
}

impl VariantSchema {
    pub fn unit(label: impl Into<String>) -> Self {
        VariantSchema {
            label: label.into(),
            payload: false,
        }
    }

    pub fn data(label: impl Into<String>) -> Self {
        VariantSchema {
            label: label.into(),
            payload: true,
        }
    }
}

#[derive(Deserialize)]
struct RawTagSchema {
    discriminant: String,
    #[serde(default)]
    layout: Layout,
    variants: Vec<VariantSchema>,
}

/// A closed set of variants sharing one discriminant field.
///
/// Construction rejects empty names, the reserved `_` label and duplicate
/// labels. Deserialisation goes through the same checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTagSchema")]
pub struct TagSchema {
    discriminant: String,
    layout: Layout,
    variants: Vec<VariantSchema>,
}

impl TryFrom<RawTagSchema> for TagSchema {
    type Error = SchemaError;

    fn try_from(raw: RawTagSchema) -> Result<Self, Self::Error> {
        TagSchema::new(raw.discriminant, raw.layout, raw.variants)
    }
}

impl TagSchema {
    pub fn new(
        discriminant: impl Into<String>,
        layout: Layout,
        variants: Vec<VariantSchema>,
    ) -> Result<Self, SchemaError> {
        let schema = TagSchema {
            discriminant: discriminant.into(),
            layout,
            variants,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Re-run the construction checks
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.discriminant.is_empty() {
            return Err(SchemaError::EmptyDiscriminant);
        }

        if let Layout::Field(field) = &self.layout {
            if *field == self.discriminant {
                return Err(SchemaError::PayloadFieldCollision(field.clone()));
            }
        }

        let mut seen = HashSet::new();
        for (i, variant) in self.variants.iter().enumerate() {
            if variant.label.is_empty() {
                return Err(SchemaError::EmptyLabel(i));
            }
            if variant.label == FALLBACK_KEY {
                return Err(SchemaError::ReservedLabel);
            }
            if self.layout == Layout::TagKeyed && variant.payload && variant.label == self.discriminant
            {
                return Err(SchemaError::PayloadFieldCollision(variant.label.clone()));
            }
            if !seen.insert(variant.label.as_str()) {
                return Err(SchemaError::DuplicateLabel(variant.label.clone()));
            }
        }

        Ok(())
    }

    pub fn discriminant(&self) -> &str {
        &self.discriminant
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn variants(&self) -> &[VariantSchema] {
        &self.variants
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| v.label.as_str())
    }

    pub fn variant(&self, label: &str) -> Option<&VariantSchema> {
        self.variants.iter().find(|v| v.label == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.variant(label).is_some()
    }

    /// Constructor for a declared label
    pub fn constructor(&self, label: &str) -> Option<Variant> {
        self.variant(label).map(|v| Variant::new(v.label.as_str()))
    }

    /// True when `value` carries a declared label with the declared payload shape
    pub fn admits<P>(&self, value: &Tagged<P>) -> bool {
        match self.variant(value.tag()) {
            Some(variant) => !variant.payload || value.has_payload(),
            None => false,
        }
    }

    /// Declared labels with no dedicated handler, in declaration order
    pub fn uncovered<P, R>(&self, handlers: &Handlers<'_, P, R>) -> Vec<&str> {
        self.labels()
            .filter(|label| !handlers.handles(label))
            .collect()
    }

    /// True when every declared label is handled or a fallback exists
    pub fn is_covered_by<P, R>(&self, handlers: &Handlers<'_, P, R>) -> bool {
        handlers.has_fallback() || self.uncovered(handlers).is_empty()
    }

    /// Record adapter for this schema's discriminant and layout
    pub fn codec(&self) -> RecordCodec {
        RecordCodec::new(self.discriminant.as_str(), self.layout.clone())
    }
}
