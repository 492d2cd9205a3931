// Variant constructors

use crate::data::Tagged;

/// Build a value that carries only its discriminant.
pub fn tag_only<P>(label: impl Into<String>) -> Tagged<P> {
    Tagged::from_parts(label.into(), None)
}

/// Build a payload constructor for `label`.
///
/// The returned closure can be called any number of times; each call yields
/// an independent value. Labels are not checked for collisions here, see
/// [`crate::schema::TagSchema`] for that.
pub fn tag_with_payload<P>(label: impl Into<String>) -> impl Fn(P) -> Tagged<P> {
    let label = label.into();
    move |payload| Tagged::from_parts(label.clone(), Some(payload))
}

/// A named constructor for one alternative, reusable across call sites.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variant {
    label: String,
}

impl Variant {
    pub fn new(label: impl Into<String>) -> Self {
        Variant {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Tag-only instance of this variant
    pub fn unit<P>(&self) -> Tagged<P> {
        tag_only(self.label.as_str())
    }

    /// Instance of this variant carrying `payload`
    pub fn with<P>(&self, payload: P) -> Tagged<P> {
        Tagged::from_parts(self.label.clone(), Some(payload))
    }

    pub fn is<P>(&self, value: &Tagged<P>) -> bool {
        value.is(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_only_is_structurally_equal() {
        let first: Tagged<()> = tag_only("x");
        let second: Tagged<()> = tag_only("x");
        assert_eq!(first, second);
        assert!(!first.has_payload());
    }

    #[test]
    fn payload_builder_is_reusable() {
        let increase_by = tag_with_payload("increBy");
        let two = increase_by(2);
        let three = increase_by(3);
        assert_eq!(two.tag(), "increBy");
        assert_eq!(two.payload(), Some(&2));
        assert_eq!(three.payload(), Some(&3));
    }

    #[test]
    fn variant_matches_its_own_values() {
        let some = Variant::new("some");
        let value = some.with(1);
        assert!(some.is(&value));
        assert!(!Variant::new("none").is(&value));
        assert_eq!(some.unit::<i32>().tag(), "some");
    }
}
