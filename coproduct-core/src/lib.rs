//! Tagged values over closed sets of alternatives, and safe dispatch on them.
//!
//! Values are built with [`tag_only`] and [`tag_with_payload`] (or the
//! reference [`some`], [`none`], [`ok`] and [`err`] constructors) and routed to
//! handlers with [`matching`]:
//!
//! ```
//! use coproduct_core::{matching, some, Handlers};
//!
//! let shown = matching(some(1))
//!     .case(
//!         Handlers::new()
//!             .on("some", |v: i32| format!("some: {}", v))
//!             .on_unit("none", || "none".to_string()),
//!     )
//!     .unwrap();
//! assert_eq!(shown, "some: 1");
//! ```
//!
//! Records from outside the type system go through a [`RecordCodec`] first.

pub mod data;
pub mod error;
pub mod matcher;
pub mod record;
pub mod reference;
pub mod schema;
pub mod variant;

pub use data::{Tagged, FALLBACK_KEY};
pub use error::{CoproductError, DispatchFailure, FailureReason, RecordError, SchemaError};
pub use matcher::{matching, Handlers, Matcher};
pub use record::{create_matcher, RecordCodec};
pub use reference::{err, none, ok, some, Coproduct, ERR, NONE, OK, SOME};
pub use schema::{Layout, TagSchema, VariantSchema};
pub use variant::{tag_only, tag_with_payload, Variant};
