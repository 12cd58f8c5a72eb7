//! Entity model.
//!
//! ALM represents every entity as a type name plus a list of named,
//! multi-valued fields. [`Entity`] models that shape directly; the typed
//! wrappers add the kind and a handful of accessors on top.

mod collection;
mod entity;
mod typed;

pub use collection::{Collection, RunSteps, TestInstances};
pub use entity::{Entity, Field, FieldValue};
pub use typed::{Attachment, Run, RunStep, Test, TestInstance, TestSet, TypedEntity};
