//! Typed entity wrappers.

use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use crate::types::EntityKind;

/// Fields the server maintains on every entity.
const COMMON_SERVER_MANAGED: &[&str] = &["id", "ver-stamp", "last-modified"];

/// An entity of a known kind.
pub trait TypedEntity:
    Serialize + DeserializeOwned + From<Entity> + Send + Sync + 'static
{
    /// The kind every value of this type carries.
    const KIND: EntityKind;

    /// Kind-specific fields the server rejects on update.
    const SERVER_MANAGED: &'static [&'static str] = &[];

    fn entity(&self) -> &Entity;

    fn entity_mut(&mut self) -> &mut Entity;

    /// Strip server-managed fields so an update does not resubmit them.
    fn clear_before_update(&mut self) {
        for name in COMMON_SERVER_MANAGED.iter().chain(Self::SERVER_MANAGED) {
            self.entity_mut().remove_field(name);
        }
    }
}

macro_rules! typed_entity {
    ($(#[$meta:meta])* $name:ident, $kind:expr, [$($managed:literal),* $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Entity);

        impl $name {
            /// Create an empty entity of this kind.
            pub fn new() -> Self {
                Self(Entity::new($kind.as_str()))
            }

            /// Builder form of [`Entity::set_field`].
            pub fn with_field(self, name: impl Into<String>, value: impl Into<String>) -> Self {
                Self(self.0.with_field(name, value))
            }

            pub fn into_entity(self) -> Entity {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Entity> for $name {
            fn from(entity: Entity) -> Self {
                Self(entity)
            }
        }

        impl Deref for $name {
            type Target = Entity;

            fn deref(&self) -> &Entity {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Entity {
                &mut self.0
            }
        }

        impl TypedEntity for $name {
            const KIND: EntityKind = $kind;
            const SERVER_MANAGED: &'static [&'static str] = &[$($managed),*];

            fn entity(&self) -> &Entity {
                &self.0
            }

            fn entity_mut(&mut self) -> &mut Entity {
                &mut self.0
            }
        }
    };
}

typed_entity!(
    /// A test in the test plan.
    Test,
    EntityKind::Test,
    []
);

typed_entity!(
    /// A test set (the server calls it a cycle).
    TestSet,
    EntityKind::TestSet,
    []
);

typed_entity!(
    /// A test placed in a test set.
    TestInstance,
    EntityKind::TestInstance,
    []
);

typed_entity!(
    /// One execution of a test instance.
    Run,
    EntityKind::Run,
    ["test-id", "cycle-id"]
);

typed_entity!(
    /// A step of a run.
    RunStep,
    EntityKind::RunStep,
    ["parent-id", "test-id"]
);

typed_entity!(
    /// File metadata attached to a run or run step.
    Attachment,
    EntityKind::Attachment,
    ["file-size", "ref-type", "ref-subtype"]
);

impl Test {
    pub fn name(&self) -> Option<&str> {
        self.field("name")
    }
}

impl TestSet {
    pub fn name(&self) -> Option<&str> {
        self.field("name")
    }
}

impl TestInstance {
    pub fn test_id(&self) -> Option<&str> {
        self.field("test-id")
    }

    /// The owning test set (`cycle-id`).
    pub fn test_set_id(&self) -> Option<&str> {
        self.field("cycle-id")
    }

    pub fn status(&self) -> Option<&str> {
        self.field("status")
    }
}

impl Run {
    /// Start a run of the given test instance.
    ///
    /// The server derives `test-id` and `cycle-id` from the instance, but
    /// requires them on create, so they are copied when known.
    pub fn for_test_instance(instance: &TestInstance, name: impl Into<String>) -> Self {
        let mut run = Run::new().with_field("name", name);
        if let Some(id) = instance.id() {
            run.set_field("testcycl-id", id);
        }
        if let Some(test_id) = instance.test_id() {
            run.set_field("test-id", test_id);
        }
        if let Some(set_id) = instance.test_set_id() {
            run.set_field("cycle-id", set_id);
        }
        run
    }

    pub fn name(&self) -> Option<&str> {
        self.field("name")
    }

    pub fn status(&self) -> Option<&str> {
        self.field("status")
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.set_field("status", status);
    }

    /// The executed test instance (`testcycl-id`).
    pub fn test_instance_id(&self) -> Option<&str> {
        self.field("testcycl-id")
    }
}

impl RunStep {
    /// The owning run (`parent-id`).
    pub fn run_id(&self) -> Option<&str> {
        self.field("parent-id")
    }

    pub fn name(&self) -> Option<&str> {
        self.field("name")
    }

    pub fn status(&self) -> Option<&str> {
        self.field("status")
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.set_field("status", status);
    }
}

impl Attachment {
    pub fn name(&self) -> Option<&str> {
        self.field("name")
    }

    pub fn file_size(&self) -> Option<u64> {
        self.field("file-size").and_then(|s| s.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_carries_kind() {
        assert_eq!(Run::new().kind(), "run");
        assert_eq!(RunStep::new().kind(), "run-step");
        assert_eq!(TestSet::new().kind(), "test-set");
    }

    #[test]
    fn serializes_transparently() {
        let run = Run::new().with_field("status", "Passed");
        assert_eq!(
            serde_json::to_value(&run).unwrap(),
            json!({"Type": "run", "Fields": [{"Name": "status", "values": [{"value": "Passed"}]}]})
        );
    }

    #[test]
    fn clear_before_update_strips_common_and_kind_fields() {
        let mut step = RunStep::new()
            .with_field("id", "55")
            .with_field("parent-id", "12")
            .with_field("ver-stamp", "3")
            .with_field("status", "Failed")
            .with_field("actual", "button missing");

        step.clear_before_update();

        let names: Vec<_> = step.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["status", "actual"]);
    }

    #[test]
    fn run_for_test_instance_copies_ids() {
        let instance = TestInstance::new()
            .with_field("id", "301")
            .with_field("test-id", "17")
            .with_field("cycle-id", "4");

        let run = Run::for_test_instance(&instance, "Run_1");

        assert_eq!(run.name(), Some("Run_1"));
        assert_eq!(run.test_instance_id(), Some("301"));
        assert_eq!(run.field("test-id"), Some("17"));
        assert_eq!(run.field("cycle-id"), Some("4"));
    }

    #[test]
    fn attachment_file_size() {
        let attachment = Attachment::new()
            .with_field("name", "log.txt")
            .with_field("file-size", "2048");
        assert_eq!(attachment.name(), Some("log.txt"));
        assert_eq!(attachment.file_size(), Some(2048));
    }
}
