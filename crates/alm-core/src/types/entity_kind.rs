//! Entity kind names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// The entity kinds this client addresses.
///
/// Each kind has a singular name, used in the `Type` of an entity body, and
/// a plural collection segment, used in REST URLs.
///
/// # Example
///
/// ```
/// use alm_core::EntityKind;
///
/// let kind: EntityKind = "test-set".parse().unwrap();
/// assert_eq!(kind, EntityKind::TestSet);
/// assert_eq!(kind.collection(), "test-sets");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Test,
    TestSet,
    TestInstance,
    Run,
    RunStep,
    Attachment,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Test,
        EntityKind::TestSet,
        EntityKind::TestInstance,
        EntityKind::Run,
        EntityKind::RunStep,
        EntityKind::Attachment,
    ];

    /// Returns the singular entity type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Test => "test",
            EntityKind::TestSet => "test-set",
            EntityKind::TestInstance => "test-instance",
            EntityKind::Run => "run",
            EntityKind::RunStep => "run-step",
            EntityKind::Attachment => "attachment",
        }
    }

    /// Returns the REST collection segment.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Test => "tests",
            EntityKind::TestSet => "test-sets",
            EntityKind::TestInstance => "test-instances",
            EntityKind::Run => "runs",
            EntityKind::RunStep => "run-steps",
            EntityKind::Attachment => "attachments",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                InvalidInputError::EntityKind {
                    value: s.to_string(),
                }
                .into()
            })
    }
}
