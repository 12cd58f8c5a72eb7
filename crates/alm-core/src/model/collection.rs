//! Entity collections.

use serde::{Deserialize, Serialize};

use super::typed::{RunStep, TestInstance};

/// A list of entities as returned by collection endpoints.
///
/// ```json
/// {"entities":[...],"TotalResults":2}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub entities: Vec<T>,

    #[serde(rename = "TotalResults", default)]
    pub total_results: u32,
}

/// Test instances of a test set.
pub type TestInstances = Collection<TestInstance>;

/// Steps of a run.
pub type RunSteps = Collection<RunStep>;

impl<T> Collection<T> {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entities.iter()
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}
