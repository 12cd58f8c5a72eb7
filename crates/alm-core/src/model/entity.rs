//! Generic entity representation.

use serde::{Deserialize, Serialize};

/// An ALM entity as exchanged on the wire.
///
/// ```json
/// {"Type":"run","Fields":[{"Name":"status","values":[{"value":"Passed"}]}]}
/// ```
///
/// Field order is preserved. Unknown top-level keys sent by the server
/// (`children-count` and friends) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "Type")]
    kind: String,

    #[serde(rename = "Fields", default)]
    fields: Vec<Field>,
}

/// A named field holding zero or more values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(default)]
    pub values: Vec<FieldValue>,
}

/// A single field value. The server sends `{}` for an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Entity {
    /// Create an entity of the given type with no fields.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Vec::new(),
        }
    }

    /// Returns the entity type name, e.g. `run-step`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns all fields in wire order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the `id` field.
    pub fn id(&self) -> Option<&str> {
        self.field("id")
    }

    /// Returns the first non-empty value of a field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.field_values(name).next()
    }

    /// Returns every non-empty value of a field.
    pub fn field_values<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a str> + use<'a, 'n> {
        self.fields
            .iter()
            .filter(move |f| f.name == name)
            .flat_map(|f| f.values.iter())
            .filter_map(|v| v.value.as_deref())
    }

    /// Set a single-valued field, replacing any existing values.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let values = vec![FieldValue {
            value: Some(value.into()),
        }];

        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.values = values,
            None => self.fields.push(Field { name, values }),
        }
    }

    /// Builder form of [`Entity::set_field`].
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    /// Remove a field. Returns true if it was present.
    pub fn remove_field(&mut self, name: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.name != name);
        self.fields.len() != before
    }
}
