//! The product record and the partial update applied by `PUT`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// A single catalogue entry.
///
/// Only `id` is typed. Every other field (`name`, `description`, `price`, or
/// anything else the client sent) is kept as the JSON value it arrived as, so
/// a created product echoes back and persists verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Product {
    pub fn new(id: i64, name: &str, description: &str, price: f64) -> Self {
        let mut fields = Map::new();
        fields.insert("name".into(), json!(name));
        fields.insert("description".into(), json!(description));
        fields.insert("price".into(), json!(price));
        Self { id, fields }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Body of an update request. Every field is optional and untyped.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
}

impl ProductPatch {
    /// Produces the replacement for `current`.
    ///
    /// A field counts as provided only when it is truthy: absent, `null`,
    /// `false`, `0` and `""` keep the stored value. The result holds exactly
    /// `id`, `name`, `description` and `price`; unknown fields on the stored
    /// product do not survive an update, and a field neither side has stays
    /// absent.
    pub fn apply(self, current: &Product) -> Product {
        let mut fields = Map::new();
        for (key, incoming) in [
            ("name", self.name),
            ("description", self.description),
            ("price", self.price),
        ] {
            let value = incoming
                .filter(is_truthy)
                .or_else(|| current.fields.get(key).cloned());
            if let Some(value) = value {
                fields.insert(key.to_owned(), value);
            }
        }
        Product { id: current.id, fields }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
