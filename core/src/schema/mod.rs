#![deny(missing_docs)]

//! # Extended JSON Schema
//!
//! Defines the extended JSON Schema tree authored by callers ([`SchemaEx`])
//! and the gateway-dialect tree handed to the provisioning collaborator
//! ([`GatewaySchema`]), plus the translation producing both from one
//! authored tree.
//!
//! `SchemaEx` extends the gateway schema vocabulary with,
//!
//! ```text
//! - example: example value (OpenAPI dialect only).
//! - modelRef: reference to a registered model.
//! ```

pub mod translate;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::models::ModelRef;

pub use translate::{translate_schema, TranslatedSchema};

/// The seven JSON Schema primitive type tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    /// JSON null.
    Null,
    /// JSON boolean.
    Boolean,
    /// JSON object.
    Object,
    /// JSON array.
    Array,
    /// JSON number.
    Number,
    /// Integral JSON number.
    Integer,
    /// JSON string.
    String,
}

impl JsonType {
    /// Returns the dialect string for the type token.
    pub fn as_str(self) -> &'static str {
        match self {
            JsonType::Null => "null",
            JsonType::Boolean => "boolean",
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
            JsonType::String => "string",
        }
    }
}

/// A `type` keyword value: one type token or a list of tokens.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypeSpec {
    /// A single type token.
    One(JsonType),
    /// A list of type tokens.
    Many(Vec<JsonType>),
}

/// A subschema keyword value holding one schema or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A single subschema.
    One(Box<T>),
    /// A list of subschemas.
    Many(Vec<T>),
}

/// An `additionalProperties` keyword value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BoolOrSchema<T> {
    /// Permits or forbids undeclared properties wholesale.
    Bool(bool),
    /// Constrains undeclared properties with a subschema.
    Schema(Box<T>),
}

/// A single `dependencies` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Dependency<T> {
    /// Property dependency: the listed properties become required.
    Keys(Vec<String>),
    /// Schema dependency.
    Schema(Box<T>),
}

/// Extended JSON Schema node.
///
/// Every field is optional and absent fields stay absent in both translated
/// dialects. `example` only reaches the OpenAPI dialect; `model_ref` is
/// consumed by translation and never serialized. When both `reference` and
/// `model_ref` are set, `model_ref` wins and the raw reference is dropped
/// with a warning.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaEx {
    /// Schema identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// JSON Schema dialect URI.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Raw schema reference. Superseded by `model_ref` when both are set.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Type token(s) of the value.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSpec>,
    /// Format hint, e.g. `int64`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Title of the schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description of the schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Example value (OpenAPI dialect only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Permitted values.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Number must be a multiple of this value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    /// Inclusive upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Treat `maximum` as exclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
    /// Inclusive lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Treat `minimum` as exclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,
    /// Maximum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Minimum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Regular expression the string must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Maximum number of items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    /// Minimum number of items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    /// Items must be unique.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
    /// Maximum number of properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
    /// Minimum number of properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    /// Names of required properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Negated subschema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<SchemaEx>>,
    /// Subschema constraining property names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_names: Option<Box<SchemaEx>>,
    /// Value must match all of these subschemas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<SchemaEx>>,
    /// Value must match at least one of these subschemas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaEx>>,
    /// Value must match exactly one of these subschemas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaEx>>,
    /// Subschemas for items beyond the tuple-form `items`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<Vec<SchemaEx>>,
    /// Item subschema, or tuple of subschemas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<OneOrMany<SchemaEx>>,
    /// At least one item must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<OneOrMany<SchemaEx>>,
    /// Subschemas by property name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaEx>>,
    /// Subschemas by property-name pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<IndexMap<String, SchemaEx>>,
    /// Reusable subschema definitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<IndexMap<String, SchemaEx>>,
    /// Undeclared-property policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<BoolOrSchema<SchemaEx>>,
    /// Property or schema dependencies by property name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<IndexMap<String, Dependency<SchemaEx>>>,
    /// Weak reference to a registered model.
    #[serde(skip)]
    pub model_ref: Option<ModelRef>,
}

/// Gateway-dialect schema node handed to the provisioning collaborator.
///
/// Structurally the extended schema minus `example` and `model_ref`; after
/// translation its `reference` holds the external model URL. A distinct type
/// so the two dialects cannot be confused at the collaborator seam.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySchema {
    /// Schema identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// JSON Schema dialect URI.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Schema reference; an external model URL after translation.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Type token(s) of the value.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSpec>,
    /// Format hint, e.g. `int64`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Title of the schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description of the schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Permitted values.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Number must be a multiple of this value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    /// Inclusive upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Treat `maximum` as exclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
    /// Inclusive lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Treat `minimum` as exclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,
    /// Maximum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Minimum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Regular expression the string must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Maximum number of items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    /// Minimum number of items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    /// Items must be unique.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
    /// Maximum number of properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
    /// Minimum number of properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    /// Names of required properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Negated subschema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<GatewaySchema>>,
    /// Subschema constraining property names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_names: Option<Box<GatewaySchema>>,
    /// Value must match all of these subschemas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<GatewaySchema>>,
    /// Value must match at least one of these subschemas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<GatewaySchema>>,
    /// Value must match exactly one of these subschemas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<GatewaySchema>>,
    /// Subschemas for items beyond the tuple-form `items`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<Vec<GatewaySchema>>,
    /// Item subschema, or tuple of subschemas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<OneOrMany<GatewaySchema>>,
    /// At least one item must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<OneOrMany<GatewaySchema>>,
    /// Subschemas by property name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, GatewaySchema>>,
    /// Subschemas by property-name pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<IndexMap<String, GatewaySchema>>,
    /// Reusable subschema definitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<IndexMap<String, GatewaySchema>>,
    /// Undeclared-property policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<BoolOrSchema<GatewaySchema>>,
    /// Property or schema dependencies by property name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<IndexMap<String, Dependency<GatewaySchema>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let schema = SchemaEx {
            schema_type: Some(TypeSpec::One(JsonType::String)),
            ..SchemaEx::default()
        };
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value, json!({"type": "string"}));
    }

    #[test]
    fn test_union_keywords_serialize_untagged() {
        let schema = SchemaEx {
            schema_type: Some(TypeSpec::Many(vec![JsonType::String, JsonType::Null])),
            additional_properties: Some(BoolOrSchema::Bool(false)),
            items: Some(OneOrMany::One(Box::new(SchemaEx {
                schema_type: Some(TypeSpec::One(JsonType::Integer)),
                ..SchemaEx::default()
            }))),
            ..SchemaEx::default()
        };
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(
            value,
            json!({
                "type": ["string", "null"],
                "items": {"type": "integer"},
                "additionalProperties": false,
            })
        );
    }

    #[test]
    fn test_model_ref_is_not_serialized() {
        let schema = SchemaEx {
            model_ref: Some(ModelRef::new("${Token[TOKEN.1]}")),
            ..SchemaEx::default()
        };
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value, json!({}));
    }
}
