#![deny(missing_docs)]

//! # OpenAPI Adapter
//!
//! Converts OpenAPI-dialect schemas, model maps, and method responses into
//! the document fragments stored by the builder: Schema Objects, Request
//! Body Objects, and Responses Objects.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::error::AppResult;
use crate::models::{MethodResponse, ModelRef};
use crate::provision::ReferenceResolver;
use crate::schema::{BoolOrSchema, OneOrMany, SchemaEx, TypeSpec};

/// Converts an OpenAPI-dialect schema into a Schema Object, or a Reference
/// Object when its reference is set.
///
/// The following keywords have no equivalent in the target dialect and are
/// dropped with a warning,
///
/// ```text
/// - additionalItems
/// - contains
/// - definitions
/// - dependencies
/// - id
/// - patternProperties
/// - propertyNames
/// - $schema
/// ```
///
/// If the reference is set, every other keyword is dropped and a bare
/// Reference Object is returned. A tuple-form `items` is dropped. A `type`
/// holding a list of tokens is treated as the single type `array`.
pub fn schema_to_schema_object(schema: &SchemaEx) -> Value {
    if schema.additional_items.is_some() {
        warn_dropped("additionalItems");
    }
    if schema.contains.is_some() {
        warn_dropped("contains");
    }
    if schema.definitions.is_some() {
        warn_dropped("definitions");
    }
    if schema.dependencies.is_some() {
        warn_dropped("dependencies");
    }
    if schema.id.is_some() {
        warn_dropped("id");
    }
    if schema.pattern_properties.is_some() {
        warn_dropped("patternProperties");
    }
    if schema.property_names.is_some() {
        warn_dropped("propertyNames");
    }
    if schema.schema.is_some() {
        warn_dropped("$schema");
    }
    if let Some(reference) = &schema.reference {
        // ignores other keywords and returns a Reference Object
        let reference_only = SchemaEx {
            reference: None,
            ..schema.clone()
        };
        if reference_only != SchemaEx::default() {
            tracing::warn!("schema_to_schema_object: other properties than ref are ignored");
        }
        return json!({"$ref": reference});
    }

    let mut out = Map::new();
    if let Some(additional_properties) = &schema.additional_properties {
        let value = match additional_properties {
            BoolOrSchema::Bool(value) => json!(value),
            BoolOrSchema::Schema(subschema) => schema_to_schema_object(subschema),
        };
        out.insert("additionalProperties".to_string(), value);
    }
    if let Some(all_of) = &schema.all_of {
        out.insert("allOf".to_string(), schema_list_value(all_of));
    }
    if let Some(any_of) = &schema.any_of {
        out.insert("anyOf".to_string(), schema_list_value(any_of));
    }
    if let Some(default) = &schema.default {
        out.insert("default".to_string(), default.clone());
    }
    if let Some(description) = &schema.description {
        out.insert("description".to_string(), json!(description));
    }
    if let Some(enum_values) = &schema.enum_values {
        out.insert("enum".to_string(), json!(enum_values));
    }
    if let Some(example) = &schema.example {
        out.insert("example".to_string(), example.clone());
    }
    if let Some(exclusive_maximum) = schema.exclusive_maximum {
        out.insert("exclusiveMaximum".to_string(), json!(exclusive_maximum));
    }
    if let Some(exclusive_minimum) = schema.exclusive_minimum {
        out.insert("exclusiveMinimum".to_string(), json!(exclusive_minimum));
    }
    if let Some(format) = &schema.format {
        out.insert("format".to_string(), json!(format));
    }
    if let Some(items) = &schema.items {
        match items {
            OneOrMany::One(subschema) => {
                out.insert("items".to_string(), schema_to_schema_object(subschema));
            }
            OneOrMany::Many(_) => {
                // the target dialect has no tuple form
                warn_dropped("items as a schema list");
            }
        }
    }
    if let Some(max_items) = schema.max_items {
        out.insert("maxItems".to_string(), json!(max_items));
    }
    if let Some(max_length) = schema.max_length {
        out.insert("maxLength".to_string(), json!(max_length));
    }
    if let Some(max_properties) = schema.max_properties {
        out.insert("maxProperties".to_string(), json!(max_properties));
    }
    if let Some(maximum) = schema.maximum {
        out.insert("maximum".to_string(), json!(maximum));
    }
    if let Some(min_items) = schema.min_items {
        out.insert("minItems".to_string(), json!(min_items));
    }
    if let Some(min_length) = schema.min_length {
        out.insert("minLength".to_string(), json!(min_length));
    }
    if let Some(min_properties) = schema.min_properties {
        out.insert("minProperties".to_string(), json!(min_properties));
    }
    if let Some(minimum) = schema.minimum {
        out.insert("minimum".to_string(), json!(minimum));
    }
    if let Some(multiple_of) = schema.multiple_of {
        out.insert("multipleOf".to_string(), json!(multiple_of));
    }
    if let Some(not) = &schema.not {
        out.insert("not".to_string(), schema_to_schema_object(not));
    }
    if let Some(one_of) = &schema.one_of {
        out.insert("oneOf".to_string(), schema_list_value(one_of));
    }
    if let Some(pattern) = &schema.pattern {
        out.insert("pattern".to_string(), json!(pattern));
    }
    if let Some(properties) = &schema.properties {
        let mut map = Map::new();
        for (key, subschema) in properties {
            map.insert(key.clone(), schema_to_schema_object(subschema));
        }
        out.insert("properties".to_string(), Value::Object(map));
    }
    if let Some(required) = &schema.required {
        out.insert("required".to_string(), json!(required));
    }
    if let Some(title) = &schema.title {
        out.insert("title".to_string(), json!(title));
    }
    if let Some(schema_type) = &schema.schema_type {
        out.insert("type".to_string(), json!(type_token(schema_type)));
    }
    if let Some(unique_items) = schema.unique_items {
        out.insert("uniqueItems".to_string(), json!(unique_items));
    }
    Value::Object(out)
}

/// Maps a `type` keyword value onto the target dialect's single token.
///
/// A list of tokens is treated as the `array` type. The token mapping itself
/// is total: the authoring type is a closed enum over the seven primitive
/// names.
fn type_token(schema_type: &TypeSpec) -> &'static str {
    match schema_type {
        TypeSpec::One(token) => token.as_str(),
        TypeSpec::Many(_) => "array",
    }
}

fn schema_list_value(schemas: &[SchemaEx]) -> Value {
    Value::Array(schemas.iter().map(schema_to_schema_object).collect())
}

fn warn_dropped(keyword: &str) {
    tracing::warn!(
        keyword,
        "schema_to_schema_object: keyword is specified but ignored"
    );
}

/// Converts given request models into a Request Body Object.
///
/// One content entry is produced per content type; its schema is always a
/// reference to the resolved model identifier, never an inline schema.
///
/// # Errors
///
/// `AppError::UnresolvedReference` if a model identifier cannot be resolved.
pub fn request_models_to_request_body(
    resolver: &dyn ReferenceResolver,
    request_models: &IndexMap<String, ModelRef>,
) -> AppResult<Value> {
    Ok(json!({
        "content": model_map_to_content(resolver, request_models)?,
    }))
}

/// Converts given method responses into a Responses Object.
///
/// The description defaults to `"<status-code> response"` when not authored;
/// the content map is omitted entirely for a response declaring no models.
///
/// # Errors
///
/// `AppError::UnresolvedReference` if a model identifier cannot be resolved.
pub fn method_responses_to_responses(
    resolver: &dyn ReferenceResolver,
    method_responses: &[MethodResponse],
) -> AppResult<Value> {
    let mut responses = Map::new();
    for response in method_responses {
        let mut entry = Map::new();
        let description = response
            .description
            .clone()
            .unwrap_or_else(|| format!("{} response", response.status_code));
        entry.insert("description".to_string(), json!(description));
        if let Some(models) = &response.response_models {
            entry.insert(
                "content".to_string(),
                model_map_to_content(resolver, models)?,
            );
        }
        responses.insert(response.status_code.clone(), Value::Object(entry));
    }
    Ok(Value::Object(responses))
}

/// Converts a model map into a Content Object.
fn model_map_to_content(
    resolver: &dyn ReferenceResolver,
    model_map: &IndexMap<String, ModelRef>,
) -> AppResult<Value> {
    let mut content = Map::new();
    for (content_type, model) in model_map {
        let model_id = resolver.resolve(&model.model_id)?;
        content.insert(
            content_type.clone(),
            json!({
                "schema": {
                    "$ref": format!("#/components/schemas/{}", model_id),
                },
            }),
        );
    }
    Ok(Value::Object(content))
}
