#![deny(missing_docs)]

//! # Schema Translation
//!
//! Walks one authored [`SchemaEx`] tree and produces the two output dialects
//! in a single recursive pass: the gateway-dialect schema for the
//! provisioning collaborator and the OpenAPI-dialect schema for the
//! document.
//!
//! Interpretation of `model_ref` differs between the two,
//!
//! ```text
//! - interpreted as an external model URL for the gateway schema.
//! - interpreted as an internal component pointer for the OpenAPI schema.
//! ```

use indexmap::IndexMap;

use crate::error::AppResult;
use crate::provision::ReferenceResolver;

use super::{BoolOrSchema, Dependency, GatewaySchema, OneOrMany, SchemaEx};

/// Base URL of external gateway model references.
const GATEWAY_MODEL_BASE: &str = "https://apigateway.amazonaws.com/restapis";

/// Output of [`translate_schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedSchema {
    /// Gateway-dialect schema for the provisioning collaborator.
    pub gateway: GatewaySchema,
    /// OpenAPI-dialect schema for the document.
    pub document: SchemaEx,
}

/// Translates a given extended schema into both output dialects.
///
/// The input is never mutated; two fresh trees are produced and translating
/// the same tree twice yields identical outputs. Every nested schema is
/// translated by the same recursive call regardless of the keyword holding
/// it.
///
/// When `model_ref` is set, the gateway schema's reference becomes the
/// external model URL built from `rest_api_id` and the raw model identifier,
/// and the OpenAPI schema's reference becomes
/// `#/components/schemas/<resolved-id>`. A raw `reference` authored on the
/// same node is dropped in favor of `model_ref` with a warning.
///
/// # Errors
///
/// `AppError::UnresolvedReference` if `resolver` cannot resolve a referenced
/// model identifier.
pub fn translate_schema(
    schema: &SchemaEx,
    rest_api_id: &str,
    resolver: &dyn ReferenceResolver,
) -> AppResult<TranslatedSchema> {
    // non-recursive keywords are copied verbatim to both outputs; absent
    // fields stay absent
    let mut gateway = GatewaySchema {
        id: schema.id.clone(),
        schema: schema.schema.clone(),
        reference: schema.reference.clone(),
        schema_type: schema.schema_type.clone(),
        format: schema.format.clone(),
        title: schema.title.clone(),
        description: schema.description.clone(),
        default: schema.default.clone(),
        enum_values: schema.enum_values.clone(),
        multiple_of: schema.multiple_of,
        maximum: schema.maximum,
        exclusive_maximum: schema.exclusive_maximum,
        minimum: schema.minimum,
        exclusive_minimum: schema.exclusive_minimum,
        max_length: schema.max_length,
        min_length: schema.min_length,
        pattern: schema.pattern.clone(),
        max_items: schema.max_items,
        min_items: schema.min_items,
        unique_items: schema.unique_items,
        max_properties: schema.max_properties,
        min_properties: schema.min_properties,
        required: schema.required.clone(),
        ..GatewaySchema::default()
    };
    let mut document = SchemaEx {
        id: schema.id.clone(),
        schema: schema.schema.clone(),
        reference: schema.reference.clone(),
        schema_type: schema.schema_type.clone(),
        format: schema.format.clone(),
        title: schema.title.clone(),
        description: schema.description.clone(),
        default: schema.default.clone(),
        // the gateway dialect has no keyword for examples
        example: schema.example.clone(),
        enum_values: schema.enum_values.clone(),
        multiple_of: schema.multiple_of,
        maximum: schema.maximum,
        exclusive_maximum: schema.exclusive_maximum,
        minimum: schema.minimum,
        exclusive_minimum: schema.exclusive_minimum,
        max_length: schema.max_length,
        min_length: schema.min_length,
        pattern: schema.pattern.clone(),
        max_items: schema.max_items,
        min_items: schema.min_items,
        unique_items: schema.unique_items,
        max_properties: schema.max_properties,
        min_properties: schema.min_properties,
        required: schema.required.clone(),
        ..SchemaEx::default()
    };

    // single-schema keywords
    if let Some(not) = &schema.not {
        let translated = translate_schema(not, rest_api_id, resolver)?;
        gateway.not = Some(Box::new(translated.gateway));
        document.not = Some(Box::new(translated.document));
    }
    if let Some(property_names) = &schema.property_names {
        let translated = translate_schema(property_names, rest_api_id, resolver)?;
        gateway.property_names = Some(Box::new(translated.gateway));
        document.property_names = Some(Box::new(translated.document));
    }

    // list keywords
    if let Some(values) = &schema.all_of {
        let (gateway_value, document_value) = translate_list(values, rest_api_id, resolver)?;
        gateway.all_of = Some(gateway_value);
        document.all_of = Some(document_value);
    }
    if let Some(values) = &schema.any_of {
        let (gateway_value, document_value) = translate_list(values, rest_api_id, resolver)?;
        gateway.any_of = Some(gateway_value);
        document.any_of = Some(document_value);
    }
    if let Some(values) = &schema.one_of {
        let (gateway_value, document_value) = translate_list(values, rest_api_id, resolver)?;
        gateway.one_of = Some(gateway_value);
        document.one_of = Some(document_value);
    }
    if let Some(values) = &schema.additional_items {
        let (gateway_value, document_value) = translate_list(values, rest_api_id, resolver)?;
        gateway.additional_items = Some(gateway_value);
        document.additional_items = Some(document_value);
    }

    // one-or-more keywords keep whichever variant they were authored as
    if let Some(items) = &schema.items {
        let (gateway_value, document_value) = translate_one_or_many(items, rest_api_id, resolver)?;
        gateway.items = Some(gateway_value);
        document.items = Some(document_value);
    }
    if let Some(contains) = &schema.contains {
        let (gateway_value, document_value) =
            translate_one_or_many(contains, rest_api_id, resolver)?;
        gateway.contains = Some(gateway_value);
        document.contains = Some(document_value);
    }

    // map keywords
    if let Some(map) = &schema.properties {
        let (gateway_value, document_value) = translate_map(map, rest_api_id, resolver)?;
        gateway.properties = Some(gateway_value);
        document.properties = Some(document_value);
    }
    if let Some(map) = &schema.pattern_properties {
        let (gateway_value, document_value) = translate_map(map, rest_api_id, resolver)?;
        gateway.pattern_properties = Some(gateway_value);
        document.pattern_properties = Some(document_value);
    }
    if let Some(map) = &schema.definitions {
        let (gateway_value, document_value) = translate_map(map, rest_api_id, resolver)?;
        gateway.definitions = Some(gateway_value);
        document.definitions = Some(document_value);
    }

    // additionalProperties: boolean passes through, a schema recurses
    match &schema.additional_properties {
        Some(BoolOrSchema::Bool(value)) => {
            gateway.additional_properties = Some(BoolOrSchema::Bool(*value));
            document.additional_properties = Some(BoolOrSchema::Bool(*value));
        }
        Some(BoolOrSchema::Schema(subschema)) => {
            let translated = translate_schema(subschema, rest_api_id, resolver)?;
            gateway.additional_properties =
                Some(BoolOrSchema::Schema(Box::new(translated.gateway)));
            document.additional_properties =
                Some(BoolOrSchema::Schema(Box::new(translated.document)));
        }
        None => {}
    }

    // dependencies: string lists pass through, schemas recurse, entry by entry
    if let Some(dependencies) = &schema.dependencies {
        let mut gateway_value = IndexMap::new();
        let mut document_value = IndexMap::new();
        for (key, dependency) in dependencies {
            match dependency {
                Dependency::Keys(keys) => {
                    gateway_value.insert(key.clone(), Dependency::Keys(keys.clone()));
                    document_value.insert(key.clone(), Dependency::Keys(keys.clone()));
                }
                Dependency::Schema(subschema) => {
                    let translated = translate_schema(subschema, rest_api_id, resolver)?;
                    gateway_value
                        .insert(key.clone(), Dependency::Schema(Box::new(translated.gateway)));
                    document_value
                        .insert(key.clone(), Dependency::Schema(Box::new(translated.document)));
                }
            }
        }
        gateway.dependencies = Some(gateway_value);
        document.dependencies = Some(document_value);
    }

    // resolves the model reference
    if let Some(model) = &schema.model_ref {
        if let Some(reference) = &schema.reference {
            tracing::warn!(reference = %reference, "ref is replaced with modelRef");
        }
        gateway.reference = Some(format!(
            "{}/{}/models/{}",
            GATEWAY_MODEL_BASE, rest_api_id, model.model_id
        ));
        document.reference = Some(format!(
            "#/components/schemas/{}",
            resolver.resolve(&model.model_id)?
        ));
    }

    Ok(TranslatedSchema { gateway, document })
}

/// Translates a list keyword value.
fn translate_list(
    values: &[SchemaEx],
    rest_api_id: &str,
    resolver: &dyn ReferenceResolver,
) -> AppResult<(Vec<GatewaySchema>, Vec<SchemaEx>)> {
    let mut gateway_values = Vec::with_capacity(values.len());
    let mut document_values = Vec::with_capacity(values.len());
    for value in values {
        let translated = translate_schema(value, rest_api_id, resolver)?;
        gateway_values.push(translated.gateway);
        document_values.push(translated.document);
    }
    Ok((gateway_values, document_values))
}

/// Translates a one-or-more keyword value.
fn translate_one_or_many(
    values: &OneOrMany<SchemaEx>,
    rest_api_id: &str,
    resolver: &dyn ReferenceResolver,
) -> AppResult<(OneOrMany<GatewaySchema>, OneOrMany<SchemaEx>)> {
    match values {
        OneOrMany::One(value) => {
            let translated = translate_schema(value, rest_api_id, resolver)?;
            Ok((
                OneOrMany::One(Box::new(translated.gateway)),
                OneOrMany::One(Box::new(translated.document)),
            ))
        }
        OneOrMany::Many(values) => {
            let (gateway_values, document_values) =
                translate_list(values, rest_api_id, resolver)?;
            Ok((
                OneOrMany::Many(gateway_values),
                OneOrMany::Many(document_values),
            ))
        }
    }
}

/// Translates a map keyword value.
fn translate_map(
    map: &IndexMap<String, SchemaEx>,
    rest_api_id: &str,
    resolver: &dyn ReferenceResolver,
) -> AppResult<(
    IndexMap<String, GatewaySchema>,
    IndexMap<String, SchemaEx>,
)> {
    let mut gateway_map = IndexMap::new();
    let mut document_map = IndexMap::new();
    for (key, value) in map {
        let translated = translate_schema(value, rest_api_id, resolver)?;
        gateway_map.insert(key.clone(), translated.gateway);
        document_map.insert(key.clone(), translated.document);
    }
    Ok((gateway_map, document_map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::ModelRef;
    use crate::schema::{JsonType, TypeSpec};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;

    /// Resolver backed by a fixed token table.
    struct TableResolver {
        table: HashMap<String, String>,
    }

    impl TableResolver {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                table: entries
                    .iter()
                    .map(|(token, id)| (token.to_string(), id.to_string()))
                    .collect(),
            }
        }
    }

    impl ReferenceResolver for TableResolver {
        fn resolve(&self, reference: &str) -> AppResult<String> {
            self.table.get(reference).cloned().ok_or_else(|| {
                AppError::UnresolvedReference(format!("not a token: {}", reference))
            })
        }
    }

    fn scalar_schema() -> SchemaEx {
        SchemaEx {
            schema_type: Some(TypeSpec::One(JsonType::String)),
            format: Some("date-time".to_string()),
            title: Some("timestamp".to_string()),
            description: Some("When it happened".to_string()),
            default: Some(json!("1970-01-01T00:00:00Z")),
            enum_values: None,
            max_length: Some(32),
            min_length: Some(20),
            pattern: Some("^.*Z$".to_string()),
            ..SchemaEx::default()
        }
    }

    #[test]
    fn test_scalar_fields_are_copied_to_both_outputs() {
        let resolver = TableResolver::new(&[]);
        let schema = scalar_schema();
        let translated = translate_schema(&schema, "api-1", &resolver).unwrap();

        // the document form round-trips the input (no example was authored)
        assert_eq!(translated.document, schema);
        // the gateway form carries the same scalars
        let gateway = serde_json::to_value(&translated.gateway).unwrap();
        let document = serde_json::to_value(&translated.document).unwrap();
        assert_eq!(gateway, document);
    }

    #[test]
    fn test_example_reaches_only_the_document_form() {
        let resolver = TableResolver::new(&[]);
        let schema = SchemaEx {
            schema_type: Some(TypeSpec::One(JsonType::Integer)),
            example: Some(json!(123)),
            ..SchemaEx::default()
        };
        let translated = translate_schema(&schema, "api-1", &resolver).unwrap();
        assert_eq!(translated.document.example, Some(json!(123)));
        let gateway = serde_json::to_value(&translated.gateway).unwrap();
        assert_eq!(gateway, json!({"type": "integer"}));
    }

    #[test]
    fn test_translation_is_deterministic() {
        let resolver = TableResolver::new(&[("${Token[TOKEN.1]}", "petmodel0ABC")]);
        let schema = SchemaEx {
            schema_type: Some(TypeSpec::One(JsonType::Array)),
            items: Some(OneOrMany::One(Box::new(SchemaEx {
                model_ref: Some(ModelRef::new("${Token[TOKEN.1]}")),
                ..SchemaEx::default()
            }))),
            ..SchemaEx::default()
        };
        let first = translate_schema(&schema, "api-1", &resolver).unwrap();
        let second = translate_schema(&schema, "api-1", &resolver).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_model_ref_resolution_differs_by_dialect() {
        let resolver = TableResolver::new(&[("${Token[TOKEN.1]}", "petmodel0ABC")]);
        let schema = SchemaEx {
            model_ref: Some(ModelRef::new("${Token[TOKEN.1]}")),
            ..SchemaEx::default()
        };
        let translated = translate_schema(&schema, "${Token[TOKEN.9]}", &resolver).unwrap();
        assert_eq!(
            translated.gateway.reference.as_deref(),
            Some(
                "https://apigateway.amazonaws.com/restapis/${Token[TOKEN.9]}/models/${Token[TOKEN.1]}"
            )
        );
        assert_eq!(
            translated.document.reference.as_deref(),
            Some("#/components/schemas/petmodel0ABC")
        );
        assert_eq!(translated.document.model_ref, None);
    }

    #[test]
    fn test_model_ref_replaces_raw_reference() {
        let resolver = TableResolver::new(&[("${Token[TOKEN.1]}", "petmodel0ABC")]);
        let schema = SchemaEx {
            reference: Some("#/definitions/old".to_string()),
            model_ref: Some(ModelRef::new("${Token[TOKEN.1]}")),
            ..SchemaEx::default()
        };
        let translated = translate_schema(&schema, "api-1", &resolver).unwrap();
        assert_eq!(
            translated.document.reference.as_deref(),
            Some("#/components/schemas/petmodel0ABC")
        );
        assert!(translated
            .gateway
            .reference
            .as_deref()
            .unwrap()
            .starts_with("https://apigateway.amazonaws.com/"));
    }

    #[test]
    fn test_unresolvable_model_ref_fails() {
        let resolver = TableResolver::new(&[]);
        let schema = SchemaEx {
            model_ref: Some(ModelRef::new("plain-string")),
            ..SchemaEx::default()
        };
        let err = translate_schema(&schema, "api-1", &resolver).unwrap_err();
        assert!(matches!(err, AppError::UnresolvedReference(_)));
    }

    #[test]
    fn test_nested_keywords_recurse_identically() {
        let resolver = TableResolver::new(&[("${Token[TOKEN.1]}", "petmodel0ABC")]);
        let nested = SchemaEx {
            model_ref: Some(ModelRef::new("${Token[TOKEN.1]}")),
            ..SchemaEx::default()
        };
        let schema = SchemaEx {
            schema_type: Some(TypeSpec::One(JsonType::Object)),
            properties: Some(IndexMap::from([("pet".to_string(), nested.clone())])),
            items: Some(OneOrMany::Many(vec![nested.clone()])),
            not: Some(Box::new(nested.clone())),
            ..SchemaEx::default()
        };
        let translated = translate_schema(&schema, "api-1", &resolver).unwrap();

        let expected_ref = Some("#/components/schemas/petmodel0ABC".to_string());
        let properties = translated.document.properties.unwrap();
        assert_eq!(properties["pet"].reference, expected_ref);
        let Some(OneOrMany::Many(items)) = translated.document.items else {
            panic!("items should stay a tuple");
        };
        assert_eq!(items[0].reference, expected_ref);
        assert_eq!(translated.document.not.unwrap().reference, expected_ref);
    }

    #[test]
    fn test_dependencies_translate_entry_by_entry() {
        let resolver = TableResolver::new(&[]);
        let schema = SchemaEx {
            dependencies: Some(IndexMap::from([
                (
                    "credit_card".to_string(),
                    Dependency::Keys(vec!["billing_address".to_string()]),
                ),
                (
                    "shipping".to_string(),
                    Dependency::Schema(Box::new(SchemaEx {
                        schema_type: Some(TypeSpec::One(JsonType::Object)),
                        ..SchemaEx::default()
                    })),
                ),
            ])),
            ..SchemaEx::default()
        };
        let translated = translate_schema(&schema, "api-1", &resolver).unwrap();
        let dependencies = translated.gateway.dependencies.unwrap();
        assert!(matches!(
            dependencies["credit_card"],
            Dependency::Keys(ref keys) if keys == &vec!["billing_address".to_string()]
        ));
        assert!(matches!(dependencies["shipping"], Dependency::Schema(_)));
    }

    #[test]
    fn test_additional_properties_bool_passes_through() {
        let resolver = TableResolver::new(&[]);
        let schema = SchemaEx {
            additional_properties: Some(BoolOrSchema::Bool(false)),
            ..SchemaEx::default()
        };
        let translated = translate_schema(&schema, "api-1", &resolver).unwrap();
        assert_eq!(
            translated.gateway.additional_properties,
            Some(BoolOrSchema::Bool(false))
        );
        assert_eq!(
            translated.document.additional_properties,
            Some(BoolOrSchema::Bool(false))
        );
    }
}
