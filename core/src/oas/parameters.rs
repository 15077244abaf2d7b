#![deny(missing_docs)]

//! # Parameter Objects
//!
//! Parameter objects for the OpenAPI definition, the merge rule shared by
//! path-level and operation-level parameter blocks, the default parameter
//! derived from a parameterized terminal path segment, and the translation
//! reconciling the two ways request parameters can be declared.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::keys::{ParamLocation, ParameterKey};
use crate::models::MethodOptions;

/// Parameter properties without the identifying name and location.
///
/// The authoring counterpart of an OpenAPI Parameter Object: the values of
/// `request_parameter_schemas` carry these properties, and the encoded key
/// contributes `name` and `in`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    /// Description of the parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the parameter is mandatory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Whether the parameter is deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    /// Whether an empty value is allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_empty_value: Option<bool>,
    /// Serialization style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Explode modifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,
    /// Allow reserved characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_reserved: Option<bool>,
    /// Schema constraining the parameter value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    /// Example value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Named examples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<IndexMap<String, Value>>,
}

impl ParameterSpec {
    /// Creates empty parameter properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the required flag.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Sets the schema.
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets the example value.
    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }
}

/// A named parameter in the OpenAPI definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterObject {
    /// Name of the parameter.
    pub name: String,
    /// Location of the parameter.
    #[serde(rename = "in")]
    pub location: ParamLocation,
    /// Remaining parameter properties.
    #[serde(flatten)]
    pub spec: ParameterSpec,
}

/// Merges two parameter lists.
///
/// Returns `base` if `overlay` is `None`, `overlay` if `base` is `None`, and
/// `None` if both are. Otherwise every overlay entry is upserted into `base`
/// by matching on `name` only: a colliding entry replaces the base entry in
/// place, a new entry is appended in overlay order.
pub fn merge_parameter_objects(
    base: Option<Vec<ParameterObject>>,
    overlay: Option<Vec<ParameterObject>>,
) -> Option<Vec<ParameterObject>> {
    let Some(overlay) = overlay else {
        return base;
    };
    let Some(base) = base else {
        return Some(overlay);
    };
    // overwrites base entries with overlay entries
    let mut merged = base;
    for parameter in overlay {
        if let Some(index) = merged.iter().position(|p| p.name == parameter.name) {
            merged[index] = parameter;
        } else {
            merged.push(parameter);
        }
    }
    Some(merged)
}

fn terminal_parameter_pattern() -> &'static Regex {
    static TERMINAL_RE: OnceLock<Regex> = OnceLock::new();
    // locates /{name} at the end; name must not contain a slash
    TERMINAL_RE.get_or_init(|| Regex::new(r"/\{([^/]+)\}$").expect("Invalid regex"))
}

/// Returns the default parameter list for a path whose final segment is a
/// path parameter `{name}`.
///
/// The derived parameter is required, path-located, and string-typed. A
/// parameterized non-terminal segment contributes nothing; `None` is
/// returned for any path not ending in `{name}`.
pub fn default_path_parameter(path: &str) -> Option<Vec<ParameterObject>> {
    let captures = terminal_parameter_pattern().captures(path)?;
    Some(vec![ParameterObject {
        name: captures[1].to_string(),
        location: ParamLocation::Path,
        spec: ParameterSpec {
            required: Some(true),
            schema: Some(json!({"type": "string"})),
            ..ParameterSpec::default()
        },
    }])
}

/// Output of [`translate_request_parameters`].
#[derive(Debug, Clone, Default)]
pub struct TranslatedRequestParameters {
    /// Method options with the flag map adjusted to schema-style
    /// requirements; this is what reaches the provisioning collaborator.
    pub method_options: Option<MethodOptions>,
    /// Parameter objects for the OpenAPI definition.
    pub parameters: Option<Vec<ParameterObject>>,
}

/// Translates the request parameters of given method options.
///
/// `request_parameters` is evaluated first: each entry becomes a required or
/// optional string-typed parameter at the location its key encodes. Then
/// `request_parameter_schemas` is evaluated: each entry becomes a parameter
/// carrying its full properties, replacing any same-named entry from the
/// first pass (a warning records the override), and its required flag is
/// written back into the flag map (`false` when unspecified) so the two
/// representations stay consistent for the provisioning collaborator.
///
/// # Errors
///
/// `AppError::ParameterKey` if a key does not parse, or decodes to a
/// multi-value location; multi-value parameters are not representable here.
pub fn translate_request_parameters(
    options: Option<&MethodOptions>,
) -> AppResult<TranslatedRequestParameters> {
    let Some(options) = options else {
        return Ok(TranslatedRequestParameters::default());
    };
    if options.request_parameters.is_none() && options.request_parameter_schemas.is_none() {
        return Ok(TranslatedRequestParameters {
            method_options: Some(options.clone()),
            parameters: None,
        });
    }
    let mut request_parameters = options.request_parameters.clone().unwrap_or_default();
    let mut parameters: Vec<ParameterObject> = Vec::new();
    // translates `request_parameters`
    if let Some(flags) = &options.request_parameters {
        for (key, required) in flags {
            let parsed = parse_single_value_key(key)?;
            parameters.push(ParameterObject {
                name: parsed.name,
                location: parsed.location,
                spec: ParameterSpec {
                    required: Some(*required),
                    schema: Some(json!({"type": "string"})),
                    ..ParameterSpec::default()
                },
            });
        }
    }
    // translates `request_parameter_schemas`
    if let Some(specs) = &options.request_parameter_schemas {
        for (key, spec) in specs {
            let parsed = parse_single_value_key(key)?;
            let parameter = ParameterObject {
                name: parsed.name,
                location: parsed.location,
                spec: spec.clone(),
            };
            // overrides the flag map entry for the same key
            request_parameters.insert(key.clone(), parameter.spec.required.unwrap_or(false));
            if let Some(index) = parameters.iter().position(|p| p.name == parameter.name) {
                tracing::warn!(
                    name = %parameter.name,
                    "requestParameterSchemas precedes requestParameters"
                );
                parameters[index] = parameter;
            } else {
                parameters.push(parameter);
            }
        }
    }
    let mut method_options = options.clone();
    method_options.request_parameters = Some(request_parameters);
    Ok(TranslatedRequestParameters {
        method_options: Some(method_options),
        parameters: Some(parameters),
    })
}

/// Parses a key and rejects multi-value locations.
fn parse_single_value_key(key: &str) -> AppResult<ParameterKey> {
    let parsed = ParameterKey::parse(key)?;
    if parsed.explode {
        return Err(AppError::ParameterKey(format!(
            "multivaluequerystring and multivalueheader are not allowed in requestParameters: {}",
            key
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn named(name: &str, location: ParamLocation, required: bool) -> ParameterObject {
        ParameterObject {
            name: name.to_string(),
            location,
            spec: ParameterSpec {
                required: Some(required),
                ..ParameterSpec::default()
            },
        }
    }

    #[test]
    fn test_merge_absent_sides() {
        let base = vec![named("a", ParamLocation::Query, true)];
        assert_eq!(
            merge_parameter_objects(Some(base.clone()), None),
            Some(base.clone())
        );
        assert_eq!(
            merge_parameter_objects(None, Some(base.clone())),
            Some(base)
        );
        assert_eq!(merge_parameter_objects(None, None), None);
    }

    #[test]
    fn test_merge_overlay_wins_in_place() {
        let base = vec![
            named("a", ParamLocation::Query, true),
            named("b", ParamLocation::Query, true),
        ];
        let overlay = vec![
            named("a", ParamLocation::Query, false),
            named("c", ParamLocation::Header, false),
        ];
        let merged = merge_parameter_objects(Some(base), Some(overlay)).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].name, "a");
        assert_eq!(merged[0].spec.required, Some(false));
        assert_eq!(merged[1].name, "b");
        assert_eq!(merged[2].name, "c");
    }

    #[test]
    fn test_merge_collides_across_locations_by_name() {
        // merge identity is name-only: a path parameter and a query parameter
        // sharing a name override each other
        let base = vec![named("id", ParamLocation::Path, true)];
        let overlay = vec![named("id", ParamLocation::Query, false)];
        let merged = merge_parameter_objects(Some(base), Some(overlay)).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].location, ParamLocation::Query);
    }

    #[test]
    fn test_default_path_parameter_on_terminal_segment() {
        let parameters = default_path_parameter("/pet/{petId}").unwrap();
        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[0].name, "petId");
        assert_eq!(parameters[0].location, ParamLocation::Path);
        assert_eq!(parameters[0].spec.required, Some(true));
        assert_eq!(
            parameters[0].spec.schema,
            Some(json!({"type": "string"}))
        );
    }

    #[test]
    fn test_default_path_parameter_ignores_other_paths() {
        assert_eq!(default_path_parameter("/pet"), None);
        // a parameterized non-terminal segment does not generate a default
        assert_eq!(default_path_parameter("/pet/{petId}/photos"), None);
        assert_eq!(default_path_parameter("/"), None);
    }

    #[test]
    fn test_translate_absent_options() {
        let translated = translate_request_parameters(None).unwrap();
        assert!(translated.method_options.is_none());
        assert!(translated.parameters.is_none());
    }

    #[test]
    fn test_translate_without_parameter_sources_passes_options_through() {
        let options = MethodOptions::new().with_summary("List pets");
        let translated = translate_request_parameters(Some(&options)).unwrap();
        assert!(translated.parameters.is_none());
        let passed = translated.method_options.unwrap();
        assert_eq!(passed.summary.as_deref(), Some("List pets"));
        assert!(passed.request_parameters.is_none());
    }

    #[test]
    fn test_translate_flag_parameters() {
        let options = MethodOptions::new()
            .with_request_parameter("method.request.querystring.status", false)
            .with_request_parameter("method.request.header.x-trace", true);
        let translated = translate_request_parameters(Some(&options)).unwrap();
        let parameters = translated.parameters.unwrap();
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0].name, "status");
        assert_eq!(parameters[0].location, ParamLocation::Query);
        assert_eq!(parameters[0].spec.required, Some(false));
        assert_eq!(parameters[0].spec.schema, Some(json!({"type": "string"})));
        assert_eq!(parameters[1].name, "x-trace");
        assert_eq!(parameters[1].location, ParamLocation::Header);
    }

    #[test]
    fn test_translate_schema_style_precedes_flag_style() {
        let options = MethodOptions::new()
            .with_request_parameter("method.request.querystring.status", false)
            .with_request_parameter_schema(
                "method.request.querystring.status",
                ParameterSpec::new()
                    .with_required(true)
                    .with_schema(json!({"type": "string"})),
            );
        let translated = translate_request_parameters(Some(&options)).unwrap();
        let parameters = translated.parameters.unwrap();
        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[0].name, "status");
        assert_eq!(parameters[0].spec.required, Some(true));
        assert_eq!(parameters[0].spec.schema, Some(json!({"type": "string"})));
        // the flag map is rewritten to match
        let flags = translated
            .method_options
            .unwrap()
            .request_parameters
            .unwrap();
        assert_eq!(flags["method.request.querystring.status"], true);
    }

    #[test]
    fn test_translate_schema_style_defaults_required_to_false() {
        let options = MethodOptions::new().with_request_parameter_schema(
            "method.request.header.x-trace",
            ParameterSpec::new().with_description("Trace id"),
        );
        let translated = translate_request_parameters(Some(&options)).unwrap();
        let flags = translated
            .method_options
            .unwrap()
            .request_parameters
            .unwrap();
        assert_eq!(flags["method.request.header.x-trace"], false);
    }

    #[test]
    fn test_translate_rejects_multi_value_locations() {
        let flag_options = MethodOptions::new()
            .with_request_parameter("method.request.multivaluequerystring.tags", true);
        let err = translate_request_parameters(Some(&flag_options)).unwrap_err();
        assert!(matches!(err, AppError::ParameterKey(_)));

        let schema_options = MethodOptions::new().with_request_parameter_schema(
            "method.request.multivalueheader.Set-Cookie",
            ParameterSpec::new(),
        );
        let err = translate_request_parameters(Some(&schema_options)).unwrap_err();
        assert!(matches!(err, AppError::ParameterKey(_)));
    }

    #[test]
    fn test_parameter_object_serializes_in_and_flattened_spec() {
        let parameter = ParameterObject {
            name: "status".to_string(),
            location: ParamLocation::Query,
            spec: ParameterSpec::new()
                .with_required(true)
                .with_schema(json!({"type": "string"})),
        };
        let value = serde_json::to_value(&parameter).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "status",
                "in": "query",
                "required": true,
                "schema": {"type": "string"},
            })
        );
    }
}
