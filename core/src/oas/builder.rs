#![deny(missing_docs)]

//! # OpenAPI Document Builder
//!
//! Accumulates paths, schema components, and security schemes for one API
//! under construction, and serializes the OpenAPI 3.1 document on demand.
//! One builder instance exists per API being described; the assembler owns
//! it and is the only writer.

use std::path::Path;

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::error::{AppError, AppResult};
use crate::oas::parameters::ParameterObject;

/// Info block of the OpenAPI document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoObject {
    /// Title of the API.
    pub title: String,
    /// Version of the API document.
    pub version: String,
    /// Description of the API.
    pub description: Option<String>,
}

impl InfoObject {
    /// Creates an info block with the required fields.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A single security requirement: scheme name to required scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// One operation declared at a path.
///
/// Created when the operation is declared and never mutated afterward; a
/// re-declaration at the same path and method fully replaces the record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationObject {
    /// `operationId` of the operation.
    pub operation_id: Option<String>,
    /// Summary of the operation.
    pub summary: Option<String>,
    /// Description of the operation.
    pub description: Option<String>,
    /// Operation-level parameters.
    pub parameters: Option<Vec<ParameterObject>>,
    /// Pre-assembled Request Body Object.
    pub request_body: Option<Value>,
    /// Pre-assembled Responses Object.
    pub responses: Option<Value>,
    /// Security requirements.
    pub security: Option<Vec<SecurityRequirement>>,
}

/// A registered path: the shared parameter block plus operations keyed by
/// lowercase HTTP verb.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    /// Parameters shared by every operation at the path.
    pub parameters: Option<Vec<ParameterObject>>,
    /// Operations keyed by lowercase HTTP method.
    pub operations: IndexMap<String, OperationObject>,
}

/// Builder accumulating the OpenAPI document for one API.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    info: InfoObject,
    paths: IndexMap<String, PathItem>,
    schemas: IndexMap<String, Value>,
    security_schemes: IndexMap<String, Value>,
}

impl DocumentBuilder {
    /// Creates an empty builder for the given info block.
    pub fn new(info: InfoObject) -> Self {
        Self {
            info,
            paths: IndexMap::new(),
            schemas: IndexMap::new(),
            security_schemes: IndexMap::new(),
        }
    }

    /// Registers `path` with its shared parameter block.
    ///
    /// Operations already stored at the path are kept; the parameter block
    /// is overwritten.
    pub fn add_path(&mut self, path: &str, parameters: Option<Vec<ParameterObject>>) {
        let item = self.paths.entry(path.to_string()).or_default();
        item.parameters = parameters;
    }

    /// Stores `operation` at `(path, method)`, fully replacing any previous
    /// record. Last write wins.
    pub fn set_operation(&mut self, path: &str, http_method: &str, operation: OperationObject) {
        let item = self.paths.entry(path.to_string()).or_default();
        item.operations
            .insert(http_method.to_ascii_lowercase(), operation);
    }

    /// Registers a schema component under `name`.
    pub fn add_schema(&mut self, name: &str, schema: Value) {
        self.schemas.insert(name.to_string(), schema);
    }

    /// Registers a security scheme under `name`, overwriting any previous
    /// scheme with the same name.
    pub fn add_security_scheme(&mut self, name: &str, scheme: Value) {
        self.security_schemes.insert(name.to_string(), scheme);
    }

    /// Assembles the OpenAPI document.
    ///
    /// `paths` and the `components` maps are always present, even when
    /// empty.
    ///
    /// # Errors
    ///
    /// `AppError::General` if a parameter object fails to serialize.
    pub fn document(&self) -> AppResult<Value> {
        let mut doc = Map::new();
        doc.insert("openapi".to_string(), json!("3.1.0"));

        let mut info = Map::new();
        info.insert("title".to_string(), json!(self.info.title));
        info.insert("version".to_string(), json!(self.info.version));
        if let Some(description) = &self.info.description {
            info.insert("description".to_string(), json!(description));
        }
        doc.insert("info".to_string(), Value::Object(info));

        let mut paths = Map::new();
        for (path, item) in &self.paths {
            paths.insert(path.clone(), path_item_value(item)?);
        }
        doc.insert("paths".to_string(), Value::Object(paths));

        let mut components = Map::new();
        components.insert("schemas".to_string(), map_value(&self.schemas));
        components.insert("securitySchemes".to_string(), map_value(&self.security_schemes));
        doc.insert("components".to_string(), Value::Object(components));

        Ok(Value::Object(doc))
    }

    /// Serializes the document as JSON with 2-space indentation.
    ///
    /// # Errors
    ///
    /// `AppError::General` if the document fails to serialize.
    pub fn to_json_pretty(&self) -> AppResult<String> {
        serde_json::to_string_pretty(&self.document()?).map_err(|e| {
            AppError::General(format!("Failed to serialize OpenAPI document: {}", e))
        })
    }

    /// Writes the document to `path`.
    ///
    /// # Errors
    ///
    /// `AppError::Io` if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> AppResult<()> {
        let rendered = self.to_json_pretty()?;
        std::fs::write(path, rendered)?;
        Ok(())
    }
}

fn path_item_value(item: &PathItem) -> AppResult<Value> {
    let mut map = Map::new();
    if let Some(parameters) = &item.parameters {
        map.insert("parameters".to_string(), parameters_value(parameters)?);
    }
    for (method, operation) in &item.operations {
        map.insert(method.clone(), operation_value(operation)?);
    }
    Ok(Value::Object(map))
}

fn operation_value(operation: &OperationObject) -> AppResult<Value> {
    let mut map = Map::new();
    if let Some(operation_id) = &operation.operation_id {
        map.insert("operationId".to_string(), json!(operation_id));
    }
    if let Some(summary) = &operation.summary {
        map.insert("summary".to_string(), json!(summary));
    }
    if let Some(description) = &operation.description {
        map.insert("description".to_string(), json!(description));
    }
    if let Some(parameters) = &operation.parameters {
        map.insert("parameters".to_string(), parameters_value(parameters)?);
    }
    if let Some(request_body) = &operation.request_body {
        map.insert("requestBody".to_string(), request_body.clone());
    }
    if let Some(responses) = &operation.responses {
        map.insert("responses".to_string(), responses.clone());
    }
    if let Some(security) = &operation.security {
        map.insert("security".to_string(), json!(security));
    }
    Ok(Value::Object(map))
}

fn parameters_value(parameters: &[ParameterObject]) -> AppResult<Value> {
    serde_json::to_value(parameters)
        .map_err(|e| AppError::General(format!("Failed to serialize parameters: {}", e)))
}

fn map_value(map: &IndexMap<String, Value>) -> Value {
    let mut out = Map::new();
    for (key, value) in map {
        out.insert(key.clone(), value.clone());
    }
    Value::Object(out)
}
