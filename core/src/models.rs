#![deny(missing_docs)]

//! # Declaration Models
//!
//! Option and record types shared between the assembler, the document
//! builder, and the provisioning collaborator seam. These are the augmented
//! counterparts of the plain provisioning options: they carry the extra
//! properties needed to build the OpenAPI definition alongside the gateway
//! configuration.

use indexmap::IndexMap;

use crate::authorizer::AuthorizerWithSpec;
use crate::oas::parameters::ParameterSpec;
use crate::schema::{GatewaySchema, SchemaEx};

/// Handle for a model registered with the provisioning collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    /// Deferred model identifier, resolvable via a `ReferenceResolver`.
    pub model_id: String,
}

impl Model {
    /// Creates a handle from the collaborator-assigned identifier.
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }

    /// Returns a weak by-identifier reference usable inside schemas and
    /// content maps.
    pub fn to_ref(&self) -> ModelRef {
        ModelRef {
            model_id: self.model_id.clone(),
        }
    }
}

/// Weak reference to a registered model, by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    /// Deferred model identifier.
    pub model_id: String,
}

impl ModelRef {
    /// Creates a reference from a deferred model identifier.
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }
}

impl From<&Model> for ModelRef {
    fn from(model: &Model) -> Self {
        model.to_ref()
    }
}

/// Options for registering a model, with the extended schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelOptions {
    /// Content type the model describes.
    pub content_type: Option<String>,
    /// Description of the model.
    pub description: Option<String>,
    /// Explicit model name for the gateway.
    pub model_name: Option<String>,
    /// Extended schema definition.
    pub schema: SchemaEx,
}

impl ModelOptions {
    /// Creates options around the given schema.
    pub fn new(schema: SchemaEx) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the gateway model name.
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }
}

/// Model options after translation, handed to the provisioning collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayModelOptions {
    /// Content type the model describes.
    pub content_type: Option<String>,
    /// Description of the model.
    pub description: Option<String>,
    /// Explicit model name for the gateway.
    pub model_name: Option<String>,
    /// Gateway-dialect schema.
    pub schema: GatewaySchema,
}

/// Method response augmented with the properties necessary for the OpenAPI
/// definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodResponse {
    /// HTTP status code, e.g. `"200"`.
    pub status_code: String,
    /// Description of the response.
    pub description: Option<String>,
    /// Response models by content type.
    pub response_models: Option<IndexMap<String, ModelRef>>,
    /// Response parameter flags by encoded key, for the gateway side.
    pub response_parameters: Option<IndexMap<String, bool>>,
}

impl MethodResponse {
    /// Creates a response declaration for the given status code.
    pub fn new(status_code: impl Into<String>) -> Self {
        Self {
            status_code: status_code.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a response model for a content type.
    pub fn with_response_model(
        mut self,
        content_type: impl Into<String>,
        model: ModelRef,
    ) -> Self {
        self.response_models
            .get_or_insert_with(IndexMap::new)
            .insert(content_type.into(), model);
        self
    }

    /// Adds a response parameter flag.
    pub fn with_response_parameter(mut self, key: impl Into<String>, required: bool) -> Self {
        self.response_parameters
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), required);
        self
    }
}

/// Options for declaring a resource.
#[derive(Debug, Clone, Default)]
pub struct ResourceOptions {
    /// Default method options shared by operations under the resource.
    pub default_method_options: Option<MethodOptions>,
}

impl ResourceOptions {
    /// Creates empty resource options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default method options.
    pub fn with_default_method_options(mut self, options: MethodOptions) -> Self {
        self.default_method_options = Some(options);
        self
    }
}

/// Options for declaring a method, with the properties necessary to build
/// the OpenAPI definition.
///
/// `request_parameters` maps encoded parameter keys (see
/// [`crate::keys::ParameterKey`]) to required flags;
/// `request_parameter_schemas` maps the same keys to full parameter
/// properties and precedes `request_parameters` when both name one
/// parameter.
#[derive(Debug, Clone, Default)]
pub struct MethodOptions {
    /// Operation name, emitted as the operation's `operationId`.
    pub operation_name: Option<String>,
    /// Authorizer guarding the method.
    pub authorizer: Option<AuthorizerWithSpec>,
    /// Summary of the method.
    pub summary: Option<String>,
    /// Description of the method.
    pub description: Option<String>,
    /// Required flags by encoded parameter key.
    pub request_parameters: Option<IndexMap<String, bool>>,
    /// Parameter properties by encoded parameter key.
    pub request_parameter_schemas: Option<IndexMap<String, ParameterSpec>>,
    /// Request models by content type.
    pub request_models: Option<IndexMap<String, ModelRef>>,
    /// Method responses.
    pub method_responses: Option<Vec<MethodResponse>>,
}

impl MethodOptions {
    /// Creates empty method options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    /// Sets the authorizer.
    pub fn with_authorizer(mut self, authorizer: AuthorizerWithSpec) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    /// Sets the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a required flag for an encoded parameter key.
    pub fn with_request_parameter(mut self, key: impl Into<String>, required: bool) -> Self {
        self.request_parameters
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), required);
        self
    }

    /// Adds parameter properties for an encoded parameter key.
    pub fn with_request_parameter_schema(
        mut self,
        key: impl Into<String>,
        spec: ParameterSpec,
    ) -> Self {
        self.request_parameter_schemas
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), spec);
        self
    }

    /// Adds a request model for a content type.
    pub fn with_request_model(
        mut self,
        content_type: impl Into<String>,
        model: ModelRef,
    ) -> Self {
        self.request_models
            .get_or_insert_with(IndexMap::new)
            .insert(content_type.into(), model);
        self
    }

    /// Adds a method response.
    pub fn with_method_response(mut self, response: MethodResponse) -> Self {
        self.method_responses
            .get_or_insert_with(Vec::new)
            .push(response);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_to_ref_keeps_identifier() {
        let model = Model::new("${Token[TOKEN.42]}");
        assert_eq!(model.to_ref(), ModelRef::new("${Token[TOKEN.42]}"));
        assert_eq!(ModelRef::from(&model), model.to_ref());
    }

    #[test]
    fn test_method_options_builders_accumulate() {
        let options = MethodOptions::new()
            .with_summary("Find pets")
            .with_request_parameter("method.request.querystring.status", false)
            .with_request_parameter("method.request.header.x-trace", true);
        let flags = options.request_parameters.unwrap();
        assert_eq!(flags.len(), 2);
        assert_eq!(flags["method.request.querystring.status"], false);
        assert_eq!(flags["method.request.header.x-trace"], true);
        assert_eq!(options.summary.as_deref(), Some("Find pets"));
    }

    #[test]
    fn test_method_response_builders() {
        let response = MethodResponse::new("200")
            .with_description("Successful operation")
            .with_response_model("application/json", ModelRef::new("${Token[TOKEN.7]}"));
        assert_eq!(response.status_code, "200");
        let models = response.response_models.unwrap();
        assert_eq!(
            models["application/json"],
            ModelRef::new("${Token[TOKEN.7]}")
        );
    }
}
