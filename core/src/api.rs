#![deny(missing_docs)]

//! # REST API Assembler
//!
//! Front end of the crate: wraps a provisioned REST API and its resource
//! tree so that declaring models, resources, and methods once produces both
//! the gateway configuration (through the provisioning collaborator) and the
//! OpenAPI definition (through the document builder).
//!
//! The wrappers are explicit decorator types: each holds the underlying
//! provisioning object plus the extra declaration state, and exposes the
//! same operation names through its own interface.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::AppResult;
use crate::models::{GatewayModelOptions, MethodOptions, Model, ModelOptions, ResourceOptions};
use crate::oas::adapter::{
    method_responses_to_responses, request_models_to_request_body, schema_to_schema_object,
};
use crate::oas::builder::{DocumentBuilder, InfoObject, OperationObject, SecurityRequirement};
use crate::oas::parameters::{
    default_path_parameter, merge_parameter_objects, translate_request_parameters,
    ParameterObject,
};
use crate::provision::{ProvisionedResource, ProvisionedRestApi, ReferenceResolver};
use crate::schema::translate::translate_schema;

/// Info properties for the synthesized OpenAPI definition.
#[derive(Debug, Clone, Default)]
pub struct OpenApiInfoProps {
    /// Title; defaults to the provisioning API's name.
    pub title: Option<String>,
    /// Version of the API document.
    pub version: String,
    /// Description; falls back to the REST API description.
    pub description: Option<String>,
}

impl OpenApiInfoProps {
    /// Creates info properties with the required version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Properties for [`RestApiWithSpec`].
#[derive(Debug, Clone)]
pub struct RestApiWithSpecProps {
    /// Description of the REST API.
    pub description: Option<String>,
    /// Info block of the OpenAPI definition.
    pub open_api_info: OpenApiInfoProps,
    /// Path to the output file where the OpenAPI definition is saved.
    pub open_api_output_path: PathBuf,
}

impl RestApiWithSpecProps {
    /// Creates properties with the required info block and output path.
    pub fn new(open_api_info: OpenApiInfoProps, open_api_output_path: impl Into<PathBuf>) -> Self {
        Self {
            description: None,
            open_api_info,
            open_api_output_path: open_api_output_path.into(),
        }
    }

    /// Sets the REST API description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Shared per-API declaration context handed to every resource wrapper.
#[derive(Clone)]
struct ApiContext {
    rest_api_id: String,
    resolver: Rc<dyn ReferenceResolver>,
    builder: Rc<RefCell<DocumentBuilder>>,
}

/// REST API declaration front end that also synthesizes the OpenAPI
/// definition.
///
/// The document is written when the provisioning collaborator invokes the
/// finalize hook registered at construction, after all declarations are
/// complete.
pub struct RestApiWithSpec {
    api: Rc<dyn ProvisionedRestApi>,
    context: ApiContext,
    root: ResourceWithSpec,
}

impl RestApiWithSpec {
    /// Wraps a provisioned REST API.
    ///
    /// Registers the root resource path and a finalize hook that writes the
    /// OpenAPI definition to `props.open_api_output_path` once the
    /// collaborator signals that all declarations are complete.
    pub fn new(
        api: Rc<dyn ProvisionedRestApi>,
        resolver: Rc<dyn ReferenceResolver>,
        props: RestApiWithSpecProps,
    ) -> AppResult<Self> {
        let title = props
            .open_api_info
            .title
            .clone()
            .unwrap_or_else(|| api.rest_api_name());
        let mut info = InfoObject::new(title, props.open_api_info.version.clone());
        info.description = props
            .open_api_info
            .description
            .clone()
            .or_else(|| props.description.clone());
        let builder = Rc::new(RefCell::new(DocumentBuilder::new(info)));
        let context = ApiContext {
            rest_api_id: api.rest_api_id(),
            resolver,
            builder: Rc::clone(&builder),
        };

        // synthesizes the OpenAPI definition when the collaborator validates
        let hook_builder = Rc::clone(&builder);
        let output_path = props.open_api_output_path.clone();
        api.add_validation(Box::new(move || hook_builder.borrow().write_to(&output_path)));

        let root = ResourceWithSpec::attach(api.root(), None, None, context.clone())?;
        Ok(Self { api, context, root })
    }

    /// Root resource (`/`) with the features to build the OpenAPI
    /// definition.
    pub fn root(&self) -> ResourceWithSpec {
        self.root.clone()
    }

    /// Registers a new model.
    ///
    /// The extended schema is translated once: the gateway form goes to the
    /// provisioning collaborator, the OpenAPI form is stored as a schema
    /// component under the resolved model identifier.
    ///
    /// # Errors
    ///
    /// `AppError::UnresolvedReference` if a referenced identifier cannot be
    /// resolved; collaborator errors propagate unchanged.
    pub fn add_model(&self, id: &str, options: ModelOptions) -> AppResult<Model> {
        let translated = translate_schema(
            &options.schema,
            &self.context.rest_api_id,
            self.context.resolver.as_ref(),
        )?;
        let gateway_options = GatewayModelOptions {
            content_type: options.content_type.clone(),
            description: options.description.clone(),
            model_name: options.model_name.clone(),
            schema: translated.gateway,
        };
        let model = self.api.register_model(id, &gateway_options)?;
        let model_id = self.context.resolver.resolve(&model.model_id)?;
        self.context
            .builder
            .borrow_mut()
            .add_schema(&model_id, schema_to_schema_object(&translated.document));
        Ok(model)
    }
}

struct ResourceInner {
    resource: Rc<dyn ProvisionedResource>,
    parent: Option<ResourceWithSpec>,
    default_method_options: Option<MethodOptions>,
    context: ApiContext,
}

/// Resource wrapper with the features to build the OpenAPI definition.
///
/// Cheap to clone; clones share the same underlying resource. A resource is
/// registered once, when declared, and never removed.
#[derive(Clone)]
pub struct ResourceWithSpec {
    inner: Rc<ResourceInner>,
}

impl ResourceWithSpec {
    /// Wraps `resource` and registers its path.
    ///
    /// The path-level parameter block shared by every operation at this path
    /// is the default parameter of a parameterized terminal segment,
    /// overridden by the parameters of the resource's own default method
    /// options. Operations do not repeat these entries.
    fn attach(
        resource: Rc<dyn ProvisionedResource>,
        parent: Option<ResourceWithSpec>,
        options: Option<ResourceOptions>,
        context: ApiContext,
    ) -> AppResult<Self> {
        let default_method_options = options.and_then(|o| o.default_method_options);
        let default_parameters = default_path_parameter(&resource.path());
        let translated = translate_request_parameters(default_method_options.as_ref())?;
        let parameters = merge_parameter_objects(default_parameters, translated.parameters);
        context
            .builder
            .borrow_mut()
            .add_path(&resource.path(), parameters);
        Ok(Self {
            inner: Rc::new(ResourceInner {
                resource,
                parent,
                default_method_options,
                context,
            }),
        })
    }

    /// URL path of this resource.
    pub fn path(&self) -> String {
        self.inner.resource.path()
    }

    /// Parent resource; `None` if this resource is the root.
    pub fn parent_resource(&self) -> Option<&ResourceWithSpec> {
        self.inner.parent.as_ref()
    }

    /// Default method options declared on this resource.
    pub fn default_method_options(&self) -> Option<&MethodOptions> {
        self.inner.default_method_options.as_ref()
    }

    /// Adds a new child resource with the OpenAPI definition.
    ///
    /// # Errors
    ///
    /// `AppError::ParameterKey` if the options carry an invalid parameter
    /// key; collaborator errors propagate unchanged.
    pub fn add_resource(
        &self,
        path_part: &str,
        options: Option<ResourceOptions>,
    ) -> AppResult<ResourceWithSpec> {
        let child = self.inner.resource.add_child(path_part, options.as_ref())?;
        ResourceWithSpec::attach(
            child,
            Some(self.clone()),
            options,
            self.inner.context.clone(),
        )
    }

    /// Adds a method with the OpenAPI definition.
    ///
    /// The operation's parameter block is the inherited ancestor defaults
    /// overridden by the parameters declared in `options`. Declaring the
    /// same method twice replaces the earlier operation record; the last
    /// write wins.
    ///
    /// # Errors
    ///
    /// `AppError::ParameterKey` for invalid parameter keys,
    /// `AppError::UnresolvedReference` for unresolvable model or authorizer
    /// identifiers; collaborator errors propagate unchanged.
    pub fn add_method(&self, http_method: &str, options: Option<MethodOptions>) -> AppResult<()> {
        let context = &self.inner.context;
        let inherited = collect_inherited_parameters(self.parent_resource())?;
        let translated = translate_request_parameters(options.as_ref())?;
        self.inner
            .resource
            .attach_method(http_method, translated.method_options.as_ref())?;

        let request_body = match options.as_ref().and_then(|o| o.request_models.as_ref()) {
            Some(models) => Some(request_models_to_request_body(
                context.resolver.as_ref(),
                models,
            )?),
            None => None,
        };
        let responses = match options.as_ref().and_then(|o| o.method_responses.as_ref()) {
            Some(method_responses) => Some(method_responses_to_responses(
                context.resolver.as_ref(),
                method_responses,
            )?),
            None => None,
        };

        let mut security = None;
        if let Some(authorizer) = options.as_ref().and_then(|o| o.authorizer.as_ref()) {
            if let Some(scheme) = &authorizer.security_scheme {
                let authorizer_id = context.resolver.resolve(&authorizer.authorizer_id())?;
                // overwrites the scheme every time the authorizer is
                // referenced in method options, which is harmless: the
                // descriptor does not change between references
                context
                    .builder
                    .borrow_mut()
                    .add_security_scheme(&authorizer_id, scheme.clone());
                let mut requirement = SecurityRequirement::new();
                requirement.insert(authorizer_id, Vec::new());
                security = Some(vec![requirement]);
            }
        }

        let operation = OperationObject {
            operation_id: options.as_ref().and_then(|o| o.operation_name.clone()),
            summary: options.as_ref().and_then(|o| o.summary.clone()),
            description: options.as_ref().and_then(|o| o.description.clone()),
            parameters: merge_parameter_objects(inherited, translated.parameters),
            request_body,
            responses,
            security,
        };
        context
            .builder
            .borrow_mut()
            .set_operation(&self.path(), http_method, operation);
        Ok(())
    }
}

/// Collects the parameters a resource's operations inherit from its
/// ancestors.
///
/// Traverses the parent chain up to the root, translating each level's
/// default-method-option parameters and merging child-ward: a nearer level
/// overrides a farther one by parameter name. Returns `None` for an absent
/// resource.
pub fn collect_inherited_parameters(
    resource: Option<&ResourceWithSpec>,
) -> AppResult<Option<Vec<ParameterObject>>> {
    let Some(resource) = resource else {
        return Ok(None);
    };
    let base = collect_inherited_parameters(resource.parent_resource())?;
    let translated = translate_request_parameters(resource.default_method_options())?;
    Ok(merge_parameter_objects(base, translated.parameters))
}
