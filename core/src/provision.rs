#![deny(missing_docs)]

//! # Provisioning Collaborator Interfaces
//!
//! The seams through which the core reaches the resource-provisioning
//! runtime: the resource tree, model registration, deferred-identifier
//! resolution, and the completion hook that triggers document output. The
//! runtime itself is out of scope; tests inject in-memory fakes.

use std::rc::Rc;

use crate::error::AppResult;
use crate::models::{GatewayModelOptions, MethodOptions, Model, ResourceOptions};

/// Finalize hook invoked by the provisioning runtime once all declarations
/// are complete.
pub type ValidationHook = Box<dyn Fn() -> AppResult<()>>;

/// Resolves deferred identifiers to concrete resource identifiers.
///
/// Identifiers handed out during the declaration phase are placeholder
/// tokens; the resolver turns them into the stable identifiers used inside
/// the OpenAPI definition.
pub trait ReferenceResolver {
    /// Resolves `reference` to a concrete identifier.
    ///
    /// # Errors
    ///
    /// `AppError::UnresolvedReference` if `reference` is not a
    /// deferred-reference token this resolver understands, or resolution is
    /// attempted before the surrounding plan can supply an identifier.
    fn resolve(&self, reference: &str) -> AppResult<String>;
}

/// A provisioned path resource in the gateway's resource tree.
pub trait ProvisionedResource {
    /// URL path of the resource, e.g. `/pet/{petId}`.
    fn path(&self) -> String;

    /// Creates a child resource for `path_part`.
    fn add_child(
        &self,
        path_part: &str,
        options: Option<&ResourceOptions>,
    ) -> AppResult<Rc<dyn ProvisionedResource>>;

    /// Attaches a method to the resource.
    ///
    /// `options` is the adjusted declaration: its `request_parameters` flag
    /// map already reflects schema-style requirements.
    fn attach_method(&self, http_method: &str, options: Option<&MethodOptions>) -> AppResult<()>;
}

/// The provisioned REST API owning the resource tree.
pub trait ProvisionedRestApi {
    /// Deferred identifier of the API itself.
    fn rest_api_id(&self) -> String;

    /// Display name of the API.
    fn rest_api_name(&self) -> String;

    /// Root resource (`/`).
    fn root(&self) -> Rc<dyn ProvisionedResource>;

    /// Registers a named model and returns its handle.
    fn register_model(&self, id: &str, options: &GatewayModelOptions) -> AppResult<Model>;

    /// Registers a finalize hook to be invoked once after all declarations
    /// are complete, before the surrounding plan is considered final.
    fn add_validation(&self, hook: ValidationHook);
}

/// A provisioned authorizer.
pub trait ProvisionedAuthorizer {
    /// Deferred identifier of the authorizer.
    fn authorizer_id(&self) -> String;
}
