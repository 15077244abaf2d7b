#![deny(missing_docs)]

//! # apigw-spec core
//!
//! Declares an API Gateway REST API surface against a provisioning
//! collaborator and synthesizes the matching OpenAPI 3.1 definition from the
//! same declarations. Routes, methods, and models are described once; the
//! gateway configuration and the OpenAPI document cannot drift apart because
//! both derive from that single pass.

/// Shared error types.
pub mod error;

/// Request/response parameter key grammar.
pub mod keys;

/// Extended JSON Schema trees and the dual-dialect translation.
pub mod schema;

/// Declaration option and record types.
pub mod models;

/// OpenAPI document assembly.
pub mod oas;

/// Provisioning collaborator interfaces.
pub mod provision;

/// Authorizer augmentation.
pub mod authorizer;

/// Resource and method assembly.
pub mod api;

pub use api::{
    collect_inherited_parameters, OpenApiInfoProps, ResourceWithSpec, RestApiWithSpec,
    RestApiWithSpecProps,
};
pub use authorizer::{augment_authorizer, AuthorizerWithSpec};
pub use error::{AppError, AppResult};
pub use keys::{Direction, ParamLocation, ParameterKey};
pub use models::{
    GatewayModelOptions, MethodOptions, MethodResponse, Model, ModelOptions, ModelRef,
    ResourceOptions,
};
pub use oas::{
    default_path_parameter, merge_parameter_objects, method_responses_to_responses,
    request_models_to_request_body, schema_to_schema_object, translate_request_parameters,
    DocumentBuilder, InfoObject, OperationObject, ParameterObject, ParameterSpec, PathItem,
    SecurityRequirement, TranslatedRequestParameters,
};
pub use provision::{
    ProvisionedAuthorizer, ProvisionedResource, ProvisionedRestApi, ReferenceResolver,
    ValidationHook,
};
pub use schema::{
    translate_schema, BoolOrSchema, Dependency, GatewaySchema, JsonType, OneOrMany, SchemaEx,
    TranslatedSchema, TypeSpec,
};
