#![deny(missing_docs)]

//! # OpenAPI Document Assembly
//!
//! - **adapter**: converts translated schemas, model maps, and method
//!   responses into document fragments.
//! - **builder**: accumulates the document for one API and serializes it.
//! - **parameters**: parameter objects, merging, and request-parameter
//!   translation.

pub mod adapter;
pub mod builder;
pub mod parameters;

pub use adapter::{
    method_responses_to_responses, request_models_to_request_body, schema_to_schema_object,
};
pub use builder::{
    DocumentBuilder, InfoObject, OperationObject, PathItem, SecurityRequirement,
};
pub use parameters::{
    default_path_parameter, merge_parameter_objects, translate_request_parameters,
    ParameterObject, ParameterSpec, TranslatedRequestParameters,
};
