#![deny(missing_docs)]

//! # Parameter Key Grammar
//!
//! Parses the compact request/response parameter keys used to declare method
//! parameters, e.g. `method.request.querystring.status`.
//!
//! A key encodes the direction (request or response), the gateway mapping
//! location, and the parameter name in one dotted string. Parsing derives the
//! canonical OpenAPI location (`path`, `query`, `header`) and whether the
//! parameter carries multiple values.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Direction of a parameter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Request parameter.
    Request,
    /// Response parameter.
    Response,
}

/// Canonical parameter location in the OpenAPI definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Path parameter.
    Path,
    /// Query parameter.
    Query,
    /// Header parameter.
    Header,
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Header => "header",
        };
        write!(f, "{}", token)
    }
}

/// Parsed request or response parameter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterKey {
    /// Request or response.
    pub direction: Direction,
    /// Name of the parameter.
    pub name: String,
    /// Location of the parameter.
    pub location: ParamLocation,
    /// Whether the parameter can have multiple values.
    pub explode: bool,
}

fn key_pattern() -> &'static Regex {
    static KEY_RE: OnceLock<Regex> = OnceLock::new();
    KEY_RE.get_or_init(|| {
        Regex::new(
            r"^method\.(request|response)\.(path|querystring|multivaluequerystring|header|multivalueheader)\.(.*)$",
        )
        .expect("Invalid regex")
    })
}

impl ParameterKey {
    /// Parses a given request or response parameter key.
    ///
    /// A parameter key must have the following form,
    ///
    /// ```text
    /// method.<direction>.<location>.<parameter-name>
    /// ```
    ///
    /// `<direction>` must be either `request` or `response`.
    ///
    /// `<location>` must be one of the following,
    ///
    /// ```text
    /// - "path"
    /// - "querystring" (invalid if direction=response)
    /// - "multivaluequerystring" (invalid if direction=response)
    /// - "header"
    /// - "multivalueheader"
    /// ```
    ///
    /// `<parameter-name>` is the unconstrained remainder of the key; it may
    /// contain further dots and may be empty.
    ///
    /// # Errors
    ///
    /// `AppError::ParameterKey` if `key` is not a valid parameter key.
    pub fn parse(key: &str) -> AppResult<Self> {
        let captures = key_pattern().captures(key).ok_or_else(|| {
            AppError::ParameterKey(format!(
                "invalid request or response parameter key: {}",
                key
            ))
        })?;
        let direction = if &captures[1] == "request" {
            Direction::Request
        } else {
            Direction::Response
        };
        let mapping_location = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
        if direction == Direction::Response
            && matches!(mapping_location, "querystring" | "multivaluequerystring")
        {
            return Err(AppError::ParameterKey(format!(
                "querystring or multivaluequerystring is not acceptable as a response parameter key: {}",
                key
            )));
        }
        let explode = matches!(
            mapping_location,
            "multivaluequerystring" | "multivalueheader"
        );
        let location = match mapping_location {
            "path" => ParamLocation::Path,
            "querystring" | "multivaluequerystring" => ParamLocation::Query,
            _ => ParamLocation::Header,
        };
        Ok(Self {
            direction,
            name: captures[3].to_string(),
            location,
            explode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_path() {
        let key = ParameterKey::parse("method.request.path.petId").unwrap();
        assert_eq!(key.direction, Direction::Request);
        assert_eq!(key.name, "petId");
        assert_eq!(key.location, ParamLocation::Path);
        assert!(!key.explode);
    }

    #[test]
    fn test_parse_request_querystring() {
        let key = ParameterKey::parse("method.request.querystring.status").unwrap();
        assert_eq!(key.direction, Direction::Request);
        assert_eq!(key.name, "status");
        assert_eq!(key.location, ParamLocation::Query);
        assert!(!key.explode);
    }

    #[test]
    fn test_parse_multivaluequerystring_explodes() {
        let key = ParameterKey::parse("method.request.multivaluequerystring.tags").unwrap();
        assert_eq!(key.direction, Direction::Request);
        assert_eq!(key.name, "tags");
        assert_eq!(key.location, ParamLocation::Query);
        assert!(key.explode);
    }

    #[test]
    fn test_parse_header_locations() {
        let single = ParameterKey::parse("method.request.header.x-api-key").unwrap();
        assert_eq!(single.location, ParamLocation::Header);
        assert!(!single.explode);

        let multi = ParameterKey::parse("method.response.multivalueheader.Set-Cookie").unwrap();
        assert_eq!(multi.direction, Direction::Response);
        assert_eq!(multi.location, ParamLocation::Header);
        assert!(multi.explode);
    }

    #[test]
    fn test_parse_name_may_contain_dots() {
        let key = ParameterKey::parse("method.request.querystring.filter.by.name").unwrap();
        assert_eq!(key.name, "filter.by.name");
    }

    #[test]
    fn test_parse_empty_name_is_accepted() {
        // the name segment is unconstrained once the first three components match
        let key = ParameterKey::parse("method.request.path.").unwrap();
        assert_eq!(key.name, "");
        assert_eq!(key.location, ParamLocation::Path);
    }

    #[test]
    fn test_response_querystring_is_rejected() {
        for key in [
            "method.response.querystring.status",
            "method.response.multivaluequerystring.tags",
        ] {
            let err = ParameterKey::parse(key).unwrap_err();
            assert!(matches!(err, AppError::ParameterKey(_)), "{}", key);
        }
    }

    #[test]
    fn test_malformed_keys_are_rejected() {
        for key in [
            "",
            "method",
            "method.request",
            "method.request.path",
            "method.request.body.petId",
            "method.upgrade.path.petId",
            "integration.request.path.petId",
            "Method.request.path.petId",
        ] {
            let err = ParameterKey::parse(key).unwrap_err();
            assert!(matches!(err, AppError::ParameterKey(_)), "{}", key);
        }
    }
}
