#![deny(missing_docs)]

//! # Authorizer Augmentation
//!
//! Wraps a provisioned authorizer together with the security scheme object
//! describing it, so operations guarded by the authorizer can register the
//! scheme in the OpenAPI definition.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::provision::ProvisionedAuthorizer;

/// Authorizer augmented with the features to describe the OpenAPI
/// definition.
///
/// Holds the underlying provisioning authorizer and, when attached, the
/// security scheme object representing it. Operations referencing an
/// authorizer without a scheme get no security requirement.
#[derive(Clone)]
pub struct AuthorizerWithSpec {
    /// Underlying provisioning authorizer.
    pub inner: Rc<dyn ProvisionedAuthorizer>,
    /// Security scheme object representing this authorizer.
    pub security_scheme: Option<Value>,
}

impl AuthorizerWithSpec {
    /// Deferred identifier of the underlying authorizer.
    pub fn authorizer_id(&self) -> String {
        self.inner.authorizer_id()
    }
}

impl fmt::Debug for AuthorizerWithSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizerWithSpec")
            .field("security_scheme", &self.security_scheme)
            .finish_non_exhaustive()
    }
}

/// Makes a given provisioned authorizer an [`AuthorizerWithSpec`] by
/// augmenting it with the specified security scheme object.
pub fn augment_authorizer(
    authorizer: Rc<dyn ProvisionedAuthorizer>,
    security_scheme: Value,
) -> AuthorizerWithSpec {
    AuthorizerWithSpec {
        inner: authorizer,
        security_scheme: Some(security_scheme),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticAuthorizer;

    impl ProvisionedAuthorizer for StaticAuthorizer {
        fn authorizer_id(&self) -> String {
            "${Token[TOKEN.300]}".to_string()
        }
    }

    #[test]
    fn test_augment_attaches_scheme_and_delegates_id() {
        let scheme = json!({"type": "apiKey", "in": "header", "name": "Authorization"});
        let authorizer = augment_authorizer(Rc::new(StaticAuthorizer), scheme.clone());
        assert_eq!(authorizer.authorizer_id(), "${Token[TOKEN.300]}");
        assert_eq!(authorizer.security_scheme, Some(scheme));
    }
}
