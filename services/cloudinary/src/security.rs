// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use cldsign_core::{utils::Redact, Context, Error, ErrorKind, Result};
use log::{debug, warn};
use serde::Deserialize;

use crate::Credential;

/// Security is the caller supplied authentication for a single request.
///
/// A missing security is expressed as `Option::<Security>::None`.
#[derive(Clone, PartialEq, Eq)]
pub enum Security {
    /// OAuth2 bearer token. Wins over every other scheme when non-empty.
    Bearer(String),
    /// Api key and secret supplied directly.
    Credentials {
        /// Overrides the resolved api key when non-empty.
        api_key: Option<String>,
        /// Overrides the resolved api secret when non-empty.
        api_secret: Option<String>,
    },
    /// Api key and secret supplied under the `cloudinaryAuth` alias.
    Aliased(CloudinaryAuth),
}

impl Security {
    /// Create a bearer security.
    pub fn bearer(token: impl Into<String>) -> Self {
        Security::Bearer(token.into())
    }

    /// Create a direct credentials security.
    pub fn credentials(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Security::Credentials {
            api_key: Some(api_key.into()),
            api_secret: Some(api_secret.into()),
        }
    }

    /// The bearer token, if this security carries a usable one.
    ///
    /// Empty tokens fall through to credential based signing.
    pub fn bearer_token(&self) -> Option<&str> {
        match self {
            Security::Bearer(token) if !token.is_empty() => Some(token.as_str()),
            _ => None,
        }
    }

    /// Merge the overrides carried by this security into `cred`.
    pub fn merge_into(&self, cred: Credential) -> Credential {
        let (api_key, api_secret) = match self {
            Security::Bearer(_) => (None, None),
            Security::Credentials {
                api_key,
                api_secret,
            } => (api_key.as_deref(), api_secret.as_deref()),
            Security::Aliased(auth) => (auth.key(), auth.secret()),
        };

        cred.with_api_key(api_key.unwrap_or_default())
            .with_api_secret(api_secret.unwrap_or_default())
    }
}

impl Debug for Security {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Security::Bearer(token) => f.debug_tuple("Bearer").field(&Redact::from(token)).finish(),
            Security::Credentials {
                api_key,
                api_secret,
            } => f
                .debug_struct("Credentials")
                .field("api_key", &Redact::from(api_key))
                .field("api_secret", &Redact::from(api_secret))
                .finish(),
            Security::Aliased(auth) => f.debug_tuple("Aliased").field(auth).finish(),
        }
    }
}

/// The `cloudinaryAuth` security shape, accepting both camelCase and
/// snake_case field names.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CloudinaryAuth {
    /// `apiKey`
    #[serde(rename = "apiKey", default)]
    pub api_key: Option<String>,
    /// `api_key`
    #[serde(rename = "api_key", default)]
    pub api_key_snake: Option<String>,
    /// `apiSecret`
    #[serde(rename = "apiSecret", default)]
    pub api_secret: Option<String>,
    /// `api_secret`
    #[serde(rename = "api_secret", default)]
    pub api_secret_snake: Option<String>,
}

impl CloudinaryAuth {
    /// The first non-empty of `apiKey` and `api_key`.
    pub fn key(&self) -> Option<&str> {
        first_non_empty(&self.api_key, &self.api_key_snake)
    }

    /// The first non-empty of `apiSecret` and `api_secret`.
    pub fn secret(&self) -> Option<&str> {
        first_non_empty(&self.api_secret, &self.api_secret_snake)
    }
}

fn first_non_empty<'a>(a: &'a Option<String>, b: &'a Option<String>) -> Option<&'a str> {
    [a, b]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|v| !v.is_empty())
}

impl Debug for CloudinaryAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryAuth")
            .field("api_key", &Redact::from(self.key().unwrap_or_default()))
            .field("api_secret", &Redact::from(self.secret().unwrap_or_default()))
            .finish()
    }
}

/// SecurityObject is the loosely shaped security object SDK callers pass
/// around, e.g. decoded from JSON.
///
/// Use [`SecurityObject::classify`] to turn it into a [`Security`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityObject {
    /// OAuth2 bearer token.
    #[serde(default)]
    pub oauth2: Option<String>,
    /// Aliased credentials.
    #[serde(default)]
    pub cloudinary_auth: Option<CloudinaryAuth>,
    /// Direct api key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Direct api secret.
    #[serde(default)]
    pub api_secret: Option<String>,
}

impl SecurityObject {
    /// Collapse the object into one security variant.
    ///
    /// A non-empty `oauth2` wins, then `cloudinaryAuth`, then direct
    /// `apiKey`/`apiSecret`.
    pub fn classify(self) -> Option<Security> {
        if let Some(token) = self.oauth2.filter(|v| !v.is_empty()) {
            return Some(Security::Bearer(token));
        }
        if let Some(auth) = self.cloudinary_auth {
            return Some(Security::Aliased(auth));
        }
        if self.api_key.is_some() || self.api_secret.is_some() {
            return Some(Security::Credentials {
                api_key: self.api_key,
                api_secret: self.api_secret,
            });
        }

        None
    }
}

/// ProvideSecurity resolves the security for a request on demand, for
/// example to refresh an OAuth2 token.
#[async_trait]
pub trait ProvideSecurity: Debug + Send + Sync + 'static {
    /// Resolve the security for the next request.
    async fn provide_security(&self, ctx: &Context) -> Result<Option<Security>>;
}

/// Adapts an async closure into [`ProvideSecurity`].
pub struct SecurityFn<F>(F);

impl<F> Debug for SecurityFn<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecurityFn")
    }
}

#[async_trait]
impl<F, Fut> ProvideSecurity for SecurityFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Security>>> + Send,
{
    async fn provide_security(&self, _: &Context) -> Result<Option<Security>> {
        (self.0)().await
    }
}

/// SecuritySource is what the caller hands to the signer for each request.
#[derive(Clone, Debug, Default)]
pub enum SecuritySource {
    /// No security supplied.
    #[default]
    None,
    /// A fixed security.
    Static(Security),
    /// A resolver invoked once per request.
    Provider(Arc<dyn ProvideSecurity>),
}

impl SecuritySource {
    /// Create a source backed by a provider.
    pub fn provider(provider: impl ProvideSecurity) -> Self {
        SecuritySource::Provider(Arc::new(provider))
    }

    /// Create a source backed by an async closure.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Security>>> + Send,
    {
        Self::provider(SecurityFn(f))
    }

    /// Resolve the effective security for one request.
    ///
    /// Provider failures surface as `SecurityResolution` errors.
    pub async fn resolve(&self, ctx: &Context) -> Result<Option<Security>> {
        match self {
            SecuritySource::None => Ok(None),
            SecuritySource::Static(security) => Ok(Some(security.clone())),
            SecuritySource::Provider(provider) => {
                let security = provider.provide_security(ctx).await.map_err(|err| {
                    if err.kind() == ErrorKind::SecurityResolution {
                        err
                    } else {
                        Error::security_resolution("security provider failed").with_source(err)
                    }
                })?;

                match &security {
                    Some(s) => debug!("security resolved by provider: {s:?}"),
                    None => warn!("security provider returned no security"),
                }
                Ok(security)
            }
        }
    }
}

impl From<Security> for SecuritySource {
    fn from(security: Security) -> Self {
        SecuritySource::Static(security)
    }
}

impl From<Option<Security>> for SecuritySource {
    fn from(security: Option<Security>) -> Self {
        security.map_or(SecuritySource::None, SecuritySource::Static)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classify(v: serde_json::Value) -> Option<Security> {
        serde_json::from_value::<SecurityObject>(v)
            .expect("security object must deserialize")
            .classify()
    }

    #[test]
    fn test_classify() {
        let cases = vec![
            ("absent", serde_json::json!({}), None),
            (
                "bearer",
                serde_json::json!({"oauth2": "token", "apiKey": "k"}),
                Some(Security::bearer("token")),
            ),
            (
                "empty bearer falls through",
                serde_json::json!({"oauth2": "", "apiKey": "k", "apiSecret": "s"}),
                Some(Security::credentials("k", "s")),
            ),
            (
                "aliased beats direct",
                serde_json::json!({"cloudinaryAuth": {"api_key": "k"}, "apiKey": "other"}),
                Some(Security::Aliased(CloudinaryAuth {
                    api_key_snake: Some("k".to_string()),
                    ..Default::default()
                })),
            ),
            (
                "direct key only",
                serde_json::json!({"apiKey": "k"}),
                Some(Security::Credentials {
                    api_key: Some("k".to_string()),
                    api_secret: None,
                }),
            ),
        ];

        for (name, input, expected) in cases {
            assert_eq!(classify(input), expected, "case: {name}");
        }
    }

    #[test]
    fn test_aliased_prefers_camel_case() {
        let auth = CloudinaryAuth {
            api_key: Some("camel".to_string()),
            api_key_snake: Some("snake".to_string()),
            api_secret: Some(String::new()),
            api_secret_snake: Some("snake_secret".to_string()),
        };

        assert_eq!(auth.key(), Some("camel"));
        assert_eq!(auth.secret(), Some("snake_secret"));
    }

    #[test]
    fn test_merge_into() {
        let base = Credential::new("demo", "111", "secret1");

        let merged = Security::Credentials {
            api_key: Some("222".to_string()),
            api_secret: Some(String::new()),
        }
        .merge_into(base.clone());
        assert_eq!(merged, Credential::new("demo", "222", "secret1"));

        let merged = Security::bearer("token").merge_into(base.clone());
        assert_eq!(merged, base);
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(Security::bearer("t").bearer_token(), Some("t"));
        assert_eq!(Security::bearer("").bearer_token(), None);
        assert_eq!(Security::credentials("k", "s").bearer_token(), None);
    }

    #[test]
    fn test_debug_redacts() {
        let s = format!("{:?}", Security::bearer("a-long-bearer-token-value"));
        assert!(!s.contains("a-long-bearer-token-value"));
    }

    #[tokio::test]
    async fn test_resolve_from_fn() -> Result<()> {
        let ctx = Context::new();
        let source = SecuritySource::from_fn(|| async {
            Ok::<Option<Security>, Error>(Some(Security::bearer("fresh")))
        });

        assert_eq!(source.resolve(&ctx).await?, Some(Security::bearer("fresh")));
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_failure_is_security_resolution() {
        let ctx = Context::new();
        let source = SecuritySource::from_fn(|| async {
            Err::<Option<Security>, _>(Error::unexpected("token endpoint unreachable"))
        });

        let err = source.resolve(&ctx).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SecurityResolution);
    }
}
