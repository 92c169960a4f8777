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

//! Authentication strategies and the classification that selects them.

mod form_data;
mod header;
mod json;
mod query;

pub(crate) use form_data::sign as sign_form_data;
pub(crate) use header::{sign_basic, sign_bearer};
pub(crate) use json::sign as sign_json;
pub(crate) use query::sign as sign_query;

use std::fmt::{Debug, Formatter};

use cldsign_core::utils::Redact;
use cldsign_core::{Error, Result, SigningCredential};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Request, Uri};
use once_cell::sync::Lazy;

use crate::constants::*;
use crate::params::Signature;
use crate::{Body, Credential, Security};

/// Every `<resource_type>/<action>` path fragment that requires signing.
static SIGNED_PATHS: Lazy<Vec<String>> = Lazy::new(|| {
    RESOURCE_TYPES
        .iter()
        .flat_map(|rt| SIGNED_ACTIONS.iter().map(move |a| format!("{rt}/{a}")))
        .collect()
});

/// How a request gets authenticated.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strategy<'a> {
    /// Leave the request untouched.
    Passthrough,
    /// `Authorization: Bearer <token>`.
    Bearer(&'a str),
    /// `Authorization: Basic base64(key:secret)`.
    Basic,
    /// Signature in the query string.
    Query,
    /// Signature in the JSON body.
    Json,
    /// Signature in the query string, computed over form fields.
    FormData,
}

impl Debug for Strategy<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Passthrough => f.write_str("Passthrough"),
            Strategy::Bearer(token) => f.debug_tuple("Bearer").field(&Redact::from(*token)).finish(),
            Strategy::Basic => f.write_str("Basic"),
            Strategy::Query => f.write_str("Query"),
            Strategy::Json => f.write_str("Json"),
            Strategy::FormData => f.write_str("FormData"),
        }
    }
}

/// Select the strategy for `req`.
///
/// `cred` is the credential after merging the caller's security overrides,
/// `query_params` the signable query parameters.
pub(crate) fn classify<'a>(
    req: &Request<Body>,
    security: Option<&'a Security>,
    cred: &Credential,
    query_params: &[String],
) -> Result<Strategy<'a>> {
    if let Some(token) = security.and_then(Security::bearer_token) {
        return Ok(Strategy::Bearer(token));
    }
    if !cred.is_valid() {
        return Ok(Strategy::Passthrough);
    }
    if !is_signed_path(req.uri()) {
        return Ok(Strategy::Basic);
    }

    let content_type = content_type(req.headers());
    let strategy = match req.body() {
        body if body.is_empty() => Strategy::Query,
        Body::Form(_) => Strategy::FormData,
        _ if content_type.as_deref() == Some("application/json") => Strategy::Json,
        _ if content_type
            .as_deref()
            .is_some_and(|v| v.starts_with("multipart/form-data")) =>
        {
            return Err(Error::request_invalid(
                "multipart body must be provided as form fields to be signed",
            ));
        }
        _ if !query_params.is_empty() => Strategy::Query,
        _ => Strategy::Passthrough,
    };

    Ok(strategy)
}

/// Whether the URL contains one of the signed path fragments.
pub(crate) fn is_signed_path(uri: &Uri) -> bool {
    let uri = uri.to_string();
    SIGNED_PATHS.iter().any(|p| uri.contains(p.as_str()))
}

/// The lowercased media type of the request, without parameters.
fn content_type(headers: &HeaderMap) -> Option<String> {
    let v = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let essence = v.split(';').next().unwrap_or_default().trim();
    Some(essence.to_ascii_lowercase())
}

/// The values a signing strategy writes next to the signed parameters.
fn signed_values(sig: &Signature, cred: &Credential) -> [(&'static str, String); 3] {
    [
        (PARAM_SIGNATURE, sig.signature.clone()),
        (PARAM_TIMESTAMP, sig.timestamp.to_string()),
        (PARAM_API_KEY, cred.api_key.clone()),
    ]
}
