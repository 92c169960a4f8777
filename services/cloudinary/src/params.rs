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

//! Canonicalization of signing parameters.

use std::str::FromStr;

use cldsign_core::hash::hex_sha256;
use cldsign_core::time::DateTime;
use cldsign_core::Result;
use http::uri::PathAndQuery;
use http::Uri;
use log::debug;

use crate::constants::*;

/// Result of signing a parameter set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// Hex encoded SHA-256 digest.
    pub signature: String,
    /// Unix seconds injected into the signed parameters.
    pub timestamp: i64,
}

/// Whether `key` is transport metadata that never takes part in a signature.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_PARAMS.contains(&key)
}

/// Decoded query pairs of `uri` in their original order.
pub(crate) fn query_pairs(uri: &Uri) -> Vec<(String, String)> {
    uri.query()
        .map(|q| {
            form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default()
}

/// Collect the signable `key=value` pairs of the query string.
pub fn params_from_query(uri: &Uri) -> Vec<String> {
    query_pairs(uri)
        .into_iter()
        .filter(|(k, _)| !is_reserved(k))
        .map(|(k, v)| format!("{k}={v}"))
        .collect()
}

/// Whether the query string carries `key`.
pub(crate) fn query_has(uri: &Uri, key: &str) -> bool {
    query_pairs(uri).iter().any(|(k, _)| k == key)
}

/// Set query parameters on `uri`.
///
/// An existing key keeps its position and drops any duplicates, a missing
/// key is appended. The whole query is re-serialized.
pub(crate) fn query_set(uri: &Uri, values: &[(&str, String)]) -> Result<Uri> {
    let mut pairs = query_pairs(uri);

    for (key, value) in values {
        let key: &str = key;
        match pairs.iter().position(|(k, _)| k == key) {
            Some(idx) => {
                pairs[idx].1 = value.clone();
                let mut seen = 0;
                pairs.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => pairs.push((key.to_string(), value.clone())),
        }
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::from_str(&format!(
        "{}?{query}",
        uri.path()
    ))?);

    Ok(Uri::from_parts(parts)?)
}

/// Sign `params` with `api_secret` at `now`.
///
/// `timestamp=<unix seconds>` is added as a regular parameter, the full
/// `key=value` strings are sorted ascending, joined by `&`, suffixed with the
/// secret and hashed with SHA-256.
pub fn compute_signature(mut params: Vec<String>, api_secret: &str, now: DateTime) -> Signature {
    let timestamp = now.timestamp();
    params.push(format!("{PARAM_TIMESTAMP}={timestamp}"));
    params.sort();

    let mut string_to_sign = params.join("&");
    debug!(
        "string to sign: {string_to_sign} (+ secret, {} params)",
        params.len()
    );
    string_to_sign.push_str(api_secret);

    Signature {
        signature: hex_sha256(string_to_sign.as_bytes()),
        timestamp,
    }
}
