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

use cldsign_core::time::DateTime;
use cldsign_core::Result;
use http::Request;
use log::debug;

use super::signed_values;
use crate::constants::*;
use crate::params::{compute_signature, query_has, query_set};
use crate::{Body, Credential};

/// Sign the query parameters and write `signature`, `timestamp` and
/// `api_key` back into the query string.
///
/// Method, headers and body are carried over unchanged. A request whose
/// query already has a `signature` is returned as is.
pub(crate) fn sign(
    req: Request<Body>,
    params: Vec<String>,
    cred: &Credential,
    now: DateTime,
) -> Result<Request<Body>> {
    if query_has(req.uri(), PARAM_SIGNATURE) {
        debug!("query already signed, skipping");
        return Ok(req);
    }

    let sig = compute_signature(params, &cred.api_secret, now);

    let (mut parts, body) = req.into_parts();
    parts.uri = query_set(&parts.uri, &signed_values(&sig, cred))?;

    Ok(Request::from_parts(parts, body))
}
