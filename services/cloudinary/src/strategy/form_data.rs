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
use cldsign_core::{Error, Result};
use http::header::AUTHORIZATION;
use http::Request;
use log::debug;

use super::signed_values;
use crate::constants::*;
use crate::params::{compute_signature, query_has, query_set};
use crate::{Body, Credential, Form, FormValue};

/// Sign the form fields together with `query_params` and write
/// `signature`, `timestamp` and `api_key` into the query string.
///
/// The form itself is left untouched and any `Authorization` header is
/// dropped. A request with a `signature` in its form or query is returned
/// as is.
pub(crate) fn sign(
    req: Request<Body>,
    query_params: Vec<String>,
    cred: &Credential,
    now: DateTime,
) -> Result<Request<Body>> {
    let Body::Form(form) = req.body() else {
        return Err(Error::request_invalid(
            "form-data signing requires a form body",
        ));
    };

    let signed_form = form
        .get(PARAM_SIGNATURE)
        .and_then(FormValue::as_text)
        .is_some_and(|v| !v.is_empty());
    if signed_form || query_has(req.uri(), PARAM_SIGNATURE) {
        debug!("form-data request already signed, skipping");
        return Ok(req);
    }

    let mut params = params_from_form(form);
    params.extend(query_params);
    let sig = compute_signature(params, &cred.api_secret, now);

    let (mut parts, body) = req.into_parts();
    parts.uri = query_set(&parts.uri, &signed_values(&sig, cred))?;
    parts.headers.remove(AUTHORIZATION);

    Ok(Request::from_parts(parts, body))
}

/// Text fields outside the form reserved set; file payloads never take part.
fn params_from_form(form: &Form) -> Vec<String> {
    form.iter()
        .filter(|(k, _)| !FORM_RESERVED_PARAMS.contains(k))
        .filter_map(|(k, v)| v.as_text().map(|v| format!("{k}={v}")))
        .collect()
}
