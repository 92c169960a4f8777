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

use bytes::Bytes;
use cldsign_core::hash::base64_encode;
use cldsign_core::time::DateTime;
use cldsign_core::{Context, Error, ErrorKind, Result};
use http::header::{AUTHORIZATION, CONTENT_LENGTH};
use http::Request;
use log::debug;
use serde_json::{Map, Value};

use super::signed_values;
use crate::constants::*;
use crate::params::{compute_signature, is_reserved};
use crate::{Body, Credential};

/// Sign the JSON body together with `query_params` and write `signature`,
/// `timestamp` and `api_key` into the body.
///
/// A `file` field holding a `file://` URL is inlined as a base64 data URI
/// before signing. A body that already has a `signature` is returned as is.
pub(crate) async fn sign(
    ctx: &Context,
    req: Request<Body>,
    query_params: Vec<String>,
    cred: &Credential,
    now: DateTime,
) -> Result<Request<Body>> {
    let mut object = match req.body() {
        Body::Bytes(bs) => parse_object(bs)?,
        _ => return Err(Error::request_invalid("json body must be provided as bytes")),
    };

    if object.get(PARAM_SIGNATURE).is_some_and(is_truthy) {
        debug!("json body already signed, skipping");
        return Ok(req);
    }

    inline_file(ctx, &mut object).await?;

    let mut params = params_from_object(&object);
    params.extend(query_params);
    let sig = compute_signature(params, &cred.api_secret, now);

    for (k, v) in signed_values(&sig, cred) {
        let v = if k == PARAM_TIMESTAMP {
            Value::from(sig.timestamp)
        } else {
            Value::String(v)
        };
        object.insert(k.to_string(), v);
    }

    let (mut parts, _) = req.into_parts();
    parts.headers.remove(AUTHORIZATION);
    parts.headers.remove(CONTENT_LENGTH);
    let body = Body::Bytes(Bytes::from(serde_json::to_vec(&object)?));

    Ok(Request::from_parts(parts, body))
}

fn parse_object(bs: &Bytes) -> Result<Map<String, Value>> {
    match serde_json::from_slice(bs)? {
        Value::Object(object) => Ok(object),
        _ => Err(Error::request_invalid("json body must be an object")),
    }
}

/// Replace a `file://` reference in the `file` field with a data URI.
async fn inline_file(ctx: &Context, object: &mut Map<String, Value>) -> Result<()> {
    let path = match object.get(PARAM_FILE) {
        Some(Value::String(v)) => match v.strip_prefix(FILE_URL_PREFIX) {
            Some(path) => path.to_string(),
            None => return Ok(()),
        },
        _ => return Ok(()),
    };

    let content = ctx.file_read(&path).await.map_err(|err| {
        if err.kind() == ErrorKind::FileRead {
            err
        } else {
            Error::file_read(format!("failed to read file: {path}")).with_source(err)
        }
    })?;
    debug!("inlined {} bytes from {path}", content.len());

    object.insert(
        PARAM_FILE.to_string(),
        Value::String(format!("{DATA_URI_PREFIX}{}", base64_encode(&content))),
    );
    Ok(())
}

fn params_from_object(object: &Map<String, Value>) -> Vec<String> {
    object
        .iter()
        .filter(|(k, _)| !is_reserved(k))
        .map(|(k, v)| format!("{k}={}", param_value(v)))
        .collect()
}

/// Render a JSON value the way it appears in a signed parameter.
///
/// Arrays are joined by `,`, nested objects are rendered as compact JSON.
/// Integral floats drop their fraction, so `1.0` signs as `1`.
fn param_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 => {
                if f == 0.0 {
                    "0".to_string()
                } else {
                    format!("{f}")
                }
            }
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                item => param_value(item),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Null | Value::Bool(_) | Value::Object(_) => v.to_string(),
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
