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

use cldsign_core::hash::base64_encode;
use cldsign_core::Result;
use http::header::AUTHORIZATION;
use http::{HeaderValue, Request};

use crate::{Body, Credential};

/// Set `Authorization: Bearer <token>`.
pub(crate) fn sign_bearer(req: Request<Body>, token: &str) -> Result<Request<Body>> {
    with_authorization(req, format!("Bearer {token}"))
}

/// Set `Authorization: Basic base64(<api_key>:<api_secret>)`.
pub(crate) fn sign_basic(req: Request<Body>, cred: &Credential) -> Result<Request<Body>> {
    let encoded = base64_encode(format!("{}:{}", cred.api_key, cred.api_secret).as_bytes());
    with_authorization(req, format!("Basic {encoded}"))
}

fn with_authorization(req: Request<Body>, value: String) -> Result<Request<Body>> {
    let (mut parts, body) = req.into_parts();
    parts.headers.insert(AUTHORIZATION, {
        let mut value: HeaderValue = value.parse()?;
        value.set_sensitive(true);

        value
    });

    Ok(Request::from_parts(parts, body))
}
