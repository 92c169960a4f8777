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

//! Request signer for the media-management API.

use cldsign_core::time::{now, DateTime};
use cldsign_core::{Context, Result};
use http::Request;
use log::debug;

use crate::params::params_from_query;
use crate::strategy::{self, Strategy};
use crate::{Body, CredentialResolver, SecuritySource};

/// RequestSigner authenticates outgoing requests.
///
/// For every request it resolves the caller's security, merges it with the
/// resolved credential and applies exactly one of bearer, basic, query,
/// JSON body or form-data signing.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    ctx: Context,
    resolver: CredentialResolver,
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer.
    pub fn new(ctx: Context, resolver: CredentialResolver) -> Self {
        Self {
            ctx,
            resolver,
            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Authenticate `req` and return the request to send.
    ///
    /// Requests without usable credentials are returned unchanged.
    pub async fn authenticate(
        &self,
        req: Request<Body>,
        security: &SecuritySource,
    ) -> Result<Request<Body>> {
        let security = security.resolve(&self.ctx).await?;

        let mut cred = self.resolver.resolve();
        if let Some(security) = &security {
            cred = security.merge_into(cred);
        }

        let query_params = params_from_query(req.uri());
        let strategy = strategy::classify(&req, security.as_ref(), &cred, &query_params)?;
        debug!("authenticating {} {} with {strategy:?}", req.method(), req.uri().path());

        let now = self.time.unwrap_or_else(now);
        match strategy {
            Strategy::Passthrough => Ok(req),
            Strategy::Bearer(token) => strategy::sign_bearer(req, token),
            Strategy::Basic => strategy::sign_basic(req, &cred),
            Strategy::Query => strategy::sign_query(req, query_params, &cred, now),
            Strategy::Json => strategy::sign_json(&self.ctx, req, query_params, &cred, now).await,
            Strategy::FormData => strategy::sign_form_data(req, query_params, &cred, now),
        }
    }
}
