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

use cldsign_core::{Context, Result};
use log::debug;

use crate::connection_string;
use crate::constants::*;
use crate::{Config, Credential};

/// CredentialResolver resolves the effective cloud name, api key and api
/// secret from layered sources.
///
/// Precedence, from lowest to highest:
///
/// 1. empty defaults
/// 2. the connection string ([`Config::url`] / `CLOUDINARY_URL`)
/// 3. discrete values ([`Config::cloud_name`], [`Config::api_key`], [`Config::api_secret`]
///    or their env counterparts), applied field by field
///
/// Sources are read once in [`CredentialResolver::new`]; later env changes
/// are not observed.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    ctx: Context,
    credential: Credential,
    explicit_cloud_name: bool,
}

impl CredentialResolver {
    /// Build a resolver from the given config, filling missing values from env.
    ///
    /// Returns a `ConfigInvalid` error if a connection string is present but malformed.
    pub fn new(ctx: Context, config: Config) -> Result<Self> {
        let explicit_cloud_name = config.cloud_name.as_deref().is_some_and(|v| !v.is_empty());
        let config = config.from_env(&ctx);
        let credential = resolve_config(&config)?;
        debug!("cloudinary credential resolved: {credential:?}");

        Ok(Self {
            ctx,
            credential,
            explicit_cloud_name,
        })
    }

    /// Build a resolver purely from the environment.
    pub fn from_env(ctx: Context) -> Result<Self> {
        Self::new(ctx, Config::default())
    }

    /// Return the resolved credential.
    pub fn resolve(&self) -> Credential {
        self.credential.clone()
    }

    /// Publish the resolved cloud name as [`CLOUDINARY_CLOUD_NAME`] so that
    /// SDK initialization reading that variable can find it.
    ///
    /// Writes only when a cloud name was resolved, the caller did not pass
    /// one explicitly and the variable is unset or empty. Returns whether a
    /// write happened; calling it again is a no-op.
    pub fn publish_cloud_name(&self) -> bool {
        if self.explicit_cloud_name || self.credential.cloud_name.is_empty() {
            return false;
        }
        if self
            .ctx
            .env_var(CLOUDINARY_CLOUD_NAME)
            .is_some_and(|v| !v.is_empty())
        {
            return false;
        }

        debug!(
            "publishing {CLOUDINARY_CLOUD_NAME}={}",
            self.credential.cloud_name
        );
        self.ctx
            .set_env_var(CLOUDINARY_CLOUD_NAME, &self.credential.cloud_name);
        true
    }
}

fn resolve_config(config: &Config) -> Result<Credential> {
    let mut credential = match config.url.as_deref().filter(|v| !v.is_empty()) {
        Some(url) => connection_string::parse(url)?,
        None => Credential::default(),
    };

    if let Some(v) = &config.cloud_name {
        credential = credential.with_cloud_name(v);
    }
    if let Some(v) = &config.api_key {
        credential = credential.with_api_key(v);
    }
    if let Some(v) = &config.api_secret {
        credential = credential.with_api_secret(v);
    }

    Ok(credential)
}
