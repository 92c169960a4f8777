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

use cldsign_core::{utils::Redact, Context};

use crate::constants::*;

/// Config carries all the configuration for the credential resolver.
#[derive(Clone, Default)]
pub struct Config {
    /// `url` is the connection string, it will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`CLOUDINARY_URL`]
    pub url: Option<String>,
    /// `cloud_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`CLOUDINARY_CLOUD_NAME`]
    pub cloud_name: Option<String>,
    /// `api_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`CLOUDINARY_API_KEY`]
    pub api_key: Option<String>,
    /// `api_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`CLOUDINARY_API_SECRET`]
    pub api_secret: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection string
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set cloud_name
    pub fn with_cloud_name(mut self, cloud_name: impl Into<String>) -> Self {
        self.cloud_name = Some(cloud_name.into());
        self
    }

    /// Set api_key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set api_secret
    pub fn with_api_secret(mut self, api_secret: impl Into<String>) -> Self {
        self.api_secret = Some(api_secret.into());
        self
    }

    /// Load config from env, keeping every field that is already set.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(CLOUDINARY_URL) {
            self.url.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(CLOUDINARY_CLOUD_NAME) {
            self.cloud_name.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(CLOUDINARY_API_KEY) {
            self.api_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(CLOUDINARY_API_SECRET) {
            self.api_secret.get_or_insert(v);
        }

        self
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key.as_ref().map(Redact::from))
            .field("api_secret", &self.api_secret.as_ref().map(Redact::from))
            .finish()
    }
}
