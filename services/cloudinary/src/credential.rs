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

use cldsign_core::{utils::Redact, SigningCredential};

/// Credential that used to authenticate requests.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    /// Cloud name of the account.
    pub cloud_name: String,
    /// API key of the account.
    pub api_key: String,
    /// API secret of the account.
    pub api_secret: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Replace the cloud name unless `cloud_name` is empty.
    pub fn with_cloud_name(mut self, cloud_name: &str) -> Self {
        if !cloud_name.is_empty() {
            self.cloud_name = cloud_name.to_string();
        }
        self
    }

    /// Replace the api key unless `api_key` is empty.
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        if !api_key.is_empty() {
            self.api_key = api_key.to_string();
        }
        self
    }

    /// Replace the api secret unless `api_secret` is empty.
    pub fn with_api_secret(mut self, api_secret: &str) -> Self {
        if !api_secret.is_empty() {
            self.api_secret = api_secret.to_string();
        }
        self
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &Redact::from(&self.api_key))
            .field("api_secret", &Redact::from(&self.api_secret))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}
