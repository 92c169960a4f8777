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

//! Authenticate requests for the Cloudinary media-management API.
//!
//! ## Example
//!
//! ```no_run
//! use cldsign_cloudinary::{Body, CredentialResolver, RequestSigner, SecuritySource};
//! use cldsign_core::{Context, OsEnv};
//! use cldsign_file_read_tokio::TokioFileRead;
//!
//! # async fn example() -> cldsign_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv).with_file_read(TokioFileRead);
//!
//! // Reads CLOUDINARY_URL and friends once.
//! let resolver = CredentialResolver::from_env(ctx.clone())?;
//! resolver.publish_cloud_name();
//!
//! let signer = RequestSigner::new(ctx, resolver);
//! let req = http::Request::post("https://api.cloudinary.com/v1_1/demo/image/upload")
//!     .header(http::header::CONTENT_TYPE, "application/json")
//!     .body(Body::json(&serde_json::json!({"public_id": "sample"}))?)?;
//!
//! let req = signer.authenticate(req, &SecuritySource::None).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod body;
pub use body::{Body, Form, FormFile, FormValue};

mod config;
pub use config::Config;

mod connection_string;

mod credential;
pub use credential::Credential;

mod resolve;
pub use resolve::CredentialResolver;

mod security;
pub use security::{
    CloudinaryAuth, ProvideSecurity, Security, SecurityFn, SecurityObject, SecuritySource,
};

mod params;
pub use params::{compute_signature, is_reserved, params_from_query, Signature};

mod strategy;

mod sign_request;
pub use sign_request::RequestSigner;

mod user_agent;
pub use user_agent::build_user_agent;
