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

//! Core components for authenticating API requests.
//!
//! This crate provides the service-neutral building blocks shared by the
//! cldsign ecosystem:
//!
//! - **Context**: a container that holds implementations for file reading and environment access
//! - **Traits**: [`FileRead`], [`Env`] and [`SigningCredential`]
//! - **Error**: a single [`Error`] type classified by [`ErrorKind`]
//!
//! ## Example
//!
//! ```
//! use cldsign_core::{Context, StaticEnv};
//!
//! let env = StaticEnv::from_iter([("CLOUDINARY_CLOUD_NAME", "demo")]);
//! let ctx = Context::new().with_env(env);
//!
//! assert_eq!(ctx.env_var("CLOUDINARY_CLOUD_NAME").as_deref(), Some("demo"));
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing and encoding utilities
//! - [`time`]: Time helpers
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, FileRead, NoopEnv, NoopFileRead, OsEnv, StaticEnv};

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::SigningCredential;
