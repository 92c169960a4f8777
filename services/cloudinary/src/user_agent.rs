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

//! User agent reported by SDKs built on top of this crate.

use cldsign_core::Context;

use crate::constants::*;

const GENERATOR_PREFIX: &str = "speakeasy-sdk/";
const PACKAGE_SCOPE: &str = "@cloudinary/";

/// Rewrite a generated SDK user agent into the product user agent.
///
/// `metadata` is expected as
/// `speakeasy-sdk/<lang> <sdk_version> <gen_version> <schema_version> <package>`,
/// the result looks like
/// `Cloudinary/<Product> <runtime>/<sdk_version> Gen/<gen_version> Schema/<schema_version> (<system>)`.
///
/// Returns `None` if `metadata` does not have that shape, in which case the
/// caller keeps its original user agent.
pub fn build_user_agent(ctx: &Context, metadata: &str, runtime: &str) -> Option<String> {
    if !metadata.starts_with(GENERATOR_PREFIX) {
        return None;
    }

    let parts: Vec<&str> = metadata.split(' ').collect();
    let [_, sdk_version, gen_version, schema_version, package, ..] = parts.as_slice() else {
        return None;
    };
    if [sdk_version, gen_version, schema_version, package]
        .iter()
        .any(|v| v.is_empty())
    {
        return None;
    }

    let product = product_name(package);
    let remote = if ctx.env_var(OAUTH_WRAPPER_ORIGIN).is_some() {
        "; RemoteMCP"
    } else {
        ""
    };

    Some(format!(
        "Cloudinary/{product} {runtime}/{sdk_version} Gen/{gen_version} Schema/{schema_version} (Rust; {} {}{remote})",
        std::env::consts::OS,
        std::env::consts::ARCH,
    ))
}

/// `@cloudinary/asset-management-mcp` => `AssetManagementMcp`.
fn product_name(package: &str) -> String {
    let Some((_, name)) = package.split_once(PACKAGE_SCOPE) else {
        return "Unknown".to_string();
    };
    if name.is_empty() {
        return "Unknown".to_string();
    }

    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}
