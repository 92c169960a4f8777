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

use anyhow::Result;
use cldsign_cloudinary::{Body, CredentialResolver, RequestSigner, Security, SecuritySource};
use cldsign_core::{Context, OsEnv};
use cldsign_file_read_tokio::TokioFileRead;
use http::header::CONTENT_TYPE;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = Context::new().with_env(OsEnv).with_file_read(TokioFileRead);

    // Set CLOUDINARY_URL=cloudinary://<api_key>:<api_secret>@<cloud_name> before running.
    let resolver = CredentialResolver::from_env(ctx.clone())?;
    resolver.publish_cloud_name();
    let cloud_name = resolver.resolve().cloud_name;

    let signer = RequestSigner::new(ctx, resolver);

    let upload = http::Request::post(format!(
        "https://api.cloudinary.com/v1_1/{cloud_name}/image/upload"
    ))
    .header(CONTENT_TYPE, "application/json")
    .body(Body::json(&serde_json::json!({
        "public_id": "sample",
        "file": "https://res.cloudinary.com/demo/image/upload/sample.jpg",
    }))?)?;
    let upload = signer.authenticate(upload, &SecuritySource::None).await?;
    println!("signed upload: {} {:?}", upload.uri(), upload.body());

    let usage = http::Request::get(format!(
        "https://api.cloudinary.com/v1_1/{cloud_name}/usage"
    ))
    .body(Body::Empty)?;
    let token = std::env::var("CLOUDINARY_OAUTH_TOKEN").ok();
    let security = SecuritySource::from(token.map(Security::bearer));
    let usage = signer.authenticate(usage, &security).await?;
    println!(
        "usage request carries authorization: {}",
        usage.headers().contains_key(http::header::AUTHORIZATION)
    );

    Ok(())
}
