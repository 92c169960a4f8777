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

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use cldsign_cloudinary::{
    Body, CloudinaryAuth, Config, ProvideSecurity, Security, SecurityObject, SecuritySource,
};
use cldsign_core::{Context, Error, ErrorKind};
use http::header::AUTHORIZATION;
use http::Request;

use super::init_signer;

#[derive(Debug)]
struct CountingProvider {
    security: Option<Security>,
    fail: bool,
    call_count: Arc<Mutex<usize>>,
}

#[async_trait]
impl ProvideSecurity for CountingProvider {
    async fn provide_security(&self, _ctx: &Context) -> cldsign_core::Result<Option<Security>> {
        *self.call_count.lock().unwrap() += 1;

        if self.fail {
            return Err(Error::unexpected("token endpoint unreachable"));
        }
        Ok(self.security.clone())
    }
}

fn ping() -> Request<Body> {
    Request::get("https://api.cloudinary.com/v1_1/demo/ping")
        .body(Body::Empty)
        .unwrap()
}

#[tokio::test]
async fn test_provider_is_resolved_once_per_request() -> Result<()> {
    let signer = init_signer(&[], Config::new());
    let count = Arc::new(Mutex::new(0));
    let source = SecuritySource::provider(CountingProvider {
        security: Some(Security::bearer("fresh")),
        fail: false,
        call_count: count.clone(),
    });

    let req = signer.authenticate(ping(), &source).await?;
    assert_eq!(req.headers()[AUTHORIZATION], "Bearer fresh");
    assert_eq!(*count.lock().unwrap(), 1);

    signer.authenticate(ping(), &source).await?;
    assert_eq!(*count.lock().unwrap(), 2);
    Ok(())
}

#[tokio::test]
async fn test_provider_failure_is_propagated() -> Result<()> {
    let signer = init_signer(&[("CLOUDINARY_URL", "cloudinary://111:s@demo")], Config::new());
    let source = SecuritySource::provider(CountingProvider {
        security: None,
        fail: true,
        call_count: Arc::new(Mutex::new(0)),
    });

    let err = signer.authenticate(ping(), &source).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SecurityResolution);
    Ok(())
}

#[tokio::test]
async fn test_provider_without_security_uses_resolved_credential() -> Result<()> {
    let signer = init_signer(&[], Config::new().with_url("cloudinary://111:s@demo"));
    let source = SecuritySource::from_fn(|| async { Ok::<Option<Security>, Error>(None) });

    let req = signer.authenticate(ping(), &source).await?;
    assert_eq!(req.headers()[AUTHORIZATION], "Basic MTExOnM=");
    Ok(())
}

#[tokio::test]
async fn test_aliased_security_from_json() -> Result<()> {
    let signer = init_signer(&[], Config::new().with_cloud_name("demo"));

    let object: SecurityObject = serde_json::from_value(serde_json::json!({
        "cloudinaryAuth": {"api_key": "222", "apiSecret": "s"}
    }))?;
    let security = object.classify();
    assert_eq!(
        security,
        Some(Security::Aliased(CloudinaryAuth {
            api_key_snake: Some("222".to_string()),
            api_secret: Some("s".to_string()),
            ..Default::default()
        }))
    );

    let req = signer.authenticate(ping(), &security.into()).await?;
    // base64("222:s")
    assert_eq!(req.headers()[AUTHORIZATION], "Basic MjIyOnM=");
    Ok(())
}
