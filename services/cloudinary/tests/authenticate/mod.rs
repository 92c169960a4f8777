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

use std::io::Write;

use anyhow::Result;
use cldsign_cloudinary::{Body, Config, Form, FormFile, Security, SecuritySource};
use cldsign_core::hash::hex_sha256;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Request;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use super::init_signer;

const URL: &str = "cloudinary://111:s@demo";
const API: &str = "https://api.cloudinary.com/v1_1/demo";

fn json_body(req: &Request<Body>) -> Value {
    match req.body() {
        Body::Bytes(bs) => serde_json::from_slice(bs).expect("body must be json"),
        other => panic!("unexpected body: {other:?}"),
    }
}

#[tokio::test]
async fn test_json_upload_end_to_end() -> Result<()> {
    let signer = init_signer(&[("CLOUDINARY_URL", URL)], Config::new());

    let req = Request::post(format!("{API}/image/upload"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::json(&json!({"public_id": "a"}))?)?;
    let req = signer.authenticate(req, &SecuritySource::None).await?;

    // sha256("public_id=a&timestamp=1000000000" + "s")
    assert_eq!(
        json_body(&req),
        json!({
            "public_id": "a",
            "signature": "215bb6842e41aec06b6ead7361dfa558d4d1ad297cdcd59bc3f1df966dfde2e5",
            "timestamp": 1_000_000_000,
            "api_key": "111",
        })
    );
    assert!(req.headers().get(AUTHORIZATION).is_none());
    Ok(())
}

#[tokio::test]
async fn test_bearer_wins_over_credentials() -> Result<()> {
    let signer = init_signer(&[("CLOUDINARY_URL", URL)], Config::new());

    let req = Request::post(format!("{API}/image/upload?public_id=a"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::json(&json!({"public_id": "a"}))?)?;
    let security = SecuritySource::from(Security::bearer("token"));
    let req = signer.authenticate(req, &security).await?;

    assert_eq!(req.headers()[AUTHORIZATION], "Bearer token");
    assert_eq!(req.uri().query(), Some("public_id=a"));
    assert_eq!(json_body(&req), json!({"public_id": "a"}));
    Ok(())
}

#[tokio::test]
async fn test_bearer_without_any_credentials() -> Result<()> {
    let signer = init_signer(&[], Config::new());

    let req = Request::get(format!("{API}/usage")).body(Body::Empty)?;
    let req = signer
        .authenticate(req, &Security::bearer("token").into())
        .await?;

    assert_eq!(req.headers()[AUTHORIZATION], "Bearer token");
    Ok(())
}

#[tokio::test]
async fn test_empty_bearer_falls_through_to_basic() -> Result<()> {
    let signer = init_signer(&[("CLOUDINARY_URL", URL)], Config::new());

    let req = Request::get(format!("{API}/ping")).body(Body::Empty)?;
    let req = signer
        .authenticate(req, &Security::bearer("").into())
        .await?;

    // base64("111:s")
    assert_eq!(req.headers()[AUTHORIZATION], "Basic MTExOnM=");
    Ok(())
}

#[tokio::test]
async fn test_unsigned_paths_use_basic_auth() -> Result<()> {
    let signer = init_signer(&[("CLOUDINARY_URL", URL)], Config::new());

    for path in ["ping", "usage", "resources/image"] {
        let uri = format!("{API}/{path}?max_results=10");
        let req = Request::get(&uri).body(Body::Empty)?;
        let req = signer.authenticate(req, &SecuritySource::None).await?;

        assert_eq!(req.headers()[AUTHORIZATION], "Basic MTExOnM=", "path: {path}");
        assert_eq!(req.uri().to_string(), uri, "path: {path}");
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_credentials_pass_through() -> Result<()> {
    let signer = init_signer(&[("CLOUDINARY_URL", "cloudinary://demo")], Config::new());

    let uri = format!("{API}/video/upload?public_id=a");
    let req = Request::post(&uri).body(Body::Empty)?;
    let req = signer.authenticate(req, &SecuritySource::None).await?;

    assert_eq!(req.uri().to_string(), uri);
    assert!(req.headers().get(AUTHORIZATION).is_none());
    Ok(())
}

#[tokio::test]
async fn test_security_credentials_enable_signing() -> Result<()> {
    let signer = init_signer(&[("CLOUDINARY_URL", "cloudinary://demo")], Config::new());

    let req = Request::post(format!("{API}/video/upload?public_id=a")).body(Body::Empty)?;
    let security = SecuritySource::from(Security::credentials("222", "s"));
    let req = signer.authenticate(req, &security).await?;

    let expected = hex_sha256(b"public_id=a&timestamp=1000000000s");
    assert_eq!(
        req.uri().query(),
        Some(format!("public_id=a&signature={expected}&timestamp=1000000000&api_key=222").as_str())
    );
    Ok(())
}

#[tokio::test]
async fn test_query_signing_is_idempotent() -> Result<()> {
    let signer = init_signer(&[("CLOUDINARY_URL", URL)], Config::new());

    let req = Request::post(format!("{API}/video/upload?public_id=a")).body(Body::Empty)?;
    let once = signer.authenticate(req, &SecuritySource::None).await?;
    let signed_uri = once.uri().to_string();

    let twice = signer.authenticate(once, &SecuritySource::None).await?;
    assert_eq!(twice.uri().to_string(), signed_uri);
    Ok(())
}

#[tokio::test]
async fn test_json_signing_is_idempotent() -> Result<()> {
    let signer = init_signer(&[("CLOUDINARY_URL", URL)], Config::new());

    let req = Request::post(format!("{API}/image/upload"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::json(&json!({"public_id": "a"}))?)?;
    let once = signer.authenticate(req, &SecuritySource::None).await?;
    let signed = json_body(&once);

    let twice = signer.authenticate(once, &SecuritySource::None).await?;
    assert_eq!(json_body(&twice), signed);
    Ok(())
}

#[tokio::test]
async fn test_json_upload_inlines_local_file() -> Result<()> {
    let signer = init_signer(&[("CLOUDINARY_URL", URL)], Config::new());

    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(&[0, 1, 2])?;

    let req = Request::post(format!("{API}/raw/upload"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::json(
            &json!({"file": format!("file://{}", file.path().display())}),
        )?)?;
    let req = signer.authenticate(req, &SecuritySource::None).await?;

    let body = json_body(&req);
    assert_eq!(body["file"], json!("data:application/octet-stream;base64,AAEC"));
    assert_eq!(
        body["signature"],
        json!(hex_sha256(b"timestamp=1000000000s"))
    );
    Ok(())
}

#[tokio::test]
async fn test_json_upload_missing_file_is_fatal() -> Result<()> {
    let signer = init_signer(&[("CLOUDINARY_URL", URL)], Config::new());

    let req = Request::post(format!("{API}/raw/upload"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::json(&json!({"file": "file:///definitely/not/here.bin"}))?)?;
    let err = signer
        .authenticate(req, &SecuritySource::None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), cldsign_core::ErrorKind::FileRead);
    Ok(())
}

#[tokio::test]
async fn test_form_data_upload() -> Result<()> {
    let signer = init_signer(&[("CLOUDINARY_URL", URL)], Config::new());

    let form = Form::new()
        .file("file", FormFile::new(vec![0u8, 1, 2]).with_filename("x.bin"))
        .text("public_id", "a");
    let req = Request::post(format!("{API}/auto/upload"))
        .header(CONTENT_TYPE, "multipart/form-data; boundary=xyz")
        .header(AUTHORIZATION, "Basic stale")
        .body(Body::Form(form.clone()))?;
    let req = signer.authenticate(req, &SecuritySource::None).await?;

    let expected = hex_sha256(b"public_id=a&timestamp=1000000000s");
    assert_eq!(
        req.uri().query(),
        Some(format!("signature={expected}&timestamp=1000000000&api_key=111").as_str())
    );
    assert_eq!(req.body(), &Body::Form(form));
    assert!(req.headers().get(AUTHORIZATION).is_none());
    Ok(())
}

#[tokio::test]
async fn test_other_content_type_signs_query() -> Result<()> {
    let signer = init_signer(&[("CLOUDINARY_URL", URL)], Config::new());

    let req = Request::post(format!("{API}/image/explicit?public_id=a"))
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from("hello"))?;
    let req = signer.authenticate(req, &SecuritySource::None).await?;

    let expected = hex_sha256(b"public_id=a&timestamp=1000000000s");
    assert_eq!(
        req.uri().query(),
        Some(format!("public_id=a&signature={expected}&timestamp=1000000000&api_key=111").as_str())
    );
    assert_eq!(req.body(), &Body::from("hello"));
    Ok(())
}

#[tokio::test]
async fn test_other_content_type_without_params_is_untouched() -> Result<()> {
    let signer = init_signer(&[("CLOUDINARY_URL", URL)], Config::new());

    let uri = format!("{API}/image/explicit?cloud_name=demo");
    let req = Request::post(&uri)
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from("hello"))?;
    let req = signer.authenticate(req, &SecuritySource::None).await?;

    assert_eq!(req.uri().to_string(), uri);
    assert!(req.headers().get(AUTHORIZATION).is_none());
    Ok(())
}

#[tokio::test]
async fn test_discrete_override_beats_connection_string() -> Result<()> {
    let signer = init_signer(
        &[("CLOUDINARY_URL", URL), ("CLOUDINARY_API_KEY", "222")],
        Config::new(),
    );

    let req = Request::get(format!("{API}/ping")).body(Body::Empty)?;
    let req = signer.authenticate(req, &SecuritySource::None).await?;

    // base64("222:s")
    assert_eq!(req.headers()[AUTHORIZATION], "Basic MjIyOnM=");
    Ok(())
}
