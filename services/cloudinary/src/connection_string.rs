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

use cldsign_core::{Error, Result};
use percent_encoding::percent_decode_str;
use url::Url;

use crate::Credential;

/// Parse a connection string like `cloudinary://<api_key>:<api_secret>@<cloud_name>`.
///
/// A connection string without userinfo yields an empty key and secret.
pub(crate) fn parse(conn_str: &str) -> Result<Credential> {
    let invalid = || Error::config_invalid(format!("invalid CLOUDINARY_URL: '{conn_str}'"));

    let url = Url::parse(conn_str.trim()).map_err(|e| invalid().with_source(e))?;

    let cloud_name = url.host_str().unwrap_or_default().to_string();
    let api_key = decode(url.username()).map_err(|e| invalid().with_source(e))?;
    let api_secret =
        decode(url.password().unwrap_or_default()).map_err(|e| invalid().with_source(e))?;

    Ok(Credential {
        cloud_name,
        api_key,
        api_secret,
    })
}

fn decode(v: &str) -> std::result::Result<String, std::str::Utf8Error> {
    Ok(percent_decode_str(v).decode_utf8()?.into_owned())
}
