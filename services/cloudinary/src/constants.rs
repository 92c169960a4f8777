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

//! Environment variable names used by the resolver.

/// Connection string: `cloudinary://<api_key>:<api_secret>@<cloud_name>`.
pub const CLOUDINARY_URL: &str = "CLOUDINARY_URL";
pub const CLOUDINARY_CLOUD_NAME: &str = "CLOUDINARY_CLOUD_NAME";
pub const CLOUDINARY_API_KEY: &str = "CLOUDINARY_API_KEY";
pub const CLOUDINARY_API_SECRET: &str = "CLOUDINARY_API_SECRET";
/// Present when running behind the hosted OAuth wrapper.
pub const OAUTH_WRAPPER_ORIGIN: &str = "OAUTH_WRAPPER_ORIGIN";

// Parameters never included in a signature.
pub const PARAM_FILE: &str = "file";
pub const PARAM_CLOUD_NAME: &str = "cloud_name";
pub const PARAM_RESOURCE_TYPE: &str = "resource_type";
pub const PARAM_API_KEY: &str = "api_key";
pub const PARAM_SIGNATURE: &str = "signature";
pub const PARAM_TIMESTAMP: &str = "timestamp";

pub const RESERVED_PARAMS: [&str; 6] = [
    PARAM_FILE,
    PARAM_CLOUD_NAME,
    PARAM_RESOURCE_TYPE,
    PARAM_API_KEY,
    PARAM_SIGNATURE,
    PARAM_TIMESTAMP,
];

/// Form fields never included in a signature. A caller-supplied
/// `timestamp` field is signed as is.
pub const FORM_RESERVED_PARAMS: [&str; 5] = [
    PARAM_FILE,
    PARAM_CLOUD_NAME,
    PARAM_RESOURCE_TYPE,
    PARAM_API_KEY,
    PARAM_SIGNATURE,
];

pub const RESOURCE_TYPES: [&str; 5] = ["image", "video", "raw", "auto", "asset"];

pub const SIGNED_ACTIONS: [&str; 16] = [
    "explicit",
    "upload",
    "download",
    "destroy",
    "sprite",
    "tags",
    "context",
    "metadata_update",
    "text",
    "multi",
    "explode",
    "rename",
    "create_slideshow",
    "create_video",
    "create_collage",
    "generate_archive",
];

pub const FILE_URL_PREFIX: &str = "file://";
pub const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";
