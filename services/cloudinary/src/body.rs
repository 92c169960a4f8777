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

use bytes::Bytes;
use cldsign_core::Result;

/// Body of a request handed to the signer.
///
/// A request has exactly one body shape. JSON bodies travel as
/// [`Body::Bytes`] with `Content-Type: application/json`; multipart bodies
/// travel as structured [`Form`] fields and are encoded by the transport.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// Raw bytes, e.g. a serialized JSON object.
    Bytes(Bytes),
    /// Multipart form fields.
    Form(Form),
}

impl Body {
    /// Serialize `value` as a JSON body.
    pub fn json(value: &serde_json::Value) -> Result<Self> {
        Ok(Body::Bytes(Bytes::from(serde_json::to_vec(value)?)))
    }

    /// Whether the body carries nothing.
    ///
    /// Empty bytes count as no body.
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Bytes(bs) => bs.is_empty(),
            Body::Form(_) => false,
        }
    }
}

impl From<Bytes> for Body {
    fn from(bs: Bytes) -> Self {
        Body::Bytes(bs)
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Bytes(Bytes::from(s))
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Body::Bytes(Bytes::from_static(s.as_bytes()))
    }
}

impl From<Vec<u8>> for Body {
    fn from(bs: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(bs))
    }
}

impl From<Form> for Body {
    fn from(form: Form) -> Self {
        Body::Form(form)
    }
}

/// Ordered multipart form fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Form {
    fields: Vec<(String, FormValue)>,
}

impl Form {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .push((name.into(), FormValue::Text(value.into())));
        self
    }

    /// Append a file field.
    pub fn file(mut self, name: impl Into<String>, file: FormFile) -> Self {
        self.fields.push((name.into(), FormValue::File(file)));
        self
    }

    /// Get the first value of the field `name`.
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Iterate over all fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Value of a multipart form field.
#[derive(Clone, Debug, PartialEq)]
pub enum FormValue {
    /// Plain text value.
    Text(String),
    /// File payload.
    File(FormFile),
}

impl FormValue {
    /// The text of this value, `None` for file payloads.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(v) => Some(v.as_str()),
            FormValue::File(_) => None,
        }
    }
}

/// A file payload inside a multipart form.
#[derive(Clone, Debug, PartialEq)]
pub struct FormFile {
    /// File name reported to the server.
    pub filename: Option<String>,
    /// Content type of the payload.
    pub content_type: Option<String>,
    /// Raw content.
    pub data: Bytes,
}

impl FormFile {
    /// Create a file payload from raw bytes.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            filename: None,
            content_type: None,
            data: data.into(),
        }
    }

    /// Set the file name.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}
