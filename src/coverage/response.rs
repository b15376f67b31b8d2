//! Transport envelope around coverage results.

use super::request::ParameterError;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub params: BTreeMap<String, String>,
}

/// `{status: "ok", data, metadata}` or `{status: "error", errors, metadata}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResponseEnvelope<T> {
    Ok { data: T, metadata: Metadata },
    Error { errors: Vec<ParameterError>, metadata: Metadata },
}

impl<T> ResponseEnvelope<T> {
    pub fn ok(data: T, params: BTreeMap<String, String>) -> Self {
        ResponseEnvelope::Ok { data, metadata: Metadata { params } }
    }

    pub fn error(errors: Vec<ParameterError>, params: BTreeMap<String, String>) -> Self {
        ResponseEnvelope::Error { errors, metadata: Metadata { params } }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ResponseEnvelope::Ok { .. })
    }
}
