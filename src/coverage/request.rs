//! Query-boundary validation for coverage requests.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Number of dealers returned when the request does not set `limit`.
pub const DEFAULT_LIMIT: u32 = 3;

/// Kind of a rejected request parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterErrorKind {
    MissingRequiredParameter,
    InvalidParameter,
}

/// One problem with the request parameters, reported back to the caller
/// as part of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterError {
    pub exception: ParameterErrorKind,
    pub field: String,
    pub message: String,
}

impl ParameterError {
    fn missing(field: &str) -> Self {
        ParameterError {
            exception: ParameterErrorKind::MissingRequiredParameter,
            field: field.to_string(),
            message: format!("missing required parameter `{field}`"),
        }
    }

    fn invalid(field: &str, message: String) -> Self {
        ParameterError {
            exception: ParameterErrorKind::InvalidParameter,
            field: field.to_string(),
            message,
        }
    }
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.exception, self.message)
    }
}

/// A validated coverage request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageQuery {
    pub tier_slug: String,
    pub make_slug: String,
    pub zipcode: String,
    pub limit: u32,
}

impl CoverageQuery {
    pub fn new(tier_slug: impl Into<String>, make_slug: impl Into<String>, zipcode: impl Into<String>) -> Self {
        CoverageQuery {
            tier_slug: tier_slug.into(),
            make_slug: make_slug.into(),
            zipcode: zipcode.into(),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Build a query from the tier and make identifiers plus the
    /// query-string parameters. Every problem found is reported, not just
    /// the first one.
    pub fn from_params(
        tier_slug: &str,
        make_slug: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<Self, Vec<ParameterError>> {
        let mut errors = Vec::new();

        if tier_slug.trim().is_empty() {
            errors.push(ParameterError::missing("buyer_tier"));
        }
        if make_slug.trim().is_empty() {
            errors.push(ParameterError::missing("make"));
        }

        let zipcode = match params.get("zipcode").map(|z| z.trim()) {
            Some(zipcode) if !zipcode.is_empty() => zipcode.to_string(),
            _ => {
                errors.push(ParameterError::missing("zipcode"));
                String::new()
            }
        };

        let limit = match params.get("limit") {
            None => DEFAULT_LIMIT,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(0) => {
                    errors.push(ParameterError::invalid("limit", "`limit` must be at least 1".to_string()));
                    DEFAULT_LIMIT
                }
                Ok(limit) => limit,
                Err(_) => {
                    errors.push(ParameterError::invalid(
                        "limit",
                        format!("`{raw}` is not a valid integer"),
                    ));
                    DEFAULT_LIMIT
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CoverageQuery {
            tier_slug: tier_slug.to_string(),
            make_slug: make_slug.to_string(),
            zipcode,
            limit,
        })
    }
}
