//! Coverage queries
//!
//! Given a buyer tier, a make and a zipcode, find the buyer's dealers that
//! cover the zipcode, closest first.

pub mod request;
pub mod resolver;
pub mod response;

pub use request::{CoverageQuery, ParameterError, ParameterErrorKind, DEFAULT_LIMIT};
pub use resolver::{CoverageResolver, CoverageResult, CoverageRow};
pub use response::{Metadata, ResponseEnvelope};
