//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level validation errors
//! - [`string::preview`]: UTF-8 safe shortening for log previews

pub mod error;
pub mod string;
