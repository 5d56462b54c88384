//! Criteria catalog domain.
//!
//! - [`dimension::Dimension`] / [`dimension::Tier`]: grouping of criteria
//! - [`entities::Criterion`]: one evaluable statement of the grid
//! - [`grid::Catalog`]: ordered, validated, dimension-indexed catalog

pub mod dimension;
pub mod entities;
pub mod grid;
