//! Progress indicators for gateway round-trips

pub mod reporter;
