//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.
//! The session store port lives in the domain
//! ([`assess_domain::SessionRepository`]).

pub mod assessment_gateway;
pub mod conversation_logger;
