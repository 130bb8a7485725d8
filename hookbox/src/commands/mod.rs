//! Subcommand implementations.
//!
//!   lint:   build a request, run it, print the response
//!   schema: print example requests

pub mod lint;
pub mod schema;
