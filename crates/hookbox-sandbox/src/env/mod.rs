//! Runtime environment lookup: project-local virtualenv → `RuntimePaths`.
//!
//! The executor receives only `RuntimePaths`; it never inspects the
//! virtualenv layout itself.

pub mod builder;
