//! # Topological Planner
//!
//! Produces a deterministic initialization order (and its reverse for
//! shutdown) that respects both declared dependencies and the fixed category
//! precedence Infrastructure < DataSource < Core < Web. Detects missing
//! dependencies, cycles, and declared dependencies that contradict category
//! precedence.

pub mod error;
pub mod order;

pub use error::PlanError;
pub use order::{build_plan, ExecutionPlan};
