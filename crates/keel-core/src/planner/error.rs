use thiserror::Error;

use crate::component::Category;

/// Errors raised while resolving the execution plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A declared dependency names a component that is not registered.
    #[error("component '{requirer}' depends on unknown component '{dependency}'")]
    MissingDependency { requirer: String, dependency: String },

    /// The dependency relation contains a cycle. The path lists the cycle in
    /// dependency direction, with the first node repeated at the end.
    #[error("circular dependency detected: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    /// A declared dependency cannot be honored without violating category
    /// precedence (e.g. a DataSource component depending on a Web component).
    #[error(
        "dependency of '{component}' ({category}) on '{dependency}' ({dependency_category}) \
         conflicts with category precedence"
    )]
    CategoryConflict {
        component: String,
        category: Category,
        dependency: String,
        dependency_category: Category,
    },
}
