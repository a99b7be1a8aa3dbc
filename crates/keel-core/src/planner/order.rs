use std::collections::{BTreeSet, HashMap};

use crate::component::{Category, ComponentRegistry};
use crate::planner::error::PlanError;

/// A resolved total ordering of component names.
///
/// `init_order` lists every component after all of its dependencies;
/// `shutdown_order` is the exact reverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    init_order: Vec<String>,
}

impl ExecutionPlan {
    pub fn init_order(&self) -> &[String] {
        &self.init_order
    }

    pub fn shutdown_order(&self) -> Vec<String> {
        self.init_order.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.init_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.init_order.is_empty()
    }
}

/// Resolve the execution plan for the given registry.
///
/// Validates dependency existence, detects cycles with a three-color DFS,
/// runs a Kahn topological sort (lexicographic tie-breaks for determinism),
/// partitions the result by category precedence, and verifies that the
/// partition did not break any declared dependency.
pub fn build_plan(registry: &ComponentRegistry) -> Result<ExecutionPlan, PlanError> {
    let mut names = registry.names();
    names.sort();

    // Every referenced dependency must be registered before planning succeeds.
    for name in &names {
        for dep in registry.dependencies_of(name) {
            if !registry.has(&dep) {
                return Err(PlanError::MissingDependency {
                    requirer: name.clone(),
                    dependency: dep,
                });
            }
        }
    }

    if let Some(cycle) = find_cycle(registry, &names) {
        return Err(PlanError::Cycle(cycle));
    }

    let sorted = kahn_sort(registry, &names);
    let ordered = partition_by_category(registry, sorted);
    verify_edges(registry, &ordered)?;

    Ok(ExecutionPlan {
        init_order: ordered,
    })
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    OnStack,
    Done,
}

/// Three-color DFS over the forward-dependency edges. Returns the first cycle
/// found, in dependency direction with the entry node repeated at the end.
fn find_cycle(registry: &ComponentRegistry, names: &[String]) -> Option<Vec<String>> {
    let mut marks: HashMap<String, Mark> = HashMap::new();
    let mut stack: Vec<String> = Vec::new();

    for name in names {
        if !marks.contains_key(name) {
            if let Some(cycle) = visit(registry, name, &mut marks, &mut stack) {
                return Some(cycle);
            }
        }
    }
    None
}

fn visit(
    registry: &ComponentRegistry,
    name: &str,
    marks: &mut HashMap<String, Mark>,
    stack: &mut Vec<String>,
) -> Option<Vec<String>> {
    marks.insert(name.to_string(), Mark::OnStack);
    stack.push(name.to_string());

    for dep in registry.dependencies_of(name) {
        match marks.get(&dep) {
            Some(Mark::OnStack) => {
                let start = stack.iter().position(|n| *n == dep).unwrap_or(0);
                let mut cycle: Vec<String> = stack[start..].to_vec();
                cycle.push(dep);
                return Some(cycle);
            }
            Some(Mark::Done) => {}
            None => {
                if let Some(cycle) = visit(registry, &dep, marks, stack) {
                    return Some(cycle);
                }
            }
        }
    }

    stack.pop();
    marks.insert(name.to_string(), Mark::Done);
    None
}

/// Kahn topological sort. The ready set is a `BTreeSet`, so simultaneously
/// ready nodes are emitted in lexicographic order.
fn kahn_sort(registry: &ComponentRegistry, names: &[String]) -> Vec<String> {
    let mut in_degree: HashMap<String, usize> = HashMap::with_capacity(names.len());
    let mut ready: BTreeSet<String> = BTreeSet::new();

    for name in names {
        let degree = registry.dependencies_of(name).len();
        if degree == 0 {
            ready.insert(name.clone());
        }
        in_degree.insert(name.clone(), degree);
    }

    let mut order = Vec::with_capacity(names.len());
    while let Some(name) = ready.iter().next().cloned() {
        ready.remove(&name);
        for dependent in registry.dependents_of(&name) {
            if let Some(degree) = in_degree.get_mut(&dependent) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(dependent);
                }
            }
        }
        order.push(name);
    }
    order
}

/// Concatenate the category buckets in precedence order, preserving the
/// relative order produced by the topological sort within each bucket.
fn partition_by_category(registry: &ComponentRegistry, sorted: Vec<String>) -> Vec<String> {
    let mut ordered = Vec::with_capacity(sorted.len());
    for category in Category::ALL {
        for name in &sorted {
            if category_of(registry, name) == category {
                ordered.push(name.clone());
            }
        }
    }
    ordered
}

fn category_of(registry: &ComponentRegistry, name: &str) -> Category {
    registry
        .get(name)
        .map(|c| c.category())
        // Unreachable after existence validation; Core is a harmless default.
        .unwrap_or(Category::Core)
}

/// After partitioning, every dependency must still precede its dependent. A
/// violated edge means the declared dependency contradicts category
/// precedence, which the planner rejects rather than silently reordering.
fn verify_edges(registry: &ComponentRegistry, ordered: &[String]) -> Result<(), PlanError> {
    let position: HashMap<&str, usize> = ordered
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    for name in ordered {
        for dep in registry.dependencies_of(name) {
            let before = position.get(dep.as_str()).copied().unwrap_or(usize::MAX);
            let after = position.get(name.as_str()).copied().unwrap_or(0);
            if before > after {
                return Err(PlanError::CategoryConflict {
                    component: name.clone(),
                    category: category_of(registry, name),
                    dependency: dep.clone(),
                    dependency_category: category_of(registry, &dep),
                });
            }
        }
    }
    Ok(())
}
