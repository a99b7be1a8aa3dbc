use std::sync::Arc;

use async_trait::async_trait;

use crate::component::error::RegistryError;
use crate::component::{Category, Component, ComponentRegistry};
use crate::context::AppContext;
use crate::kernel::error::Result;
use crate::kernel::state::LifecycleState;

#[derive(Debug)]
struct Dummy {
    name: String,
    category: Category,
}

impl Dummy {
    fn new(name: &str, category: Category) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            category,
        })
    }
}

#[async_trait]
impl Component for Dummy {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Category {
        self.category
    }

    async fn initialize(&self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }

    async fn start(&self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }

    async fn stop(&self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }
}

fn add(registry: &mut ComponentRegistry, name: &str, category: Category, deps: &[&str]) {
    registry
        .add(
            Dummy::new(name, category),
            deps.iter().map(|d| d.to_string()).collect(),
        )
        .expect("registration should succeed");
}

/// Snapshot of the graph structure, for before/after comparisons.
fn snapshot(registry: &ComponentRegistry) -> Vec<(String, Vec<String>, Vec<String>)> {
    let mut names = registry.names();
    names.sort();
    names
        .into_iter()
        .map(|n| {
            let deps = registry.dependencies_of(&n);
            let mut dependents = registry.dependents_of(&n);
            dependents.sort();
            (n, deps, dependents)
        })
        .collect()
}

#[test]
fn test_add_and_lookup() {
    let mut registry = ComponentRegistry::new();
    add(&mut registry, "a", Category::Infrastructure, &[]);
    add(&mut registry, "b", Category::Core, &["a"]);

    assert_eq!(registry.len(), 2);
    assert!(registry.has("a"));
    assert!(!registry.has("ghost"));
    assert!(registry.get("b").is_some());
    assert_eq!(registry.dependencies_of("b"), vec!["a".to_string()]);

    let record = registry.record("a").expect("record should exist");
    assert_eq!(record.state(), LifecycleState::Created);
    assert!(!record.is_initialized());
    assert!(!record.is_started());
    assert!(record.last_error().is_none());
}

#[test]
fn test_duplicate_rejection_leaves_registry_unchanged() {
    let mut registry = ComponentRegistry::new();
    add(&mut registry, "a", Category::Infrastructure, &[]);
    add(&mut registry, "b", Category::Core, &["a"]);
    let before = snapshot(&registry);

    let result = registry.add(Dummy::new("b", Category::Web), vec!["a".to_string(), "x".to_string()]);
    assert_eq!(
        result,
        Err(RegistryError::DuplicateName("b".to_string()))
    );
    assert_eq!(snapshot(&registry), before);
}

#[test]
fn test_empty_name_rejected() {
    let mut registry = ComponentRegistry::new();
    let result = registry.add(Dummy::new("", Category::Core), Vec::new());
    assert_eq!(result, Err(RegistryError::EmptyName));
    assert!(registry.is_empty());
}

#[test]
fn test_frozen_registry_rejects_add() {
    let mut registry = ComponentRegistry::new();
    add(&mut registry, "a", Category::Infrastructure, &[]);
    registry.freeze();
    assert!(registry.is_frozen());

    let result = registry.add(Dummy::new("b", Category::Core), Vec::new());
    assert!(matches!(result, Err(RegistryError::Frozen { .. })));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_forward_and_reverse_maps_are_mutual_inverses() {
    let mut registry = ComponentRegistry::new();
    add(&mut registry, "a", Category::Infrastructure, &[]);
    add(&mut registry, "b", Category::DataSource, &["a"]);
    add(&mut registry, "c", Category::Core, &["a", "b"]);

    for name in registry.names() {
        for dep in registry.dependencies_of(&name) {
            assert!(
                registry.dependents_of(&dep).contains(&name),
                "reverse edge {} -> {} missing",
                dep,
                name
            );
        }
        for dependent in registry.dependents_of(&name) {
            assert!(
                registry.dependencies_of(&dependent).contains(&name),
                "forward edge {} -> {} missing",
                dependent,
                name
            );
        }
    }
}

#[test]
fn test_remove_scrubs_reverse_edges() {
    let mut registry = ComponentRegistry::new();
    add(&mut registry, "a", Category::Infrastructure, &[]);
    add(&mut registry, "b", Category::Core, &["a"]);
    assert_eq!(registry.dependents_of("a"), vec!["b".to_string()]);

    assert!(registry.remove("b"));
    assert!(registry.dependents_of("a").is_empty());
    assert!(!registry.has("b"));

    assert!(!registry.remove("b"));
}

#[test]
fn test_by_category_sorted_by_name() {
    let mut registry = ComponentRegistry::new();
    add(&mut registry, "zeta", Category::Core, &[]);
    add(&mut registry, "alpha", Category::Core, &[]);
    add(&mut registry, "mid", Category::Web, &[]);

    let cores = registry.by_category(Category::Core);
    let names: Vec<&str> = cores.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
    assert!(registry.by_category(Category::DataSource).is_empty());
}

#[test]
fn test_dependency_list_dedup_preserves_order() {
    let mut registry = ComponentRegistry::new();
    add(&mut registry, "a", Category::Infrastructure, &[]);
    add(&mut registry, "b", Category::Infrastructure, &[]);
    add(&mut registry, "c", Category::Core, &["b", "a", "b"]);

    assert_eq!(
        registry.dependencies_of("c"),
        vec!["b".to_string(), "a".to_string()]
    );
    assert_eq!(registry.dependents_of("b"), vec!["c".to_string()]);
}

#[test]
fn test_flag_mutators_on_unknown_component() {
    let mut registry = ComponentRegistry::new();
    assert_eq!(
        registry.set_initialized("ghost", true),
        Err(RegistryError::Unknown("ghost".to_string()))
    );
    assert_eq!(
        registry.set_started("ghost", true),
        Err(RegistryError::Unknown("ghost".to_string()))
    );
    assert_eq!(
        registry.set_state("ghost", LifecycleState::Running),
        Err(RegistryError::Unknown("ghost".to_string()))
    );
}
