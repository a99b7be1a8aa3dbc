use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::component::error::RegistryError;
use crate::component::{Category, Component};
use crate::kernel::state::LifecycleState;

/// Kernel-owned bookkeeping for one registered component.
pub struct ComponentRecord {
    component: Arc<dyn Component>,
    dependencies: Vec<String>,
    state: LifecycleState,
    initialized: bool,
    started: bool,
    last_error: Option<String>,
}

impl ComponentRecord {
    fn new(component: Arc<dyn Component>, dependencies: Vec<String>) -> Self {
        Self {
            component,
            dependencies,
            state: LifecycleState::Created,
            initialized: false,
            started: false,
            last_error: None,
        }
    }

    pub fn component(&self) -> &Arc<dyn Component> {
        &self.component
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl fmt::Debug for ComponentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRecord")
            .field("name", &self.component.name())
            .field("category", &self.component.category())
            .field("dependencies", &self.dependencies)
            .field("state", &self.state)
            .field("initialized", &self.initialized)
            .field("started", &self.started)
            .field("last_error", &self.last_error)
            .finish()
    }
}

/// Directed dependency graph keyed by component name.
///
/// Holds one [`ComponentRecord`] per unique name plus the reverse-edge map
/// (name -> dependents). Forward edges live on the records; the two maps are
/// kept mutual inverses on every mutation.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    records: HashMap<String, ComponentRecord>,
    dependents: HashMap<String, Vec<String>>,
    frozen: bool,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component with its effective dependency list.
    ///
    /// Rejects empty names, duplicates, and any mutation after freeze. A
    /// rejected registration leaves the registry untouched.
    pub fn add(
        &mut self,
        component: Arc<dyn Component>,
        dependencies: Vec<String>,
    ) -> Result<(), RegistryError> {
        if self.frozen {
            return Err(RegistryError::Frozen {
                operation: "add component",
            });
        }
        let name = component.name().to_string();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.records.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        // Dedup while preserving declaration order for diagnostics.
        let mut deps: Vec<String> = Vec::with_capacity(dependencies.len());
        for dep in dependencies {
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        }

        for dep in &deps {
            self.dependents
                .entry(dep.clone())
                .or_default()
                .push(name.clone());
        }
        self.dependents.entry(name.clone()).or_default();
        self.records
            .insert(name, ComponentRecord::new(component, deps));
        Ok(())
    }

    /// Remove a component, purging its forward edges and scrubbing it from
    /// every reverse-edge list. Intended for test/reset paths only.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(record) = self.records.remove(name) else {
            return false;
        };
        for dep in record.dependencies() {
            if let Some(dependents) = self.dependents.get_mut(dep) {
                dependents.retain(|n| n != name);
            }
        }
        self.dependents.remove(name);
        true
    }

    pub fn has(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn record(&self, name: &str) -> Option<&ComponentRecord> {
        self.records.get(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Component>> {
        self.records.get(name).map(|r| r.component.clone())
    }

    pub fn all(&self) -> Vec<Arc<dyn Component>> {
        self.records.values().map(|r| r.component.clone()).collect()
    }

    /// All registered names, unordered.
    pub fn names(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    /// Components of the given category, sorted by name ascending.
    pub fn by_category(&self, category: Category) -> Vec<Arc<dyn Component>> {
        let mut matches: Vec<&ComponentRecord> = self
            .records
            .values()
            .filter(|r| r.component.category() == category)
            .collect();
        matches.sort_by(|a, b| a.component.name().cmp(b.component.name()));
        matches.into_iter().map(|r| r.component.clone()).collect()
    }

    /// Forward dependency edges of a component.
    pub fn dependencies_of(&self, name: &str) -> Vec<String> {
        self.records
            .get(name)
            .map(|r| r.dependencies.clone())
            .unwrap_or_default()
    }

    /// Reverse dependency edges: components that declared `name` as a
    /// dependency.
    pub fn dependents_of(&self, name: &str) -> Vec<String> {
        self.dependents.get(name).cloned().unwrap_or_default()
    }

    pub fn set_initialized(&mut self, name: &str, value: bool) -> Result<(), RegistryError> {
        let record = self
            .records
            .get_mut(name)
            .ok_or_else(|| RegistryError::Unknown(name.to_string()))?;
        record.initialized = value;
        Ok(())
    }

    pub fn set_started(&mut self, name: &str, value: bool) -> Result<(), RegistryError> {
        let record = self
            .records
            .get_mut(name)
            .ok_or_else(|| RegistryError::Unknown(name.to_string()))?;
        record.started = value;
        Ok(())
    }

    pub fn set_state(&mut self, name: &str, state: LifecycleState) -> Result<(), RegistryError> {
        let record = self
            .records
            .get_mut(name)
            .ok_or_else(|| RegistryError::Unknown(name.to_string()))?;
        record.state = state;
        Ok(())
    }

    pub fn set_last_error(&mut self, name: &str, error: String) -> Result<(), RegistryError> {
        let record = self
            .records
            .get_mut(name)
            .ok_or_else(|| RegistryError::Unknown(name.to_string()))?;
        record.last_error = Some(error);
        Ok(())
    }

    /// Make the registry immutable. Invoked by the engine when run begins.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
