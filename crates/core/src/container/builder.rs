use crate::compiler::{CheckReferencesPass, CompilerPass, ResolveParameterPlaceholdersPass};
use crate::container::{Container, ContainerDump, Definition, Entry, Resource, Tag};
use crate::errors::CoreError;
use serde_yaml::Value;
use std::collections::HashMap;
use std::time::SystemTime;

/// Mutable service registry populated during bootstrap.
///
/// Every identifier maps to one [`Entry`]. Registering an identifier that
/// already exists replaces the previous entry as a whole; the identifier keeps
/// its original position in registration order.
#[derive(Default)]
pub struct ContainerBuilder {
    entries: HashMap<String, Entry>,
    order: Vec<String>,
    resources: Vec<Resource>,
    passes: Vec<Box<dyn CompilerPass>>,
}

impl std::fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("entries", &self.order.len())
            .field("resources", &self.resources)
            .field("passes", &self.compiler_passes())
            .finish()
    }
}

impl ContainerBuilder {
    /// Create an empty container builder
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, id: String, entry: Entry) {
        if let Some(previous) = self.entries.insert(id.clone(), entry) {
            tracing::debug!("Overriding {} '{}'", previous.kind(), id);
        } else {
            self.order.push(id);
        }
    }

    /// Register a service for the given class and return its definition for further setup
    pub fn register(&mut self, id: impl Into<String>, class: impl Into<String>) -> &mut Definition {
        let id = id.into();
        self.set_definition(id.clone(), Definition::new(class));
        match self.entries.get_mut(&id) {
            Some(Entry::Service(definition)) => definition,
            _ => unreachable!("definition was just inserted"),
        }
    }

    /// Set (or replace) a service definition
    pub fn set_definition(&mut self, id: impl Into<String>, definition: Definition) {
        self.insert(id.into(), Entry::Service(definition));
    }

    /// Make `id` an alias of `target`
    pub fn set_alias(&mut self, id: impl Into<String>, target: impl Into<String>) {
        self.insert(id.into(), Entry::Alias(target.into()));
    }

    /// Set (or replace) a parameter
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.insert(name.into(), Entry::Parameter(value.into()));
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn has_definition(&self, id: &str) -> bool {
        matches!(self.entries.get(id), Some(Entry::Service(_)))
    }

    pub fn definition(&self, id: &str) -> Option<&Definition> {
        self.entries.get(id).and_then(Entry::as_definition)
    }

    pub fn definition_mut(&mut self, id: &str) -> Option<&mut Definition> {
        match self.entries.get_mut(id) {
            Some(Entry::Service(definition)) => Some(definition),
            _ => None,
        }
    }

    /// Follow an alias chain to the identifier it ends on
    pub fn resolve_alias<'a>(&'a self, id: &'a str) -> Result<&'a str, CoreError> {
        let mut current = id;
        let mut seen = vec![id];
        while let Some(Entry::Alias(target)) = self.entries.get(current) {
            let target = target.as_str();
            let looped = seen.contains(&target);
            seen.push(target);
            if looped {
                return Err(CoreError::CircularAlias { path: seen.join(" -> ") });
            }
            current = target;
        }
        Ok(current)
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Entry::Parameter(_)))
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).and_then(Entry::as_parameter)
    }

    /// Identifiers in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Entries in registration order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|entry| (id.as_str(), entry)))
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = (&String, &mut Entry)> {
        self.entries.iter_mut()
    }

    /// Services carrying the given tag, in registration order, with the matching tags
    pub fn find_tagged_service_ids(&self, tag: &str) -> Vec<(String, Vec<Tag>)> {
        self.entries()
            .filter_map(|(id, entry)| {
                let definition = entry.as_definition()?;
                let tags: Vec<Tag> = definition.tags_named(tag).cloned().collect();
                (!tags.is_empty()).then(|| (id.to_string(), tags))
            })
            .collect()
    }

    /// Track a resource the assembled container depends on
    pub fn add_resource(&mut self, resource: Resource) {
        if !self.resources.contains(&resource) {
            self.resources.push(resource);
        }
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Check whether every tracked resource is unchanged since the given time
    pub fn is_fresh(&self, since: SystemTime) -> bool {
        self.resources.iter().all(|resource| resource.is_fresh(since))
    }

    /// Register a compiler pass; passes run in registration order on [`compile`](Self::compile)
    pub fn add_compiler_pass<P>(&mut self, pass: P)
    where
        P: CompilerPass + 'static,
    {
        self.passes.push(Box::new(pass));
    }

    /// Register an already boxed compiler pass
    pub fn add_boxed_compiler_pass(&mut self, pass: Box<dyn CompilerPass>) {
        self.passes.push(pass);
    }

    /// Names of the registered compiler passes, in registration order
    pub fn compiler_passes(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Serializable view of the registry as assembled, before compilation
    pub fn dump(&self) -> ContainerDump<'_> {
        ContainerDump::collect(self.entries(), self.compiler_passes(), &self.resources)
    }

    /// Run the registered passes, resolve parameters, check references and freeze
    pub fn compile(mut self) -> Result<Container, CoreError> {
        let passes = std::mem::take(&mut self.passes);
        let mut executed = Vec::with_capacity(passes.len());

        for pass in &passes {
            tracing::debug!("Running compiler pass {}", pass.name());
            pass.process(&mut self).map_err(|e| e.in_pass(pass.name()))?;
            executed.push(pass.name());
        }

        let finalizers: [&dyn CompilerPass; 2] = [&ResolveParameterPlaceholdersPass, &CheckReferencesPass];
        for pass in finalizers {
            pass.process(&mut self).map_err(|e| e.in_pass(pass.name()))?;
        }

        tracing::info!(
            "Compiled container with {} entries after {} compiler passes",
            self.order.len(),
            executed.len()
        );

        Ok(Container::new(self.entries, self.order, self.resources, executed))
    }
}
