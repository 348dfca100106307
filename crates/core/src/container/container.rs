use crate::container::{Definition, Entry, Resource};
use crate::errors::CoreError;
use serde::Serialize;
use serde_yaml::Value;
use std::collections::{BTreeMap, HashMap};
use std::time::SystemTime;

/// Finalized, read-only service registry produced by
/// [`ContainerBuilder::compile`](crate::container::ContainerBuilder::compile).
#[derive(Debug, Clone)]
pub struct Container {
    entries: HashMap<String, Entry>,
    order: Vec<String>,
    resources: Vec<Resource>,
    executed_passes: Vec<&'static str>,
}

/// Serializable view of a compiled container
#[derive(Debug, Serialize)]
pub struct ContainerDump<'a> {
    pub parameters: BTreeMap<&'a str, &'a Value>,
    pub services: BTreeMap<&'a str, &'a Definition>,
    pub aliases: BTreeMap<&'a str, &'a str>,
    pub passes: Vec<&'static str>,
    pub resources: &'a [Resource],
}

impl<'a> ContainerDump<'a> {
    pub(crate) fn collect<I>(entries: I, passes: Vec<&'static str>, resources: &'a [Resource]) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a Entry)>,
    {
        let mut dump = ContainerDump {
            parameters: BTreeMap::new(),
            services: BTreeMap::new(),
            aliases: BTreeMap::new(),
            passes,
            resources,
        };
        for (id, entry) in entries {
            match entry {
                Entry::Parameter(value) => {
                    dump.parameters.insert(id, value);
                }
                Entry::Service(definition) => {
                    dump.services.insert(id, definition);
                }
                Entry::Alias(target) => {
                    dump.aliases.insert(id, target.as_str());
                }
            }
        }
        dump
    }
}

impl Container {
    pub(crate) fn new(
        entries: HashMap<String, Entry>,
        order: Vec<String>,
        resources: Vec<Resource>,
        executed_passes: Vec<&'static str>,
    ) -> Self {
        Self {
            entries,
            order,
            resources,
            executed_passes,
        }
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn has(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Follow aliases until a non-alias identifier is reached
    pub fn resolve_alias<'a>(&'a self, id: &'a str) -> Result<&'a str, CoreError> {
        let mut current = id;
        let mut seen = vec![id];
        while let Some(Entry::Alias(target)) = self.entries.get(current) {
            if seen.contains(&target.as_str()) {
                seen.push(target.as_str());
                return Err(CoreError::CircularAlias { path: seen.join(" -> ") });
            }
            seen.push(target.as_str());
            current = target.as_str();
        }
        Ok(current)
    }

    /// Definition for a service id, following aliases
    pub fn definition(&self, id: &str) -> Result<&Definition, CoreError> {
        let resolved = self.resolve_alias(id)?;
        self.entries
            .get(resolved)
            .and_then(Entry::as_definition)
            .ok_or_else(|| CoreError::service_not_found(id))
    }

    pub fn parameter(&self, name: &str) -> Result<&Value, CoreError> {
        self.entries
            .get(name)
            .and_then(Entry::as_parameter)
            .ok_or_else(|| CoreError::parameter_not_found(name))
    }

    /// Service identifiers in registration order
    pub fn service_ids(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|id| matches!(self.entries.get(id.as_str()), Some(Entry::Service(_))))
            .map(String::as_str)
            .collect()
    }

    /// Parameters in registration order
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.order.iter().filter_map(|name| {
            self.entries
                .get(name)
                .and_then(Entry::as_parameter)
                .map(|value| (name.as_str(), value))
        })
    }

    /// Names of the compiler passes that ran, in order
    pub fn executed_passes(&self) -> &[&'static str] {
        &self.executed_passes
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn is_fresh(&self, since: SystemTime) -> bool {
        self.resources.iter().all(|resource| resource.is_fresh(since))
    }

    pub fn dump(&self) -> ContainerDump<'_> {
        ContainerDump::collect(
            self.entries.iter().map(|(id, entry)| (id.as_str(), entry)),
            self.executed_passes.clone(),
            &self.resources,
        )
    }
}
