//! Compiler passes: post-processing steps that rewrite the registry after all
//! configuration documents are loaded and before the container is frozen.

pub mod field_type;
pub mod limitation;
pub mod placeholders;
pub mod references;
pub mod search;
pub mod storage;

pub use field_type::{FieldTypeCollectionPass, FieldTypeNameableCollectionPass};
pub use limitation::RegisterLimitationTypePass;
pub use placeholders::ResolveParameterPlaceholdersPass;
pub use references::CheckReferencesPass;
pub use search::legacy::{CriteriaConverterPass, CriterionFieldValueHandlerRegistryPass, SortClauseConverterPass};
pub use storage::legacy::{FieldValueConverterRegistryPass, RoleLimitationConverterPass};
pub use storage::ExternalStorageRegistryPass;

use crate::container::{reference, ContainerBuilder, Tag};
use crate::errors::CoreError;
use serde_yaml::Value;

/// A named step that may inspect and rewrite any entry of the registry
pub trait CompilerPass: Send + Sync {
    /// Stable name used in logs, errors and the executed pass list
    fn name(&self) -> &'static str;

    /// Rewrite the registry in place
    fn process(&self, container: &mut ContainerBuilder) -> Result<(), CoreError>;
}

/// How a tagged service is handed to its registry service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationShape {
    /// `method(service_id, alias)`, once per tag
    IdAndAlias,
    /// `method(alias, @service_id)`, once per tag
    AliasAndReference,
    /// `method(@service_id)`, once per service
    Reference,
}

/// Collects services carrying `tag` and registers them on the `registry` service
#[derive(Debug, Clone, Copy)]
pub struct TaggedRegistry {
    pub registry: &'static str,
    pub tag: &'static str,
    pub method: &'static str,
    pub shape: RegistrationShape,
}

impl TaggedRegistry {
    /// Append one method call per tagged service; returns the number of calls added.
    ///
    /// Does nothing when the registry service is not defined.
    pub fn apply(&self, container: &mut ContainerBuilder) -> Result<usize, CoreError> {
        if !container.has_definition(self.registry) {
            tracing::debug!("Registry '{}' not defined, skipping tag '{}'", self.registry, self.tag);
            return Ok(0);
        }

        let mut calls = Vec::new();
        for (service_id, tags) in container.find_tagged_service_ids(self.tag) {
            match self.shape {
                RegistrationShape::Reference => calls.push(vec![reference(&service_id)]),
                RegistrationShape::IdAndAlias => {
                    for tag in &tags {
                        let alias = self.require_alias(&service_id, tag)?;
                        calls.push(vec![Value::String(service_id.clone()), Value::String(alias)]);
                    }
                }
                RegistrationShape::AliasAndReference => {
                    for tag in &tags {
                        let alias = self.require_alias(&service_id, tag)?;
                        calls.push(vec![Value::String(alias), reference(&service_id)]);
                    }
                }
            }
        }

        let count = calls.len();
        let registry = container
            .definition_mut(self.registry)
            .ok_or_else(|| CoreError::service_not_found(self.registry))?;
        for arguments in calls {
            registry.add_method_call(self.method, arguments);
        }

        tracing::debug!("Registered {} '{}' services on '{}'", count, self.tag, self.registry);
        Ok(count)
    }

    fn require_alias(&self, service_id: &str, tag: &Tag) -> Result<String, CoreError> {
        tag.attribute("alias")
            .ok_or_else(|| CoreError::missing_tag_attribute(service_id, self.tag, "alias"))
    }
}

/// The domain passes in the order the assembler registers them
pub fn kernel_passes() -> Vec<Box<dyn CompilerPass>> {
    vec![
        Box::new(FieldTypeCollectionPass),
        Box::new(FieldTypeNameableCollectionPass),
        Box::new(RegisterLimitationTypePass),
        Box::new(ExternalStorageRegistryPass),
        Box::new(FieldValueConverterRegistryPass),
        Box::new(RoleLimitationConverterPass),
        Box::new(CriteriaConverterPass),
        Box::new(CriterionFieldValueHandlerRegistryPass),
        Box::new(SortClauseConverterPass),
    ]
}
