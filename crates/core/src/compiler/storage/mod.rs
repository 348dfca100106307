pub mod legacy;

use crate::compiler::{CompilerPass, RegistrationShape, TaggedRegistry};
use crate::container::ContainerBuilder;
use crate::errors::CoreError;

const EXTERNAL_STORAGE_HANDLERS: TaggedRegistry = TaggedRegistry {
    registry: "ezpublish.persistence.external_storage_registry.factory",
    tag: "ezpublish.fieldType.externalStorageHandler",
    method: "registerExternalStorageHandler",
    shape: RegistrationShape::IdAndAlias,
};

/// Registers field type external storage handlers on the storage registry factory
#[derive(Debug, Default, Clone, Copy)]
pub struct ExternalStorageRegistryPass;

impl CompilerPass for ExternalStorageRegistryPass {
    fn name(&self) -> &'static str {
        "ExternalStorageRegistryPass"
    }

    fn process(&self, container: &mut ContainerBuilder) -> Result<(), CoreError> {
        EXTERNAL_STORAGE_HANDLERS.apply(container).map(|_| ())
    }
}
