//! Legacy (SQL) storage engine registries.

use crate::compiler::{CompilerPass, RegistrationShape, TaggedRegistry};
use crate::container::ContainerBuilder;
use crate::errors::CoreError;

const FIELD_VALUE_CONVERTERS: TaggedRegistry = TaggedRegistry {
    registry: "ezpublish.persistence.legacy.field_value_converter.registry",
    tag: "ezpublish.storageEngine.legacy.converter",
    method: "register",
    shape: RegistrationShape::AliasAndReference,
};

const ROLE_LIMITATION_HANDLERS: TaggedRegistry = TaggedRegistry {
    registry: "ezpublish.persistence.legacy.role.limitation.converter",
    tag: "ezpublish.persistence.legacy.role.limitation.handler",
    method: "addHandler",
    shape: RegistrationShape::Reference,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct FieldValueConverterRegistryPass;

impl CompilerPass for FieldValueConverterRegistryPass {
    fn name(&self) -> &'static str {
        "FieldValueConverterRegistryPass"
    }

    fn process(&self, container: &mut ContainerBuilder) -> Result<(), CoreError> {
        FIELD_VALUE_CONVERTERS.apply(container).map(|_| ())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RoleLimitationConverterPass;

impl CompilerPass for RoleLimitationConverterPass {
    fn name(&self) -> &'static str {
        "RoleLimitationConverterPass"
    }

    fn process(&self, container: &mut ContainerBuilder) -> Result<(), CoreError> {
        ROLE_LIMITATION_HANDLERS.apply(container).map(|_| ())
    }
}
