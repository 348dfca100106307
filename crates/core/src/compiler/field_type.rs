use crate::compiler::{CompilerPass, RegistrationShape, TaggedRegistry};
use crate::container::ContainerBuilder;
use crate::errors::CoreError;

const FIELD_TYPES: TaggedRegistry = TaggedRegistry {
    registry: "ezpublish.field_type_collection.factory",
    tag: "ezpublish.fieldType",
    method: "registerFieldType",
    shape: RegistrationShape::IdAndAlias,
};

const NAMEABLE_FIELD_TYPES: TaggedRegistry = TaggedRegistry {
    registry: "ezpublish.field_type_nameable_collection.factory",
    tag: "ezpublish.fieldType.nameable",
    method: "registerNameableFieldType",
    shape: RegistrationShape::IdAndAlias,
};

/// Registers every `ezpublish.fieldType` service on the field type collection factory
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldTypeCollectionPass;

impl CompilerPass for FieldTypeCollectionPass {
    fn name(&self) -> &'static str {
        "FieldTypeCollectionPass"
    }

    fn process(&self, container: &mut ContainerBuilder) -> Result<(), CoreError> {
        FIELD_TYPES.apply(container).map(|_| ())
    }
}

/// Registers every `ezpublish.fieldType.nameable` service on the nameable collection factory
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldTypeNameableCollectionPass;

impl CompilerPass for FieldTypeNameableCollectionPass {
    fn name(&self) -> &'static str {
        "FieldTypeNameableCollectionPass"
    }

    fn process(&self, container: &mut ContainerBuilder) -> Result<(), CoreError> {
        NAMEABLE_FIELD_TYPES.apply(container).map(|_| ())
    }
}
