use crate::compiler::{CompilerPass, RegistrationShape, TaggedRegistry};
use crate::container::ContainerBuilder;
use crate::errors::CoreError;

const LIMITATION_TYPES: TaggedRegistry = TaggedRegistry {
    registry: "ezpublish.api.repository.factory",
    tag: "ezpublish.limitationType",
    method: "registerLimitationType",
    shape: RegistrationShape::AliasAndReference,
};

/// Registers permission limitation types on the repository factory
#[derive(Debug, Default, Clone, Copy)]
pub struct RegisterLimitationTypePass;

impl CompilerPass for RegisterLimitationTypePass {
    fn name(&self) -> &'static str {
        "RegisterLimitationTypePass"
    }

    fn process(&self, container: &mut ContainerBuilder) -> Result<(), CoreError> {
        LIMITATION_TYPES.apply(container).map(|_| ())
    }
}
