use crate::compiler::CompilerPass;
use crate::container::{ContainerBuilder, Entry, Reference};
use crate::errors::CoreError;
use serde_yaml::Value;

/// Fails compilation when a required `@id` reference or an alias points at
/// an identifier that is neither a service nor an alias, or when aliases
/// form a cycle.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckReferencesPass;

impl CompilerPass for CheckReferencesPass {
    fn name(&self) -> &'static str {
        "CheckReferencesPass"
    }

    fn process(&self, container: &mut ContainerBuilder) -> Result<(), CoreError> {
        let exists = |id: &str| matches!(container.entry(id), Some(Entry::Service(_) | Entry::Alias(_)));

        for (id, entry) in container.entries() {
            match entry {
                Entry::Alias(target) => {
                    container.resolve_alias(id)?;
                    if !exists(target.as_str()) {
                        return Err(CoreError::dangling_reference(target.as_str(), id));
                    }
                }
                Entry::Service(definition) if !definition.is_abstract => {
                    let values = definition
                        .arguments
                        .iter()
                        .chain(definition.calls.iter().flat_map(|call| call.arguments.iter()));
                    for value in values {
                        if let Some(missing) = first_missing(value, &exists) {
                            return Err(CoreError::dangling_reference(missing, id));
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn first_missing(value: &Value, exists: &dyn Fn(&str) -> bool) -> Option<String> {
    match value {
        Value::String(s) => match Reference::parse(s) {
            Some(Reference::Required(id)) if !exists(id) => Some(id.to_string()),
            _ => None,
        },
        Value::Sequence(items) => items.iter().find_map(|item| first_missing(item, exists)),
        Value::Mapping(mapping) => mapping.values().find_map(|item| first_missing(item, exists)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangling_argument_reference() {
        let mut builder = ContainerBuilder::new();
        builder
            .register("ezpublish.api.repository", "Repository")
            .add_argument(serde_yaml::from_str::<Value>("{handler: '@ezpublish.spi.persistence.cache'}").unwrap());

        let err = CheckReferencesPass.process(&mut builder).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Service not found: ezpublish.spi.persistence.cache (referenced by 'ezpublish.api.repository')"
        );
    }

    #[test]
    fn test_optional_and_escaped_references_pass() {
        let mut builder = ContainerBuilder::new();
        builder
            .register("a", "A")
            .add_argument("@?logger")
            .add_argument("@@literal")
            .add_method_call("setB", vec![Value::from("@b")]);
        builder.register("b", "B");
        builder.set_alias("c", "b");

        CheckReferencesPass.process(&mut builder).unwrap();
    }

    #[test]
    fn test_reference_to_parameter_fails() {
        let mut builder = ContainerBuilder::new();
        builder.set_parameter("not_a_service", "x");
        builder.register("a", "A").add_argument("@not_a_service");

        assert!(CheckReferencesPass.process(&mut builder).is_err());
    }

    #[test]
    fn test_alias_cycle_fails() {
        let mut builder = ContainerBuilder::new();
        builder.set_alias("a", "b");
        builder.set_alias("b", "a");

        match CheckReferencesPass.process(&mut builder) {
            Err(CoreError::CircularAlias { path }) => assert_eq!(path, "a -> b -> a"),
            other => panic!("expected circular alias, got {:?}", other),
        }
    }

    #[test]
    fn test_alias_cycle_fails_compile() {
        let mut builder = ContainerBuilder::new();
        builder.register("ezpublish.api.repository", "Repository");
        builder.set_alias("ezpublish.api.service.content", "ezpublish.api.service.inner_content");
        builder.set_alias("ezpublish.api.service.inner_content", "ezpublish.api.service.content");

        let err = builder.compile().unwrap_err();
        assert!(matches!(
            err,
            CoreError::CompilerPass { ref source, .. } if matches!(**source, CoreError::CircularAlias { .. })
        ));
    }

    #[test]
    fn test_dangling_alias() {
        let mut builder = ContainerBuilder::new();
        builder.set_alias("ezpublish.api.service.content", "ezpublish.api.service.inner_content");

        assert!(matches!(
            CheckReferencesPass.process(&mut builder),
            Err(CoreError::ServiceNotFound { .. })
        ));
    }
}
