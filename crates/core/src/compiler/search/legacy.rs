//! Legacy search engine registries. Criteria and sort clauses are converted
//! separately for content and location searches.

use crate::compiler::{CompilerPass, RegistrationShape, TaggedRegistry};
use crate::container::ContainerBuilder;
use crate::errors::CoreError;

const CRITERION_HANDLERS: [TaggedRegistry; 2] = [
    TaggedRegistry {
        registry: "ezpublish.search.legacy.gateway.criteria_converter.content",
        tag: "ezpublish.search.legacy.gateway.criterion_handler.content",
        method: "addHandler",
        shape: RegistrationShape::Reference,
    },
    TaggedRegistry {
        registry: "ezpublish.search.legacy.gateway.criteria_converter.location",
        tag: "ezpublish.search.legacy.gateway.criterion_handler.location",
        method: "addHandler",
        shape: RegistrationShape::Reference,
    },
];

const CRITERION_FIELD_VALUE_HANDLERS: TaggedRegistry = TaggedRegistry {
    registry: "ezpublish.search.legacy.gateway.criterion_field_value_handler.registry",
    tag: "ezpublish.search.legacy.gateway.criterion_field_value_handler",
    method: "register",
    shape: RegistrationShape::AliasAndReference,
};

const SORT_CLAUSE_HANDLERS: [TaggedRegistry; 2] = [
    TaggedRegistry {
        registry: "ezpublish.search.legacy.gateway.sort_clause_converter.content",
        tag: "ezpublish.search.legacy.gateway.sort_clause_handler.content",
        method: "addHandler",
        shape: RegistrationShape::Reference,
    },
    TaggedRegistry {
        registry: "ezpublish.search.legacy.gateway.sort_clause_converter.location",
        tag: "ezpublish.search.legacy.gateway.sort_clause_handler.location",
        method: "addHandler",
        shape: RegistrationShape::Reference,
    },
];

#[derive(Debug, Default, Clone, Copy)]
pub struct CriteriaConverterPass;

impl CompilerPass for CriteriaConverterPass {
    fn name(&self) -> &'static str {
        "CriteriaConverterPass"
    }

    fn process(&self, container: &mut ContainerBuilder) -> Result<(), CoreError> {
        for registry in &CRITERION_HANDLERS {
            registry.apply(container)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CriterionFieldValueHandlerRegistryPass;

impl CompilerPass for CriterionFieldValueHandlerRegistryPass {
    fn name(&self) -> &'static str {
        "CriterionFieldValueHandlerRegistryPass"
    }

    fn process(&self, container: &mut ContainerBuilder) -> Result<(), CoreError> {
        CRITERION_FIELD_VALUE_HANDLERS.apply(container).map(|_| ())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SortClauseConverterPass;

impl CompilerPass for SortClauseConverterPass {
    fn name(&self) -> &'static str {
        "SortClauseConverterPass"
    }

    fn process(&self, container: &mut ContainerBuilder) -> Result<(), CoreError> {
        for registry in &SORT_CLAUSE_HANDLERS {
            registry.apply(container)?;
        }
        Ok(())
    }
}
