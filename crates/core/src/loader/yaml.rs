use crate::container::{ContainerBuilder, Definition, MethodCall, Resource, Tag};
use crate::errors::CoreError;
use crate::loader::FileLocator;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level layout of a configuration document
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    #[serde(default)]
    imports: Option<Vec<Import>>,
    #[serde(default)]
    parameters: Option<Mapping>,
    #[serde(default)]
    services: Option<Mapping>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Import {
    resource: String,
    #[serde(default)]
    ignore_errors: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServiceSpec {
    class: Option<String>,
    #[serde(default)]
    arguments: Vec<Value>,
    #[serde(default)]
    tags: Vec<TagSpec>,
    #[serde(default)]
    calls: Vec<Vec<Value>>,
    alias: Option<String>,
    public: Option<bool>,
    #[serde(default, rename = "abstract")]
    is_abstract: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagSpec {
    Name(String),
    Full(Tag),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Defaults {
    public: Option<bool>,
}

/// Loads YAML configuration documents into a container builder.
///
/// Each document may hold `imports`, `parameters` and `services`. Imports are
/// loaded first, relative to the importing document. Definitions are applied
/// in document order, so a later document overrides identifiers from earlier ones.
pub struct YamlFileLoader<'a> {
    container: &'a mut ContainerBuilder,
    locator: FileLocator,
    loading: Vec<PathBuf>,
}

impl<'a> YamlFileLoader<'a> {
    pub fn new(container: &'a mut ContainerBuilder, locator: FileLocator) -> Self {
        Self {
            container,
            locator,
            loading: Vec::new(),
        }
    }

    /// Locate and load a document by name
    pub fn load(&mut self, name: &str) -> Result<(), CoreError> {
        let path = self.locator.locate(name)?;
        self.load_path(&path)
    }

    fn load_path(&mut self, path: &Path) -> Result<(), CoreError> {
        let canonical = fs::canonicalize(path).map_err(|e| CoreError::document_load(path, e))?;
        if self.loading.contains(&canonical) {
            return Err(CoreError::invalid_document(path, "document imports itself"));
        }

        let content = fs::read_to_string(path).map_err(|e| CoreError::document_load(path, e))?;
        let document = parse_document(&content).map_err(|e| CoreError::document_load(path, e))?;

        tracing::debug!("Loading configuration document {}", path.display());
        self.container.add_resource(Resource::file(path));

        self.loading.push(canonical);
        let result = self.apply(path, document);
        self.loading.pop();
        result
    }

    fn apply(&mut self, path: &Path, document: Document) -> Result<(), CoreError> {
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();

        for import in document.imports.unwrap_or_default() {
            let located = FileLocator::new(&base).locate(&import.resource);
            let outcome = located.and_then(|import_path| self.load_path(&import_path));
            match outcome {
                Err(e) if import.ignore_errors => {
                    tracing::debug!("Ignoring failed import '{}': {}", import.resource, e);
                }
                other => other?,
            }
        }

        for (key, value) in document.parameters.unwrap_or_default() {
            let name = string_key(path, key, "parameter")?;
            self.container.set_parameter(name, value);
        }

        let services = document.services.unwrap_or_default();
        let defaults = match services.get("_defaults") {
            Some(value) => serde_yaml::from_value::<Option<Defaults>>(value.clone())
                .map_err(|e| CoreError::document_load(path, e))?
                .unwrap_or_default(),
            None => Defaults::default(),
        };

        for (key, value) in services {
            let id = string_key(path, key, "service")?;
            if id == "_defaults" {
                continue;
            }
            self.register_service(path, id, value, &defaults)?;
        }
        Ok(())
    }

    fn register_service(&mut self, path: &Path, id: String, value: Value, defaults: &Defaults) -> Result<(), CoreError> {
        let spec = match value {
            Value::Null => {
                let mut definition = Definition::new(id.clone());
                definition.public = defaults.public.unwrap_or(true);
                self.container.set_definition(id, definition);
                return Ok(());
            }
            Value::String(target) => {
                let Some(target) = target.strip_prefix('@') else {
                    return Err(CoreError::invalid_document(
                        path,
                        format!("service '{}' must be a mapping or an '@alias' string", id),
                    ));
                };
                self.container.set_alias(id, target);
                return Ok(());
            }
            other => serde_yaml::from_value::<ServiceSpec>(other).map_err(|e| {
                CoreError::invalid_document(path, format!("service '{}': {}", id, e))
            })?,
        };

        if let Some(target) = spec.alias {
            self.container.set_alias(id, target);
            return Ok(());
        }

        let mut definition = Definition::new(spec.class.unwrap_or_else(|| id.clone()));
        definition.arguments = spec.arguments;
        definition.tags = spec
            .tags
            .into_iter()
            .map(|tag| match tag {
                TagSpec::Name(name) => Tag::new(name),
                TagSpec::Full(tag) => tag,
            })
            .collect();
        definition.calls = spec
            .calls
            .into_iter()
            .map(|call| method_call(path, &id, call))
            .collect::<Result<_, _>>()?;
        definition.public = spec.public.or(defaults.public).unwrap_or(true);
        definition.is_abstract = spec.is_abstract;

        self.container.set_definition(id, definition);
        Ok(())
    }
}

fn parse_document(content: &str) -> Result<Document, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(Document::default());
    }
    match serde_yaml::from_str::<Value>(content)? {
        Value::Null => Ok(Document::default()),
        value => serde_yaml::from_value(value),
    }
}

fn string_key(path: &Path, key: Value, kind: &str) -> Result<String, CoreError> {
    match key {
        Value::String(key) => Ok(key),
        other => Err(CoreError::invalid_document(
            path,
            format!("{} identifiers must be strings, got {:?}", kind, other),
        )),
    }
}

fn method_call(path: &Path, id: &str, call: Vec<Value>) -> Result<MethodCall, CoreError> {
    let mut parts = call.into_iter();
    let method = match parts.next() {
        Some(Value::String(method)) => method,
        _ => {
            return Err(CoreError::invalid_document(
                path,
                format!("call on service '{}' must start with a method name", id),
            ))
        }
    };
    let arguments = match parts.next() {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(arguments)) => arguments,
        Some(_) => {
            return Err(CoreError::invalid_document(
                path,
                format!("arguments of '{}' call on service '{}' must be a list", method, id),
            ))
        }
    };
    Ok(MethodCall::new(method, arguments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Entry;
    use tempfile::TempDir;

    fn settings(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_load_parameters_and_services() {
        let dir = settings(&[(
            "fieldtypes.yml",
            r#"
parameters:
    ezpublish.fieldType.ezstring.class: eZ\Publish\Core\FieldType\TextLine\Type

services:
    ezpublish.fieldType.ezstring:
        class: "%ezpublish.fieldType.ezstring.class%"
        arguments: ["@ezpublish.fieldType.ezstring.validator"]
        tags:
            - {name: ezpublish.fieldType, alias: ezstring}
            - ezpublish.fieldType.nameable
        calls:
            - [setTransformationProcessor, ["@ezpublish.api.service.transformation"]]
            - [reset]
    ezpublish.fieldType.ezstring.validator: ~
    ezpublish.field_type.string: "@ezpublish.fieldType.ezstring"
"#,
        )]);

        let mut builder = ContainerBuilder::new();
        YamlFileLoader::new(&mut builder, FileLocator::new(dir.path()))
            .load("fieldtypes.yml")
            .unwrap();

        assert_eq!(
            builder.parameter("ezpublish.fieldType.ezstring.class"),
            Some(&Value::from("eZ\\Publish\\Core\\FieldType\\TextLine\\Type"))
        );
        let definition = builder.definition("ezpublish.fieldType.ezstring").unwrap();
        assert_eq!(definition.class, "%ezpublish.fieldType.ezstring.class%");
        assert_eq!(definition.tags[0].attribute("alias").as_deref(), Some("ezstring"));
        assert_eq!(definition.tags[1], Tag::new("ezpublish.fieldType.nameable"));
        assert_eq!(definition.calls.len(), 2);
        assert!(definition.calls[1].arguments.is_empty());
        assert_eq!(
            builder.definition("ezpublish.fieldType.ezstring.validator").unwrap().class,
            "ezpublish.fieldType.ezstring.validator"
        );
        assert_eq!(
            builder.entry("ezpublish.field_type.string"),
            Some(&Entry::Alias("ezpublish.fieldType.ezstring".to_string()))
        );
        assert_eq!(builder.resources(), &[Resource::file(dir.path().join("fieldtypes.yml"))]);
    }

    #[test]
    fn test_imports_load_before_own_definitions() {
        let dir = settings(&[
            ("repository.yml", "imports:\n    - {resource: repository/inner.yml}\nparameters:\n    handler: outer\n"),
            ("repository/inner.yml", "parameters:\n    handler: inner\n    inner_only: true\n"),
        ]);

        let mut builder = ContainerBuilder::new();
        YamlFileLoader::new(&mut builder, FileLocator::new(dir.path()))
            .load("repository.yml")
            .unwrap();

        assert_eq!(builder.parameter("handler"), Some(&Value::from("outer")));
        assert_eq!(builder.parameter("inner_only"), Some(&Value::from(true)));
        assert_eq!(builder.resources().len(), 2);
    }

    #[test]
    fn test_ignored_import_errors() {
        let dir = settings(&[(
            "io.yml",
            "imports:\n    - {resource: missing.yml, ignore_errors: true}\nparameters:\n    io: ok\n",
        )]);

        let mut builder = ContainerBuilder::new();
        YamlFileLoader::new(&mut builder, FileLocator::new(dir.path())).load("io.yml").unwrap();
        assert_eq!(builder.parameter("io"), Some(&Value::from("ok")));
    }

    #[test]
    fn test_self_import_fails() {
        let dir = settings(&[("loop.yml", "imports:\n    - {resource: loop.yml}\n")]);

        let mut builder = ContainerBuilder::new();
        let err = YamlFileLoader::new(&mut builder, FileLocator::new(dir.path()))
            .load("loop.yml")
            .unwrap_err();
        assert!(err.is_document_error());
    }

    #[test]
    fn test_import_cycle_through_parent_dir_fails() {
        let dir = settings(&[
            ("repository.yml", "imports:\n    - {resource: repository/inner.yml}\n"),
            ("repository/inner.yml", "imports:\n    - {resource: ../repository.yml}\n"),
        ]);

        let mut builder = ContainerBuilder::new();
        let err = YamlFileLoader::new(&mut builder, FileLocator::new(dir.path()))
            .load("repository.yml")
            .unwrap_err();
        assert!(err.is_document_error());
        assert!(err.to_string().contains("imports itself"));
    }

    #[test]
    fn test_empty_document_is_valid() {
        let dir = settings(&[("utils.yml", ""), ("settings.yml", "parameters: ~\nservices: ~\n")]);

        let mut builder = ContainerBuilder::new();
        let mut loader = YamlFileLoader::new(&mut builder, FileLocator::new(dir.path()));
        loader.load("utils.yml").unwrap();
        loader.load("settings.yml").unwrap();
        assert_eq!(builder.ids().count(), 0);
    }

    #[test]
    fn test_malformed_document_fails() {
        let dir = settings(&[
            ("broken.yml", "services: [unclosed\n"),
            ("unknown.yml", "servces:\n    a: ~\n"),
        ]);

        let mut builder = ContainerBuilder::new();
        let mut loader = YamlFileLoader::new(&mut builder, FileLocator::new(dir.path()));
        assert!(loader.load("broken.yml").unwrap_err().is_document_error());
        assert!(loader.load("unknown.yml").unwrap_err().is_document_error());
    }

    #[test]
    fn test_defaults_apply_to_services() {
        let dir = settings(&[(
            "roles.yml",
            "services:\n    _defaults:\n        public: false\n    a: {class: A}\n    b: {class: B, public: true}\n",
        )]);

        let mut builder = ContainerBuilder::new();
        YamlFileLoader::new(&mut builder, FileLocator::new(dir.path())).load("roles.yml").unwrap();
        assert!(!builder.definition("a").unwrap().public);
        assert!(builder.definition("b").unwrap().public);
        assert!(!builder.contains("_defaults"));
    }
}
