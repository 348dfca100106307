//! Integration tests for container assembly from an install directory
//!
//! Each test builds a settings tree in a temporary install directory with all
//! configuration documents present, then assembles the container from it.

use kernel_core::bootstrap::{settings_path, CACHE_POOL_DRIVER};
use kernel_core::{
    assemble, BootstrapConfig, ContainerAssembler, CoreError, Entry, Resource, CONFIGURATION_DOCUMENTS,
    ROOT_DIR_PARAMETER,
};
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Create an install directory where every configuration document exists
/// (empty unless overridden)
fn install_dir(overrides: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_path(dir.path());
    for document in CONFIGURATION_DOCUMENTS {
        write(&settings, document, "");
    }
    for (document, content) in overrides {
        write(&settings, document, content);
    }
    dir
}

fn write(settings: &Path, document: &str, content: &str) {
    let path = settings.join(document);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn servers(host: &str) -> Value {
    serde_yaml::from_str(&format!("servers:\n    - server: \"{}\"\n", host)).unwrap()
}

#[test]
fn test_missing_install_dir_fails_before_loading() {
    let err = assemble("", &BootstrapConfig::single_redis(true, true)).unwrap_err();
    assert!(matches!(err, CoreError::MissingInstallDir));
}

#[test]
fn test_redis_driver_for_each_flag_combination() {
    let dir = install_dir(&[]);
    let cases = [
        (true, true, "eZ\\Bundle\\EzPublishCoreBundle\\Cache\\Driver\\Redis\\RedisIgbinaryLzf"),
        (true, false, "eZ\\Bundle\\EzPublishCoreBundle\\Cache\\Driver\\Redis\\RedisIgbinary"),
        (false, true, "eZ\\Bundle\\EzPublishCoreBundle\\Cache\\Driver\\Redis\\RedisSerializeLzf"),
        (false, false, "Stash\\Driver\\Redis"),
    ];

    for (igbinary, lzf, class) in cases {
        let container = assemble(dir.path(), &BootstrapConfig::single_redis(igbinary, lzf)).unwrap();
        let driver = container.definition(CACHE_POOL_DRIVER).unwrap();
        assert_eq!(driver.class, class, "igbinary={} lzf={}", igbinary, lzf);
        assert_eq!(driver.arguments, vec![servers("127.0.0.1")]);
    }
}

#[test]
fn test_redis_driver_from_environment_snapshot() {
    let dir = install_dir(&[]);
    let config = BootstrapConfig::from_vars([
        ("CUSTOM_CACHE_POOL", "singleredis"),
        ("REDIS_ENABLE_IGBINARY", ""),
        ("REDIS_ENABLE_LZF", "1"),
        ("CACHE_HOST", "10.0.0.5"),
    ]);

    let container = assemble(dir.path(), &config).unwrap();
    let driver = container.definition(CACHE_POOL_DRIVER).unwrap();
    assert_eq!(driver.class, "eZ\\Bundle\\EzPublishCoreBundle\\Cache\\Driver\\Redis\\RedisSerializeLzf");
    assert_eq!(driver.arguments, vec![servers("10.0.0.5")]);
}

#[test]
fn test_default_pool_leaves_driver_to_documents() {
    let dir = install_dir(&[]);
    let container = assemble(dir.path(), &BootstrapConfig::new()).unwrap();
    assert!(!container.contains(CACHE_POOL_DRIVER));

    let dir = install_dir(&[(
        "storage_engines/cache.yml",
        "services:\n    ezpublish.cache_pool.driver:\n        class: Stash\\Driver\\Ephemeral\n",
    )]);
    let container = assemble(dir.path(), &BootstrapConfig::new()).unwrap();
    assert_eq!(container.definition(CACHE_POOL_DRIVER).unwrap().class, "Stash\\Driver\\Ephemeral");
}

#[test]
fn test_later_document_overrides_earlier() {
    let dir = install_dir(&[
        (
            "fieldtypes.yml",
            "parameters:\n    ezpublish.persistence.legacy.dsn: \"sqlite://:memory:\"\nservices:\n    ezpublish.api.storage_engine:\n        class: First\n        arguments: [one]\n",
        ),
        (
            "tests/common.yml",
            "services:\n    ezpublish.api.storage_engine:\n        class: Second\n",
        ),
        (
            "tests/integration_legacy_core.yml",
            "parameters:\n    ezpublish.persistence.legacy.dsn: sqlite:///tmp/test.db\n",
        ),
    ]);

    let container = assemble(dir.path(), &BootstrapConfig::new()).unwrap();

    let engine = container.definition("ezpublish.api.storage_engine").unwrap();
    assert_eq!(engine.class, "Second");
    assert!(engine.arguments.is_empty(), "override replaces the whole definition");
    assert_eq!(
        container.parameter("ezpublish.persistence.legacy.dsn"),
        Some(&Value::from("sqlite:///tmp/test.db"))
    );
}

#[test]
fn test_documents_load_in_listed_order() {
    let dir = install_dir(&[]);
    let container = assemble(dir.path(), &BootstrapConfig::new()).unwrap();

    let loaded: Vec<_> = container
        .resources()
        .iter()
        .filter_map(|resource| match resource {
            Resource::File { path } => Some(path.clone()),
            Resource::Code { .. } => None,
        })
        .collect();
    let expected: Vec<_> = CONFIGURATION_DOCUMENTS
        .iter()
        .map(|document| settings_path(dir.path()).join(document))
        .collect();
    assert_eq!(loaded, expected);
}

#[test]
fn test_bootstrap_code_is_tracked() {
    let dir = install_dir(&[]);
    let container = assemble(dir.path(), &BootstrapConfig::new()).unwrap();

    match &container.resources()[0] {
        Resource::Code { location, .. } => assert!(location.ends_with("assembler.rs")),
        other => panic!("expected the assembler source first, got {:?}", other),
    }
}

#[test]
fn test_malformed_document_aborts_assembly() {
    let dir = install_dir(&[("roles.yml", "services:\n    - not a mapping\n")]);
    let err = assemble(dir.path(), &BootstrapConfig::new()).unwrap_err();

    assert!(err.is_document_error());
    assert!(err.to_string().contains("roles.yml"));
}

#[test]
fn test_missing_document_aborts_assembly() {
    let dir = install_dir(&[]);
    fs::remove_file(settings_path(dir.path()).join("search_engines/common.yml")).unwrap();

    let err = assemble(dir.path(), &BootstrapConfig::new()).unwrap_err();
    assert!(matches!(err, CoreError::DocumentLoad { .. }));
}

#[test]
fn test_root_dir_parameter_is_install_dir() {
    let dir = install_dir(&[]);
    let container = assemble(dir.path(), &BootstrapConfig::new()).unwrap();

    assert_eq!(
        container.entry(ROOT_DIR_PARAMETER),
        Some(&Entry::Parameter(Value::from(dir.path().to_str().unwrap())))
    );
}

#[test]
fn test_root_dir_overrides_documents() {
    let dir = install_dir(&[("settings.yml", "parameters:\n    ezpublish.kernel.root_dir: /elsewhere\n")]);
    let container = assemble(dir.path(), &BootstrapConfig::new()).unwrap();

    assert_eq!(
        container.parameter(ROOT_DIR_PARAMETER),
        Some(&Value::from(dir.path().to_str().unwrap()))
    );
}

#[test]
fn test_nine_passes_registered_once_in_order() {
    let dir = install_dir(&[]);
    let container = assemble(dir.path(), &BootstrapConfig::new()).unwrap();

    let expected = vec![
        "FieldTypeCollectionPass",
        "FieldTypeNameableCollectionPass",
        "RegisterLimitationTypePass",
        "ExternalStorageRegistryPass",
        "FieldValueConverterRegistryPass",
        "RoleLimitationConverterPass",
        "CriteriaConverterPass",
        "CriterionFieldValueHandlerRegistryPass",
        "SortClauseConverterPass",
    ];
    assert_eq!(container.compiler_passes(), expected);

    let compiled = container.compile().unwrap();
    assert_eq!(compiled.executed_passes(), expected.as_slice());
}

#[test]
fn test_custom_document_list() {
    let dir = install_dir(&[("io.yml", "parameters:\n    io.root: var\n")]);
    let container = ContainerAssembler::new()
        .with_documents(["io.yml"])
        .assemble(dir.path(), &BootstrapConfig::new())
        .unwrap();

    assert_eq!(container.parameter("io.root"), Some(&Value::from("var")));
    assert_eq!(container.resources().len(), 2);
}
