use crate::bootstrap::register_cache_driver;
use crate::compiler::{kernel_passes, CompilerPass};
use crate::config::BootstrapConfig;
use crate::container::{ContainerBuilder, Resource};
use crate::errors::CoreError;
use crate::loader::{FileLocator, YamlFileLoader};
use std::path::{Path, PathBuf};

/// Settings directory, relative to the install directory
pub const SETTINGS_DIR: &str = "eZ/Publish/Core/settings";

/// Parameter holding the install directory
pub const ROOT_DIR_PARAMETER: &str = "ezpublish.kernel.root_dir";

/// Configuration documents in load order; later documents override earlier ones
pub const CONFIGURATION_DOCUMENTS: [&str; 18] = [
    "fieldtype_external_storages.yml",
    "fieldtype_services.yml",
    "fieldtypes.yml",
    "indexable_fieldtypes.yml",
    "io.yml",
    "repository.yml",
    "repository/inner.yml",
    "repository/signalslot.yml",
    "roles.yml",
    "storage_engines/common.yml",
    "storage_engines/cache.yml",
    "storage_engines/legacy.yml",
    "storage_engines/shortcuts.yml",
    "search_engines/common.yml",
    "settings.yml",
    "utils.yml",
    "tests/common.yml",
    "tests/integration_legacy_core.yml",
];

/// Directory the configuration documents are loaded from
pub fn settings_path(install_dir: &Path) -> PathBuf {
    install_dir.join(SETTINGS_DIR)
}

/// Assembles the kernel service container.
///
/// The result is not compiled: registered passes run on
/// [`ContainerBuilder::compile`].
pub struct ContainerAssembler {
    documents: Vec<String>,
    passes: fn() -> Vec<Box<dyn CompilerPass>>,
}

impl Default for ContainerAssembler {
    fn default() -> Self {
        Self {
            documents: CONFIGURATION_DOCUMENTS.iter().map(|name| name.to_string()).collect(),
            passes: kernel_passes,
        }
    }
}

impl ContainerAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list of configuration documents
    pub fn with_documents<I, S>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.documents = documents.into_iter().map(Into::into).collect();
        self
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn assemble(&self, install_dir: impl AsRef<Path>, config: &BootstrapConfig) -> Result<ContainerBuilder, CoreError> {
        let install_dir = install_dir.as_ref();
        if install_dir.as_os_str().is_empty() {
            return Err(CoreError::MissingInstallDir);
        }

        let mut container = ContainerBuilder::new();
        container.add_resource(Resource::this_code());

        register_cache_driver(&mut container, config);

        let settings = settings_path(install_dir);
        {
            let mut loader = YamlFileLoader::new(&mut container, FileLocator::new(&settings));
            for document in &self.documents {
                loader.load(document)?;
            }
        }
        tracing::info!(
            "Loaded {} configuration documents from {}",
            self.documents.len(),
            settings.display()
        );

        container.set_parameter(ROOT_DIR_PARAMETER, install_dir.to_string_lossy().into_owned());

        for pass in (self.passes)() {
            container.add_boxed_compiler_pass(pass);
        }

        Ok(container)
    }
}

/// Assemble the kernel container with the standard documents and passes
pub fn assemble(install_dir: impl AsRef<Path>, config: &BootstrapConfig) -> Result<ContainerBuilder, CoreError> {
    ContainerAssembler::default().assemble(install_dir, config)
}
