use kernel_core::bootstrap::SETTINGS_DIR;
use kernel_core::CONFIGURATION_DOCUMENTS;

pub fn run() {
    println!("Configuration documents (relative to <install-dir>/{}):", SETTINGS_DIR);
    for (position, document) in CONFIGURATION_DOCUMENTS.iter().enumerate() {
        println!("{:>2}. {}", position + 1, document);
    }
}
