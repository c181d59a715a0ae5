//! Data directory initialization.

use licensor_core::config::{AppConfig, StorageBackend};
use licensor_core::error::AppError;
use licensor_database::initialize_data_dir;

use crate::output;

/// Execute the init command
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    if config.storage.backend == StorageBackend::Memory {
        output::print_warning("Storage backend is 'memory'; nothing to initialize");
        return Ok(());
    }

    let dir = &config.storage.data_dir;
    let created = initialize_data_dir(dir).await?;
    if created.is_empty() {
        output::print_success(&format!("Data directory {} already initialized", dir.display()));
    } else {
        for path in &created {
            output::print_kv("created", &path.display().to_string());
        }
        output::print_success(&format!("Initialized {}", dir.display()));
    }
    Ok(())
}
