pub mod file;
pub mod interface;
pub mod memory;

use crate::config::{Config, StorageMode};

pub fn make_storage(config: &Config) -> Box<dyn interface::SessionStorage> {
    match config.session_storage {
        StorageMode::File => {
            ::log::info!("Session stored in {}", config.session_file);
            Box::new(file::FileStorage::new(&config.session_file))
        }
        StorageMode::Memory => {
            ::log::info!("Session kept in memory only");
            Box::new(memory::MemoryStorage::new())
        }
    }
}
