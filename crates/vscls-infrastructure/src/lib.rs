pub mod collaboration;
pub mod config_service;
pub mod paths;
pub mod pocketbase;
pub mod state_repository;
pub mod storage;

pub use crate::collaboration::{CommandClipboard, CommandCollaboration};
pub use crate::config_service::ConfigService;
pub use crate::pocketbase::PocketBaseClient;
pub use crate::state_repository::StateRepository;
pub use crate::storage::{KeyringSecretStore, MemorySecretStore};
