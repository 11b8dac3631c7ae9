//! Storage layer: atomic files and secret stores.

mod atomic_toml;
mod keyring_store;
mod memory_store;

pub use atomic_toml::AtomicTomlFile;
pub use keyring_store::KeyringSecretStore;
pub use memory_store::MemorySecretStore;
