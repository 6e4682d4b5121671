pub mod user_repo;
pub use user_repo::UserRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod store;
pub use store::{InventoryStore, PgInventoryStore};

#[cfg(test)]
pub mod memory_store;
#[cfg(test)]
pub mod test_support;
