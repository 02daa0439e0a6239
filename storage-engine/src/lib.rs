pub mod factory;
pub mod moka_cache;

pub use factory::MokaStoreFactory;
pub use moka_cache::MokaStore;
