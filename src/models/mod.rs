pub mod local_store;
pub mod profile;
pub mod settings;
pub mod strategy;
