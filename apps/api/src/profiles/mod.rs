// Master profiles: data model, validation, JSON file store and HTTP handlers.

pub mod handlers;
pub mod models;
pub mod store;
pub mod validation;

pub use store::ProfileStore;
