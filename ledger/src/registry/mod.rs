//! Small append-mostly registries persisted next to the scene metadata.
//!
//! Each registry is loaded fresh for the operation that needs it and saved
//! through the atomic store; nothing is cached across operations.

pub mod categories;
pub mod sub_projects;
pub mod users;

pub use categories::{CategoryRegistry, DEFAULT_CATEGORIES};
pub use sub_projects::{NO_SUB_PROJECT, SubProjectIndex};
pub use users::UserRegistry;
