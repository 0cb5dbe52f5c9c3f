pub mod contact_me;
pub mod memory;
pub mod notifier;
pub mod sqlx_repo;
