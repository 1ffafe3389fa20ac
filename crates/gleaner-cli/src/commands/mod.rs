//! Command implementations.

pub mod accounts;
pub mod config;
pub mod extract;
pub mod send;
pub mod templates;

pub use self::accounts::execute_accounts;
pub use self::config::execute_config;
pub use self::extract::execute_extract;
pub use self::send::execute_send;
pub use self::templates::execute_templates;
