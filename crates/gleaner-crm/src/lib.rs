//! Gleaner CRM bridge
//!
//! Client for the external CRM webhook: one endpoint that lists accounts on
//! `GET` and accepts extraction results on `POST`.
//!
//! Both calls are single requests with no retry.
//!
//! # Example
//!
//! ```no_run
//! use gleaner_crm::CrmClient;
//!
//! # async fn example() {
//! let client = CrmClient::new("https://crm.example.com/webhook/accounts");
//! for account in client.fetch_accounts().await {
//!     println!("{} {}", account.id, account.name);
//! }
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod error;

pub use client::{CrmClient, DEFAULT_TIMEOUT_SECS};
pub use error::CrmError;
