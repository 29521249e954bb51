//! Common utilities and shared types for dzretour.
//!
//! This crate provides foundational components used across all dzretour crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Phone normalization**: Canonical Algerian mobile format via [`phone`]
//! - **Phone hashing**: Salted, non-reversible lookup keys via [`PhoneHasher`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//!
//! # Example
//!
//! ```
//! use dzretour_common::{phone, AppResult, PhoneHasher};
//!
//! fn example() -> AppResult<()> {
//!     let normalized = phone::normalize_and_validate("+213 550 12 34 56")?;
//!     assert_eq!(normalized, "0550123456");
//!
//!     let hasher = PhoneHasher::new("secret-salt");
//!     let key = hasher.hash(&normalized);
//!     assert_eq!(key.len(), 64);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod hashing;
pub mod id;
pub mod phone;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use hashing::PhoneHasher;
pub use id::IdGenerator;
