//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it re-exports the domain models and the layered config loader.
//!
//! ## Config loading
//! ```rust,no_run
//! use skyline_kernel::config::load_config;
//! use skyline_kernel::domain::config::AppConfig;
//!
//! let cfg: AppConfig = load_config(Some("skyline")).unwrap_or_default();
//! ```

pub mod config;

pub use skyline_domain as domain;
