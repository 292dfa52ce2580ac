//! Utility functions shared by the parser.
//!
//! - [`quote`] - Unescaping of quoted literals
//!
//! ```
//! use yql::utils::unquote;
//!
//! assert_eq!(unquote("\"hello world\"").as_deref(), Some("hello world"));
//! assert_eq!(unquote("plain"), None);
//! ```

pub mod quote;

pub use quote::*;
