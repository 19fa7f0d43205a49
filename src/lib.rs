//! Administration client for the Snipptor snippet scanning service.
//!
//! [`store::AdminStore`] keeps one [`store::EntitySlice`] per record type
//! (engines, vulnerabilities, rules, snippets and the read-only
//! snippet/rule matches). Each slice drives a typed REST resource and folds
//! the responses into list/detail/status state. [`forms`] adds the editor
//! workflows that resolve cross-record selections before saving, and
//! [`cli`] exposes all of it on the command line.

pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod forms;
pub mod models;
pub mod store;
