pub mod entity;
pub mod engine;
pub mod vulnerability;
pub mod rule;
pub mod snippet;
pub mod snippet_matched_rules;

pub use entity::Entity;
pub use engine::Engine;
pub use vulnerability::Vulnerability;
pub use rule::Rule;
pub use snippet::{content_hash, Classification, Snippet};
pub use snippet_matched_rules::SnippetMatchedRules;
