pub mod types;

pub use types::{AdminError, Problem};
