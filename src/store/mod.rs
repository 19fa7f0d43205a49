pub mod root;
pub mod slice;
pub mod state;

pub use root::AdminStore;
pub use slice::EntitySlice;
pub use state::{Action, EntityState, Operation};
