pub mod error;
pub mod listing;
pub mod tree;

pub use error::TreeError;
pub use listing::{parse_listing, render_listing};
pub use tree::{NodeId, Tree};
