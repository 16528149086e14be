pub mod normalize;
pub mod sync;
pub mod token_store;

pub use sync::{SyncError, SyncService};
pub use token_store::TokenStore;
