pub mod blob;
pub mod file;
pub mod token;

pub use blob::*;
pub use file::*;
pub use token::*;
