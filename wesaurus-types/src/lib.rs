pub mod collection;
pub mod definition;
pub mod errors;
pub mod user;
pub mod word;

// Re-export all types
pub use collection::*;
pub use definition::*;
pub use errors::*;
pub use user::*;
pub use word::*;
