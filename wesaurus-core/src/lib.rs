pub mod policy;
pub mod sanitize;
pub mod validation;

// Re-export main components
pub use policy::*;
pub use sanitize::*;
pub use validation::*;
