pub mod prelude;

pub mod definitions;
pub mod saved_definitions;
pub mod saved_words;
pub mod settings;
pub mod users;
pub mod words;
