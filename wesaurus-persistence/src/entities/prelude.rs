pub use super::definitions::Entity as Definitions;
pub use super::saved_definitions::Entity as SavedDefinitions;
pub use super::saved_words::Entity as SavedWords;
pub use super::settings::Entity as Settings;
pub use super::users::Entity as Users;
pub use super::words::Entity as Words;
