pub mod definition_repository;
pub mod saved_definition_repository;
pub mod saved_word_repository;
pub mod settings_repository;
pub mod user_repository;
pub mod word_repository;

pub use definition_repository::DefinitionRepository;
pub use saved_definition_repository::SavedDefinitionRepository;
pub use saved_word_repository::SavedWordRepository;
pub use settings_repository::SettingsRepository;
pub use user_repository::UserRepository;
pub use word_repository::WordRepository;
