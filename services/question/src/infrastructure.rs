// Infrastructure layer modules
pub mod config;
pub mod logging;
pub mod question_repository;

// Re-exports
pub use config::{DynamoDbConfig, DynamoDbConfigError};
pub use logging::init_logging;
pub use question_repository::{DynamoQuestionRepository, QuestionRepository, RepositoryError};
