// Domain layer modules
pub mod question;
pub mod question_id;
pub mod upsert_command;

// Re-exports
pub use question::{is_blank, Question, QuestionFields, QuestionUpdate, VoteCounts};
pub use question_id::QuestionId;
pub use upsert_command::UpsertCommand;
