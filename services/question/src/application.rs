// アプリケーション層モジュール
pub mod request_parser;
pub mod response_builder;
pub mod upsert_handler;

// 再エクスポート
pub use request_parser::{ParseError, RequestParser, UpsertRequest};
pub use response_builder::{ResponseBuilder, ResponseError};
pub use upsert_handler::{UpsertHandler, UpsertHandlerError};
