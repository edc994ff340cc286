/// Question upsertハンドラー
///
/// HTTPリクエストをupsertコマンドに変換し、書き込むフィールドセットを組み立てて
/// リポジトリに1回だけ書き込み、更新後のレコードをレスポンスとして返す。
/// エラーはリトライも分類もせず、そのまま呼び出し元に返す。
use lambda_http::http::Method;
use lambda_http::{Body, Response};
use thiserror::Error;
use tracing::{debug, info};

use crate::application::request_parser::{ParseError, RequestParser, UpsertRequest};
use crate::application::response_builder::{ResponseBuilder, ResponseError};
use crate::domain::{Question, QuestionId, UpsertCommand};
use crate::infrastructure::{QuestionRepository, RepositoryError};

/// upsertハンドラーのエラー型
#[derive(Debug, Error)]
pub enum UpsertHandlerError {
    /// リクエストが不正（ストア呼び出し前に失敗）
    #[error("Invalid request: {0}")]
    Parse(#[from] ParseError),

    /// ストア操作エラー
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// レスポンス生成エラー
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
}

/// Question upsertハンドラー
pub struct UpsertHandler<QR>
where
    QR: QuestionRepository,
{
    /// Questionリポジトリ
    question_repo: QR,
}

impl<QR> UpsertHandler<QR>
where
    QR: QuestionRepository,
{
    /// 新しいUpsertHandlerを作成
    pub fn new(question_repo: QR) -> Self {
        Self { question_repo }
    }

    /// upsertコマンドを実行
    ///
    /// # 処理フロー
    /// 1. デフォルト値のフィールドセットにリクエスト値を反映（パース時に済み）
    /// 2. 作成ならIDを生成し投票数を0に、更新なら指定IDと投票数を使用
    /// 3. リポジトリに書き込み、書き込み後のレコードを返却
    pub async fn handle(&self, command: UpsertCommand) -> Result<Question, UpsertHandlerError> {
        let mode = command.mode();
        let update = command.into_update(QuestionId::generate);

        debug!(mode = mode, question_id = update.id.as_str(), "フィールドセット構築");

        let question = self.question_repo.upsert(&update).await?;

        info!(mode = mode, question_id = question.id.as_str(), "upsert完了");

        Ok(question)
    }

    /// HTTPリクエストを処理してレスポンスを生成
    ///
    /// # 引数
    /// * `method` - HTTPメソッド（POST: 作成、PUT: 更新、OPTIONS: プリフライト）
    /// * `body` - JSONボディ
    pub async fn handle_request(
        &self,
        method: &Method,
        body: &[u8],
    ) -> Result<Response<Body>, UpsertHandlerError> {
        match RequestParser::parse(method, body)? {
            UpsertRequest::Preflight => Ok(ResponseBuilder::preflight()?),
            UpsertRequest::Upsert(command) => {
                let question = self.handle(command).await?;
                Ok(ResponseBuilder::ok(&question)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QuestionFields, VoteCounts};
    use crate::infrastructure::logging::init_test_logging;
    use crate::infrastructure::question_repository::tests::MockQuestionRepository;

    // ==================== テストヘルパー ====================

    fn create_test_handler() -> (UpsertHandler<MockQuestionRepository>, MockQuestionRepository) {
        init_test_logging();
        let question_repo = MockQuestionRepository::new();
        let handler = UpsertHandler::new(question_repo.clone());
        (handler, question_repo)
    }

    fn body_text(response: &Response<Body>) -> String {
        match response.body() {
            Body::Text(text) => text.clone(),
            Body::Binary(bytes) => String::from_utf8(bytes.clone()).unwrap(),
            Body::Empty => String::new(),
            _ => panic!("予期しないBody型"),
        }
    }

    async fn request(
        handler: &UpsertHandler<MockQuestionRepository>,
        method: Method,
        body: &str,
    ) -> Result<Question, UpsertHandlerError> {
        let response = handler.handle_request(&method, body.as_bytes()).await?;
        assert_eq!(response.status(), 200);
        Ok(serde_json::from_str(&body_text(&response)).unwrap())
    }

    fn is_generated_id(id: &str) -> bool {
        id.len() == 32 && id.chars().all(|c| c.is_ascii_hexdigit()) && !id.contains('-')
    }

    // ==================== 作成 ====================

    #[tokio::test]
    async fn test_create_scenario() {
        let (handler, question_repo) = create_test_handler();

        let question = request(
            &handler,
            Method::POST,
            r#"{"question":"What is 2+2?","categorySlug":"math","questionSlug":"two-plus-two"}"#,
        )
        .await
        .unwrap();

        assert!(is_generated_id(&question.id));
        assert_eq!(question.question, "What is 2+2?");
        assert_eq!(question.category_slug, "math");
        assert_eq!(question.question_slug, "two-plus-two");
        assert_eq!(question.negative_votes, 0);
        assert_eq!(question.positive_votes, 0);

        assert_eq!(question_repo.get_question(&question.id), Some(question));
        assert_eq!(question_repo.call_count(), 1);
    }

    /// 作成時はペイロードの投票数を読まない
    #[tokio::test]
    async fn test_create_ignores_payload_votes() {
        let (handler, _) = create_test_handler();

        let question = request(
            &handler,
            Method::POST,
            r#"{"question":"Q","negativeVotes":5,"positiveVotes":8}"#,
        )
        .await
        .unwrap();

        assert_eq!(question.negative_votes, 0);
        assert_eq!(question.positive_votes, 0);
    }

    /// 作成時はペイロードのidを使わず新しいIDを生成する
    #[tokio::test]
    async fn test_create_generates_fresh_id() {
        let (handler, question_repo) = create_test_handler();

        let first = request(&handler, Method::POST, r#"{"id":"caller-id","question":"Q"}"#)
            .await
            .unwrap();
        let second = request(&handler, Method::POST, r#"{"question":"Q"}"#)
            .await
            .unwrap();

        assert_ne!(first.id, "caller-id");
        assert_ne!(first.id, second.id);
        assert!(is_generated_id(&first.id));
        assert!(is_generated_id(&second.id));
        assert!(question_repo.get_question("caller-id").is_none());
    }

    /// 空白のみの質問文は空文字列として保存される
    #[tokio::test]
    async fn test_create_blank_question() {
        let (handler, _) = create_test_handler();

        let question = request(&handler, Method::POST, r#"{"question":"   "}"#)
            .await
            .unwrap();

        assert_eq!(question.question, "");
        assert_eq!(question.category_slug, "");
        assert_eq!(question.question_slug, "");
    }

    /// 空白以外を含む値はtrimせずに保存される
    #[tokio::test]
    async fn test_create_keeps_untrimmed_value() {
        let (handler, _) = create_test_handler();

        let question = request(&handler, Method::POST, r#"{"question":"  Why?  "}"#)
            .await
            .unwrap();

        assert_eq!(question.question, "  Why?  ");
    }

    // ==================== 更新 ====================

    #[tokio::test]
    async fn test_update_scenario() {
        let (handler, question_repo) = create_test_handler();

        let question = request(
            &handler,
            Method::PUT,
            r#"{"id":"abc123","question":"Updated?","negativeVotes":3,"positiveVotes":10}"#,
        )
        .await
        .unwrap();

        assert_eq!(question.id, "abc123");
        assert_eq!(question.question, "Updated?");
        assert_eq!(question.negative_votes, 3);
        assert_eq!(question.positive_votes, 10);
        assert_eq!(question_repo.get_question("abc123"), Some(question));
    }

    /// 更新は既存値を上書きし、未指定のテキストは空文字列になる
    #[tokio::test]
    async fn test_update_overwrites_existing_record() {
        let (handler, question_repo) = create_test_handler();
        question_repo.insert_question(Question {
            id: "abc123".to_string(),
            category_slug: "math".to_string(),
            question_slug: "two-plus-two".to_string(),
            question: "What is 2+2?".to_string(),
            negative_votes: 1,
            positive_votes: 2,
        });

        let question = request(
            &handler,
            Method::PUT,
            r#"{"id":"abc123","question":"Updated?","negativeVotes":3,"positiveVotes":10}"#,
        )
        .await
        .unwrap();

        assert_eq!(question.category_slug, "");
        assert_eq!(question.question_slug, "");
        assert_eq!(question.negative_votes, 3);
        assert_eq!(question.positive_votes, 10);
    }

    /// 同じ更新を2回実行しても同じ結果になる
    #[tokio::test]
    async fn test_update_is_idempotent() {
        let (handler, question_repo) = create_test_handler();
        let body = r#"{"id":"abc123","categorySlug":"math","negativeVotes":3,"positiveVotes":10}"#;

        let first = request(&handler, Method::PUT, body).await.unwrap();
        let stored_after_first = question_repo.get_question("abc123");
        let second = request(&handler, Method::PUT, body).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(stored_after_first, question_repo.get_question("abc123"));
    }

    /// 更新のIDはそのまま使われる（trimや変換をしない）
    #[tokio::test]
    async fn test_update_keeps_id_verbatim() {
        let (handler, _) = create_test_handler();

        let question = handler
            .handle(UpsertCommand::Update {
                id: QuestionId::new("Mixed-Case-ID"),
                fields: QuestionFields::default(),
                votes: VoteCounts::new(0, 0),
            })
            .await
            .unwrap();

        assert_eq!(question.id, "Mixed-Case-ID");
    }

    // ==================== エラー ====================

    /// 不正なJSONはストア呼び出し前に失敗する
    #[tokio::test]
    async fn test_malformed_body_fails_before_store() {
        let (handler, question_repo) = create_test_handler();

        let result = handler.handle_request(&Method::POST, b"{not json").await;

        assert!(matches!(
            result,
            Err(UpsertHandlerError::Parse(ParseError::MalformedJson(_)))
        ));
        assert_eq!(question_repo.call_count(), 0);
    }

    #[tokio::test]
    async fn test_update_without_id_fails_before_store() {
        let (handler, question_repo) = create_test_handler();

        let result = handler
            .handle_request(&Method::PUT, br#"{"negativeVotes":1,"positiveVotes":1}"#)
            .await;

        assert!(matches!(
            result,
            Err(UpsertHandlerError::Parse(ParseError::MissingField("id")))
        ));
        assert_eq!(question_repo.call_count(), 0);
    }

    /// ストアのエラーはそのまま返される（リトライしない）
    #[tokio::test]
    async fn test_repository_error_is_propagated() {
        let (handler, question_repo) = create_test_handler();
        question_repo.set_next_error(RepositoryError::WriteError(
            "ProvisionedThroughputExceededException".to_string(),
        ));

        let result = handler
            .handle_request(&Method::POST, br#"{"question":"Q"}"#)
            .await;

        match result {
            Err(UpsertHandlerError::Repository(err)) => assert_eq!(
                err,
                RepositoryError::WriteError("ProvisionedThroughputExceededException".to_string())
            ),
            other => panic!("Repositoryエラーになるべき: {:?}", other.map(|r| r.status())),
        }
        assert_eq!(question_repo.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let (handler, question_repo) = create_test_handler();

        let result = handler.handle_request(&Method::GET, b"").await;

        assert!(matches!(
            result,
            Err(UpsertHandlerError::Parse(ParseError::UnsupportedMethod(_)))
        ));
        assert_eq!(question_repo.call_count(), 0);
    }

    // ==================== レスポンス ====================

    #[tokio::test]
    async fn test_response_has_fixed_headers() {
        let (handler, _) = create_test_handler();

        let response = handler
            .handle_request(&Method::POST, br#"{"question":"Q"}"#)
            .await
            .unwrap();

        assert_eq!(response.headers(), &ResponseBuilder::build_headers());
    }

    #[tokio::test]
    async fn test_preflight_does_not_call_store() {
        let (handler, question_repo) = create_test_handler();

        let response = handler.handle_request(&Method::OPTIONS, b"").await.unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(body_text(&response), "");
        assert_eq!(question_repo.call_count(), 0);
    }

    #[test]
    fn test_error_display() {
        let error = UpsertHandlerError::from(ParseError::MissingField("id"));
        assert_eq!(error.to_string(), "Invalid request: missing required field: id");

        let error = UpsertHandlerError::from(RepositoryError::WriteError("timeout".to_string()));
        assert_eq!(error.to_string(), "Repository error: Write error: timeout");
    }
}
