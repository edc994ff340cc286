/// Question upsert HTTP Lambdaエントリポイント
///
/// API Gateway経由のHTTPリクエストを処理し、QuestionレコードをDynamoDBにupsertする。
/// POSTは作成、PUTは更新。失敗時はエラーをそのまま返し、Lambda基盤のエラー応答に任せる。
use lambda_http::{Body, Error, Request, Response, run, service_fn};
use question::application::UpsertHandler;
use question::infrastructure::{
    DynamoDbConfig, DynamoDbConfigError, DynamoQuestionRepository, init_logging,
};
use tokio::sync::OnceCell;
use tracing::{error, info};

/// UpsertHandlerの静的インスタンス
///
/// Lambda warm start時にDynamoDBクライアントを再利用するため、
/// 一度初期化したハンドラーを静的に保持する。
static UPSERT_HANDLER: OnceCell<UpsertHandler<DynamoQuestionRepository>> = OnceCell::const_new();

/// UpsertHandlerを取得（初期化されていなければ初期化）
async fn get_upsert_handler()
-> Result<&'static UpsertHandler<DynamoQuestionRepository>, DynamoDbConfigError> {
    UPSERT_HANDLER
        .get_or_try_init(|| async {
            let config = DynamoDbConfig::from_env().await?;

            info!(table = config.question_table(), "DynamoDBクライアントを初期化");

            let question_repo = DynamoQuestionRepository::new(
                config.client().clone(),
                config.question_table().to_string(),
            );
            Ok(UpsertHandler::new(question_repo))
        })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    info!("Question upsert Lambda関数を初期化");

    run(service_fn(handler)).await
}

/// HTTPリクエストハンドラー
///
/// # 処理フロー
/// 1. 静的なUpsertHandlerを取得（初回のみDynamoDB設定を読み込み）
/// 2. メソッドとボディからupsertを実行
/// 3. 成功時は200と更新後レコード、失敗時はエラーを返却
async fn handler(request: Request) -> Result<Response<Body>, Error> {
    let method = request.method().clone();

    info!(method = %method, "upsertリクエスト受信");

    let upsert_handler = match get_upsert_handler().await {
        Ok(upsert_handler) => upsert_handler,
        Err(err) => {
            error!(error = %err, "DynamoDB設定の読み込みに失敗");
            return Err(err.into());
        }
    };

    match upsert_handler.handle_request(&method, request.body()).await {
        Ok(response) => Ok(response),
        Err(err) => {
            error!(method = %method, error = %err, "upsert失敗");
            Err(err.into())
        }
    }
}
