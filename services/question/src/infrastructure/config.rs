/// DynamoDB接続設定
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;

/// テーブル名の環境変数
pub const QUESTION_TABLE_ENV: &str = "QUESTION_TABLE";

/// DynamoDBエンドポイント上書き用の環境変数（DynamoDB Local等）
pub const ENDPOINT_URL_ENV: &str = "DYNAMODB_ENDPOINT_URL";

/// テーブル名が未設定の場合のデフォルト
pub const DEFAULT_QUESTION_TABLE: &str = "Question";

/// DynamoDB設定のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DynamoDbConfigError {
    #[error("Environment variable is set but empty: {0}")]
    EmptyEnvVar(String),
}

/// クライアントとテーブル名を持つDynamoDB設定
///
/// 環境変数:
/// - QUESTION_TABLE: Question保存用テーブル（未設定時は`Question`）
/// - DYNAMODB_ENDPOINT_URL: エンドポイントの上書き（任意）
#[derive(Debug, Clone)]
pub struct DynamoDbConfig {
    /// DynamoDBクライアントインスタンス
    client: DynamoDbClient,
    /// Questionテーブル名
    question_table: String,
}

impl DynamoDbConfig {
    /// 環境からAWS設定とテーブル名を読み込んで新しいDynamoDbConfigを作成
    ///
    /// AWS認証情報とリージョンはaws-configにより自動読み込みされる。
    pub async fn from_env() -> Result<Self, DynamoDbConfigError> {
        let question_table = resolve_table_name(std::env::var(QUESTION_TABLE_ENV).ok())?;
        let endpoint_url = resolve_endpoint_url(std::env::var(ENDPOINT_URL_ENV).ok());

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(url) = endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let aws_config = loader.load().await;

        let client = DynamoDbClient::new(&aws_config);

        Ok(Self {
            client,
            question_table,
        })
    }

    /// 明示的な値で新しいDynamoDbConfigを作成（テスト用）
    pub fn new(client: DynamoDbClient, question_table: String) -> Self {
        Self {
            client,
            question_table,
        }
    }

    /// DynamoDBクライアントへの参照を取得
    pub fn client(&self) -> &DynamoDbClient {
        &self.client
    }

    /// Questionテーブル名を取得
    pub fn question_table(&self) -> &str {
        &self.question_table
    }
}

/// 未設定ならデフォルト、空文字列ならエラー
fn resolve_table_name(value: Option<String>) -> Result<String, DynamoDbConfigError> {
    match value {
        None => Ok(DEFAULT_QUESTION_TABLE.to_string()),
        Some(v) if v.trim().is_empty() => {
            Err(DynamoDbConfigError::EmptyEnvVar(QUESTION_TABLE_ENV.to_string()))
        }
        Some(v) => Ok(v),
    }
}

/// 空文字列は未設定として扱う
fn resolve_endpoint_url(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
