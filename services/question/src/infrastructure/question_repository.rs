/// DynamoDBでQuestionレコードをupsertするリポジトリ
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use thiserror::Error;
use tracing::debug;

use crate::domain::{Question, QuestionUpdate};

/// リポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    /// DynamoDBへの書き込みに失敗（検証エラー、スロットリング、接続失敗を含む）
    #[error("Write error: {0}")]
    WriteError(String),

    /// DynamoDBの応答をQuestionとして読み取れない
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Question永続化用トレイト
///
/// 実際のDynamoDBとテスト用モックを差し替えられるように抽象化する。
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// キー`update.id`の5属性を書き込み、書き込み後のレコード全体を返す
    ///
    /// キーが存在しなければ新規作成される。存在確認は行わない。
    async fn upsert(&self, update: &QuestionUpdate) -> Result<Question, RepositoryError>;
}

// DynamoDB属性名
const ATTR_ID: &str = "id";
const ATTR_CATEGORY_SLUG: &str = "categorySlug";
const ATTR_QUESTION_SLUG: &str = "questionSlug";
const ATTR_QUESTION: &str = "question";
const ATTR_NEGATIVE_VOTES: &str = "negativeVotes";
const ATTR_POSITIVE_VOTES: &str = "positiveVotes";

/// 5属性すべてを上書きする更新式
const UPDATE_EXPRESSION: &str = "set #cs = :cs, #qs = :qs, #q = :q, #nv = :nv, #pv = :pv";

/// QuestionRepositoryのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoQuestionRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// Questionテーブル名
    table_name: String,
}

impl DynamoQuestionRepository {
    /// 新しいDynamoQuestionRepositoryを作成
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// 更新式のプレースホルダーと属性名の対応
    fn expression_attribute_names() -> HashMap<String, String> {
        [
            ("#cs", ATTR_CATEGORY_SLUG),
            ("#qs", ATTR_QUESTION_SLUG),
            ("#q", ATTR_QUESTION),
            ("#nv", ATTR_NEGATIVE_VOTES),
            ("#pv", ATTR_POSITIVE_VOTES),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    /// 更新式のプレースホルダーと書き込む値の対応
    fn expression_attribute_values(update: &QuestionUpdate) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (
                ":cs".to_string(),
                AttributeValue::S(update.fields.category_slug.clone()),
            ),
            (
                ":qs".to_string(),
                AttributeValue::S(update.fields.question_slug.clone()),
            ),
            (
                ":q".to_string(),
                AttributeValue::S(update.fields.question.clone()),
            ),
            (
                ":nv".to_string(),
                AttributeValue::N(update.votes.negative.to_string()),
            ),
            (
                ":pv".to_string(),
                AttributeValue::N(update.votes.positive.to_string()),
            ),
        ])
    }

    /// ALL_NEWで返されたアイテムをQuestionに変換
    fn item_to_question(item: &HashMap<String, AttributeValue>) -> Result<Question, RepositoryError> {
        Ok(Question {
            id: string_attr(item, ATTR_ID)?,
            category_slug: string_attr(item, ATTR_CATEGORY_SLUG)?,
            question_slug: string_attr(item, ATTR_QUESTION_SLUG)?,
            question: string_attr(item, ATTR_QUESTION)?,
            negative_votes: number_attr(item, ATTR_NEGATIVE_VOTES)?,
            positive_votes: number_attr(item, ATTR_POSITIVE_VOTES)?,
        })
    }
}

fn string_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String, RepositoryError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| RepositoryError::SerializationError(format!("Missing {} field", name)))
}

fn number_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Result<i64, RepositoryError> {
    item.get(name)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse::<i64>().ok())
        .ok_or_else(|| RepositoryError::SerializationError(format!("Missing {} field", name)))
}

#[async_trait]
impl QuestionRepository for DynamoQuestionRepository {
    async fn upsert(&self, update: &QuestionUpdate) -> Result<Question, RepositoryError> {
        debug!(
            question_id = update.id.as_str(),
            table = self.table_name.as_str(),
            "UpdateItem実行"
        );

        let output = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(ATTR_ID, AttributeValue::S(update.id.as_str().to_string()))
            .update_expression(UPDATE_EXPRESSION)
            .set_expression_attribute_names(Some(Self::expression_attribute_names()))
            .set_expression_attribute_values(Some(Self::expression_attribute_values(update)))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| RepositoryError::WriteError(DisplayErrorContext(&e).to_string()))?;

        let item = output.attributes().ok_or_else(|| {
            RepositoryError::SerializationError("UpdateItem returned no attributes".to_string())
        })?;

        Self::item_to_question(item)
    }
}
