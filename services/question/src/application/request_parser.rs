/// HTTPリクエストパーサー
///
/// HTTPメソッドとJSONボディをupsertコマンドに変換する。
/// POSTは作成、PUTは更新、OPTIONSはCORSプリフライトとして扱う。
use lambda_http::http::Method;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{QuestionFields, QuestionId, UpsertCommand, VoteCounts, is_blank};

/// パース結果
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertRequest {
    /// CORSプリフライト（ストアは呼び出さない）
    Preflight,
    /// upsert実行
    Upsert(UpsertCommand),
}

/// リクエストパースエラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    /// ボディがJSONとして不正、または型が合わない
    #[error("failed to parse JSON body: {0}")]
    MalformedJson(String),

    /// 更新に必要なフィールドが不足
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// 対応していないHTTPメソッド
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}

/// リクエストボディの形
///
/// 全フィールド任意。nullは未指定と同じ扱い、未知のフィールドは無視する。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionPayload {
    id: Option<String>,
    category_slug: Option<String>,
    question_slug: Option<String>,
    question: Option<String>,
    negative_votes: Option<i64>,
    positive_votes: Option<i64>,
}

impl QuestionPayload {
    fn fields(&mut self) -> QuestionFields {
        QuestionFields::from_optional(
            self.category_slug.take(),
            self.question_slug.take(),
            self.question.take(),
        )
    }
}

/// HTTPリクエストパーサー
pub struct RequestParser;

impl RequestParser {
    /// HTTPメソッドとボディをパース
    ///
    /// # 例
    /// ```
    /// use lambda_http::http::Method;
    /// use question::application::{RequestParser, UpsertRequest};
    ///
    /// let result = RequestParser::parse(&Method::POST, br#"{"question":"Q"}"#);
    /// assert!(matches!(result, Ok(UpsertRequest::Upsert(_))));
    /// ```
    pub fn parse(method: &Method, body: &[u8]) -> Result<UpsertRequest, ParseError> {
        match *method {
            Method::POST => Self::parse_create(body).map(UpsertRequest::Upsert),
            Method::PUT => Self::parse_update(body).map(UpsertRequest::Upsert),
            Method::OPTIONS => Ok(UpsertRequest::Preflight),
            ref other => Err(ParseError::UnsupportedMethod(other.to_string())),
        }
    }

    fn parse_payload(body: &[u8]) -> Result<QuestionPayload, ParseError> {
        serde_json::from_slice(body).map_err(|e| ParseError::MalformedJson(e.to_string()))
    }

    /// 作成: id・投票数は読まない
    fn parse_create(body: &[u8]) -> Result<UpsertCommand, ParseError> {
        let mut payload = Self::parse_payload(body)?;

        Ok(UpsertCommand::Create {
            fields: payload.fields(),
        })
    }

    /// 更新: id・投票数は必須
    fn parse_update(body: &[u8]) -> Result<UpsertCommand, ParseError> {
        let mut payload = Self::parse_payload(body)?;

        let id = payload
            .id
            .take()
            .filter(|id| !is_blank(id))
            .ok_or(ParseError::MissingField("id"))?;
        let negative = payload
            .negative_votes
            .ok_or(ParseError::MissingField("negativeVotes"))?;
        let positive = payload
            .positive_votes
            .ok_or(ParseError::MissingField("positiveVotes"))?;

        Ok(UpsertCommand::Update {
            id: QuestionId::new(id),
            fields: payload.fields(),
            votes: VoteCounts::new(negative, positive),
        })
    }
}
