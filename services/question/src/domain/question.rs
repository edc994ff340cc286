/// Questionレコードと書き込みフィールドセット
///
/// DynamoDBの`Question`テーブルに保存されるレコードの型と、
/// upsert時に書き込む5属性（カテゴリスラッグ、質問スラッグ、質問文、投票数2種）を定義する。
use serde::{Deserialize, Serialize};

use super::QuestionId;

/// 保存済みのQuestionレコード
///
/// JSON・DynamoDBともにcamelCaseの属性名を使用する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub category_slug: String,
    pub question_slug: String,
    pub question: String,
    pub negative_votes: i64,
    pub positive_votes: i64,
}

/// 作成・更新の両方で書き込まれるテキストフィールド
///
/// 未指定または空白のみの値は空文字列として扱う。
/// 空白判定にのみtrimを使い、保存する値自体はtrimしない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFields {
    pub category_slug: String,
    pub question_slug: String,
    pub question: String,
}

impl QuestionFields {
    /// リクエスト値からフィールドセットを構築
    pub fn from_optional(
        category_slug: Option<String>,
        question_slug: Option<String>,
        question: Option<String>,
    ) -> Self {
        Self {
            category_slug: non_blank_or_default(category_slug),
            question_slug: non_blank_or_default(question_slug),
            question: non_blank_or_default(question),
        }
    }
}

fn non_blank_or_default(value: Option<String>) -> String {
    value.filter(|v| !is_blank(v)).unwrap_or_default()
}

/// 空白のみ（または空）か判定する
///
/// ECMAScriptの`String.prototype.trim`と同じ文字集合を空白とする。
/// Unicodeの空白にBOM（U+FEFF）を加え、NEL（U+0085）は除く。
pub fn is_blank(value: &str) -> bool {
    value.trim_matches(is_trim_char).is_empty()
}

fn is_trim_char(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}')
}

/// 投票カウンター
///
/// 作成時は常に0。更新時は呼び出し元の値で上書きする（加算ではない）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteCounts {
    pub negative: i64,
    pub positive: i64,
}

impl VoteCounts {
    pub fn new(negative: i64, positive: i64) -> Self {
        Self { negative, positive }
    }
}

/// 1回のupsertで書き込む属性の完全なセット
///
/// キーと5属性をまとめたもので、リポジトリはこの内容をそのまま書き込む。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionUpdate {
    pub id: QuestionId,
    pub fields: QuestionFields,
    pub votes: VoteCounts,
}

impl QuestionUpdate {
    /// 書き込み後のレコードを組み立てる（ストアが返すALL_NEWと同じ内容）
    pub fn to_question(&self) -> Question {
        Question {
            id: self.id.as_str().to_string(),
            category_slug: self.fields.category_slug.clone(),
            question_slug: self.fields.question_slug.clone(),
            question: self.fields.question.clone(),
            negative_votes: self.votes.negative,
            positive_votes: self.votes.positive,
        }
    }
}
