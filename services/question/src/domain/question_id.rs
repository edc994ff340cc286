/// QuestionレコードのプライマリキーID
///
/// 新規作成時はUUID v4からハイフンを除いた32桁の16進文字列を生成する。
/// 更新時は呼び出し元が指定したIDをそのまま保持する（変換しない）。
use std::fmt;

use uuid::Uuid;

/// QuestionのプライマリキーID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestionId(String);

impl QuestionId {
    /// 新しいIDを生成（UUID v4、ハイフンなし）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// 既存のID文字列をラップ
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
