/// upsertの動作モード
///
/// 作成と更新で必要なフィールドが異なるため、モードごとに必要な値だけを持つ。
use super::{QuestionFields, QuestionId, QuestionUpdate, VoteCounts};

/// upsertコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertCommand {
    /// 新規作成（POST）。IDは生成し、投票数は0から始める
    Create { fields: QuestionFields },
    /// 更新（PUT）。指定IDの属性を上書きする
    Update {
        id: QuestionId,
        fields: QuestionFields,
        votes: VoteCounts,
    },
}

impl UpsertCommand {
    /// ログ出力用のモード名
    pub fn mode(&self) -> &'static str {
        match self {
            UpsertCommand::Create { .. } => "create",
            UpsertCommand::Update { .. } => "update",
        }
    }

    /// 書き込むフィールドセットに変換
    ///
    /// 作成時のみ`generate_id`を呼び出す。
    pub fn into_update<F>(self, generate_id: F) -> QuestionUpdate
    where
        F: FnOnce() -> QuestionId,
    {
        match self {
            UpsertCommand::Create { fields } => QuestionUpdate {
                id: generate_id(),
                fields,
                votes: VoteCounts::default(),
            },
            UpsertCommand::Update { id, fields, votes } => QuestionUpdate { id, fields, votes },
        }
    }
}
