//! routine コマンドの enum（Command Pattern）
//!
//! CLI の解析結果をユースケースの呼び出しに対応させる。

/// routine の実行モード
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineCommand {
    /// 絞り込んだ製品一覧
    Products {
        category: Option<String>,
        search: Option<String>,
    },
    /// カテゴリ一覧
    Categories,
    /// 選択中の製品
    Selected,
    /// 製品名で選択を切り替える
    Toggle { name: String },
    /// 選択一覧の番号（1 始まり）で外す
    Remove { position: usize },
    /// 選択を空にする
    Clear,
    /// ルーティンを生成して表示
    Generate,
    /// 対話モード
    Shell,
}

impl RoutineCommand {
    /// ログ用の名前
    pub fn name(&self) -> &'static str {
        match self {
            RoutineCommand::Products { .. } => "products",
            RoutineCommand::Categories => "categories",
            RoutineCommand::Selected => "selected",
            RoutineCommand::Toggle { .. } => "toggle",
            RoutineCommand::Remove { .. } => "remove",
            RoutineCommand::Clear => "clear",
            RoutineCommand::Generate => "generate",
            RoutineCommand::Shell => "shell",
        }
    }
}
