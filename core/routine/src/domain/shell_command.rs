//! 対話モードの 1 行コマンド
//!
//! 先頭の語がキーワードでなければ、行全体をフォローアップの質問として扱う。
//! 引数を取らないキーワードの後ろに語が続く行も質問とみなす（"clear skin is ..." で選択を消さない）。

use common::error::Error;

/// 対話モードのコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// カテゴリを選ぶ（"all" で絞り込みなし）
    Category(String),
    /// 検索語を設定する（空で解除）
    Search(String),
    Products,
    Categories,
    Selected,
    Toggle(String),
    /// 1 始まりの番号
    Remove(usize),
    Clear,
    Generate,
    Ask(String),
    /// カタログを取り直す
    Reload,
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, Error> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(ShellCommand::Empty);
        }
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };
        let bare = |cmd: ShellCommand| {
            if rest.is_empty() {
                cmd
            } else {
                ShellCommand::Ask(line.to_string())
            }
        };
        let cmd = match head {
            "category" | "cat" => ShellCommand::Category(rest.to_string()),
            "search" | "/" => ShellCommand::Search(rest.to_string()),
            "products" | "ls" => bare(ShellCommand::Products),
            "categories" => bare(ShellCommand::Categories),
            "selected" | "sel" => bare(ShellCommand::Selected),
            "toggle" | "t" => {
                if rest.is_empty() {
                    return Err(Error::invalid_argument("usage: toggle <product name>"));
                }
                ShellCommand::Toggle(rest.to_string())
            }
            "remove" | "rm" => {
                let n = rest
                    .parse::<usize>()
                    .map_err(|_| Error::invalid_argument("usage: remove <number>"))?;
                ShellCommand::Remove(n)
            }
            "clear" => bare(ShellCommand::Clear),
            "generate" | "gen" => bare(ShellCommand::Generate),
            "ask" => ShellCommand::Ask(rest.to_string()),
            "reload" => bare(ShellCommand::Reload),
            "help" | "?" => bare(ShellCommand::Help),
            "quit" | "exit" | "q" => bare(ShellCommand::Quit),
            _ => ShellCommand::Ask(line.to_string()),
        };
        Ok(cmd)
    }
}

pub const SHELL_HELP: &str = "\
Commands:
  category <name|all>   Choose a category (lowercase \"all\" shows every category)
  search [text]         Filter by name, brand or description (empty clears)
  products              Show the filtered products
  categories            List categories
  toggle <name>         Select or unselect a product
  selected              Show the selected products
  remove <n>            Remove the n-th selected product
  clear                 Remove all selected products
  generate              Generate a routine from the selection
  ask <text>            Ask a follow-up question (any other text works too,
                        including a command word followed by more text)
  reload                Load the product catalog again
  help                  Show this help
  quit                  Leave";
