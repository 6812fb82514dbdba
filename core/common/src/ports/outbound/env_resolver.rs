//! 環境変数解決 Outbound ポート
//!
//! ホームディレクトリ・API キーを環境変数から解決する。
//! usecase / wiring はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::{Dirs, HomeDir};
use crate::error::Error;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のモックなど。
pub trait EnvResolver: Send + Sync {
    /// ホームディレクトリを環境変数から解決する
    ///
    /// 優先順位:
    /// 1. ROUTINE_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/routine（XDG_CONFIG_HOME が設定されていれば）
    /// 3. $HOME/.config/routine
    fn resolve_home_dir(&self) -> Result<HomeDir, Error>;

    /// 任意の環境変数（空文字は未設定扱い）
    fn var(&self, name: &str) -> Option<String>;

    /// config / state ディレクトリ
    fn resolve_dirs(&self) -> Result<Dirs, Error> {
        Ok(Dirs::under_home(&self.resolve_home_dir()?))
    }
}
