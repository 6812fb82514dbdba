//! Inbound ポート: ドライバ（CLI）がアプリを呼び出すインターフェース

use crate::domain::RoutineCommand;
use common::error::Error;

/// 1 コマンドを実行する Inbound ポート
///
/// main はこの trait を実装した型（Runner）の run を呼び出し、戻り値を終了コードにする。
pub trait UseCaseRunner {
    fn run(&mut self, cmd: RoutineCommand) -> Result<i32, Error>;
}
