//! 実行時ディレクトリ（ROUTINE_HOME / XDG 解決結果）
//!
//! EnvResolver::resolve_dirs() で取得し、設定・状態・ログのパス計算に使う。

use std::path::PathBuf;

/// 解決済みの config / state ディレクトリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dirs {
    pub config_dir: PathBuf,
    pub state_dir: PathBuf,
}

impl Dirs {
    /// ホームディレクトリ直下に config / state を置く標準レイアウト
    pub fn under_home(home: &super::HomeDir) -> Self {
        Self {
            config_dir: home.to_path_buf(),
            state_dir: home.join("state"),
        }
    }

    /// 設定ファイル（config.json）
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    /// キー・値ストアの格納ディレクトリ
    pub fn store_dir(&self) -> PathBuf {
        self.state_dir.join("store")
    }

    /// JSONL ログファイル
    pub fn log_file(&self) -> PathBuf {
        self.state_dir.join("routine.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HomeDir;

    #[test]
    fn test_under_home_layout() {
        let dirs = Dirs::under_home(&HomeDir::new("/tmp/rt"));
        assert_eq!(dirs.settings_file(), PathBuf::from("/tmp/rt/config.json"));
        assert_eq!(dirs.store_dir(), PathBuf::from("/tmp/rt/state/store"));
        assert_eq!(dirs.log_file(), PathBuf::from("/tmp/rt/state/routine.log"));
    }
}
