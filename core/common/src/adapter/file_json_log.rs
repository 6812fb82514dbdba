//! Log 実装（ファイルへ JSONL 追記 / stderr 表示 / 複数への配信 / 何もしない）
//!
//! ログの出力は best-effort。書き込み失敗は呼び出し元で握りつぶしてよい。

use crate::error::Error;
use crate::ports::outbound::{FileSystem, Log, LogLevel, LogRecord};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// ファイルへ JSONL を追記する Log 実装
pub struct FileJsonLog {
    fs: Arc<dyn FileSystem>,
    path: std::path::PathBuf,
}

impl FileJsonLog {
    /// ログファイルパスへ追記する logger を生成する。
    /// 親ディレクトリが無ければ作成する（初回書き込み時）。
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Log for FileJsonLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let mut w = self.fs.open_append(&self.path)?;
        let line = serde_json::to_string(record).map_err(|e| Error::json(e.to_string()))?;
        w.write_all(line.as_bytes())
            .map_err(|e| Error::io_msg(e.to_string()))?;
        w.write_all(b"\n")
            .map_err(|e| Error::io_msg(e.to_string()))?;
        w.flush().map_err(|e| Error::io_msg(e.to_string()))?;
        Ok(())
    }
}

/// 人間向けに stderr へ 1 行で出す Log 実装（-v 指定時）
#[derive(Debug, Clone)]
pub struct StderrLog {
    min_level: LogLevel,
}

impl StderrLog {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        rank(level) <= rank(self.min_level)
    }
}

fn rank(level: LogLevel) -> u8 {
    match level {
        LogLevel::Error => 0,
        LogLevel::Warn => 1,
        LogLevel::Info => 2,
        LogLevel::Debug => 3,
    }
}

/// stderr 表示用の 1 行に整形する
pub fn format_human(record: &LogRecord) -> String {
    let mut line = format!("[{}]", record.level.as_str());
    if let Some(ref layer) = record.layer {
        line.push_str(&format!(" {}:", layer));
    }
    line.push(' ');
    line.push_str(&record.message);
    if let Some(ref fields) = record.fields {
        for (k, v) in fields {
            line.push_str(&format!(" {}={}", k, v));
        }
    }
    line
}

impl Log for StderrLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        if self.enabled(record.level) {
            eprintln!("{}", format_human(record));
        }
        Ok(())
    }
}

/// 複数の Log へ順に配信する（1 つが失敗しても残りは継続）
pub struct TeeLog {
    logs: Vec<Arc<dyn Log>>,
}

impl TeeLog {
    pub fn new(logs: Vec<Arc<dyn Log>>) -> Self {
        Self { logs }
    }
}

impl Log for TeeLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        let mut first_err = None;
        for log in &self.logs {
            if let Err(e) = log.log(record) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// 何も出力しない Log 実装（テスト用）
#[derive(Debug, Clone, Default)]
pub struct NoopLog;

impl Log for NoopLog {
    fn log(&self, _record: &LogRecord) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::StdFileSystem;
    use std::sync::Mutex;

    struct CollectLog(Mutex<Vec<String>>);

    impl Log for CollectLog {
        fn log(&self, record: &LogRecord) -> Result<(), Error> {
            self.0.lock().unwrap().push(record.message.clone());
            Ok(())
        }
    }

    struct FailingLog;

    impl Log for FailingLog {
        fn log(&self, _record: &LogRecord) -> Result<(), Error> {
            Err(Error::io_msg("disk full"))
        }
    }

    #[test]
    fn test_noop_log() {
        assert!(NoopLog.log(&LogRecord::new(LogLevel::Info, "test")).is_ok());
    }

    #[test]
    fn test_file_json_log_appends_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("state").join("routine.log");
        let log = FileJsonLog::new(Arc::new(StdFileSystem), &path);
        log.log(&LogRecord::new(LogLevel::Info, "first")).unwrap();
        log.log(&LogRecord::new(LogLevel::Warn, "second").kind("persistence"))
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let v: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(v["level"], "warn");
        assert_eq!(v["kind"], "persistence");
    }

    #[test]
    fn test_tee_log_continues_after_failure() {
        let collect = Arc::new(CollectLog(Mutex::new(Vec::new())));
        let logs: Vec<Arc<dyn Log>> = vec![Arc::new(FailingLog), collect.clone()];
        let tee = TeeLog::new(logs);
        let res = tee.log(&LogRecord::new(LogLevel::Info, "hello"));
        assert!(res.is_err());
        assert_eq!(collect.0.lock().unwrap().as_slice(), ["hello".to_string()]);
    }

    #[test]
    fn test_format_human() {
        let rec = LogRecord::new(LogLevel::Warn, "snapshot not saved")
            .layer("usecase")
            .field("key", "selectedProducts");
        assert_eq!(
            format_human(&rec),
            "[warn] usecase: snapshot not saved key=\"selectedProducts\""
        );
    }

    #[test]
    fn test_stderr_log_level_filter() {
        let log = StderrLog::new(LogLevel::Warn);
        assert!(log.enabled(LogLevel::Error));
        assert!(log.enabled(LogLevel::Warn));
        assert!(!log.enabled(LogLevel::Debug));
    }
}
