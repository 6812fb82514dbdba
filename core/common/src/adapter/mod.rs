//! アダプター（外界の I/O を trait で抽象化した実装）
//!
//! usecase はポートの trait 経由でのみファイル・環境変数・ストアに触れる。
//! 実装は標準実装（Std*）やテスト用のものを注入する。

pub mod file_json_log;
pub mod kv_store;
pub mod std_env_resolver;
pub mod std_fs;

pub use file_json_log::{FileJsonLog, NoopLog, StderrLog, TeeLog};
pub use kv_store::{FileKeyValueStore, MemoryKeyValueStore};
pub use std_env_resolver::StdEnvResolver;
pub use std_fs::StdFileSystem;
