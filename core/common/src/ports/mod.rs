//! ポート（アプリと外界の境界を trait で表す）
//!
//! usecase はこのモジュールの trait 経由でのみ外界に触れる。

pub mod outbound;
