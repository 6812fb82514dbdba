//! ポート（Inbound: CLI → アプリ / Outbound: アプリ → 外界）

pub mod inbound;
pub mod outbound;
