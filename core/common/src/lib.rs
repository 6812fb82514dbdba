//! routine 共通ライブラリ
//!
//! `routine` コマンドで使うエラー型・ドメイン型・ポートと標準アダプタ・LLM プロバイダを提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Product とディレクトリ・名前の Newtype）
pub mod domain;

/// 会話メッセージ
pub mod msg;

/// Outbound ポート
pub mod ports;

/// 標準アダプタ
pub mod adapter;

/// LLM プロバイダと設定
pub mod llm;
