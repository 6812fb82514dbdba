//! Outbound ポート: アプリが外界（カタログ取得・選択の永続化・チャット完了）を使うための trait

pub mod catalog_source;
pub mod completion;
pub mod selection_storage;

pub use catalog_source::CatalogSource;
pub use completion::ChatCompletion;
pub use selection_storage::SelectionStorage;
