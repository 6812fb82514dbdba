//! ユースケース（ポート経由でのみ I/O を行う）

pub mod app;
pub mod catalog;
pub mod chat;
pub mod selection_store;
pub mod shell;

pub use app::RoutineUseCase;
pub use catalog::CatalogLoader;
pub use chat::ChatUseCase;
pub use selection_store::SelectionStore;
