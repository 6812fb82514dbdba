//! ドメイン（I/O を持たない状態と導出）

pub mod catalog;
pub mod chat;
pub mod command;
pub mod filter;
pub mod notice;
pub mod prompt;
pub mod render;
pub mod selection;
pub mod shell_command;
pub mod view;

pub use catalog::Catalog;
pub use chat::{ChatError, ChatSession, ChatState, PendingRequest, RequestKind};
pub use command::RoutineCommand;
pub use filter::{CategoryFilter, ProductFilter};
pub use notice::Notice;
pub use render::{format_reply, render_transcript, to_text};
pub use selection::{Selection, SelectionChange};
pub use shell_command::{ShellCommand, SHELL_HELP};
