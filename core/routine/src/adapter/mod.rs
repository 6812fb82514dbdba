//! アダプター（ポートの標準実装）

pub(crate) mod catalog_source;
pub(crate) mod llm_completion;
pub(crate) mod selection_storage;
#[cfg(test)]
pub(crate) mod stub_completion;

pub(crate) use catalog_source::catalog_source_for;
pub(crate) use llm_completion::ProviderCompletion;
pub(crate) use selection_storage::{KvSelectionStorage, SELECTION_KEY};
#[cfg(test)]
pub(crate) use stub_completion::StubCompletion;
