//! 選択ストア: Selection に永続化・ログ・購読通知を足したもの
//!
//! 変更操作はすべて、戻る前にスナップショット全体を保存してから購読者に通知する。
//! 保存に失敗しても変更はメモリ上で有効のまま（PersistenceWarning を返す）。

use crate::domain::{Catalog, Notice, Selection, SelectionChange};
use crate::ports::outbound::SelectionStorage;
use common::domain::Product;
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

/// 選択操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("no selected product at position {} (selection has {len})", .index + 1)]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown product: {0}")]
    UnknownProduct(String),
}

impl From<SelectionError> for Error {
    fn from(e: SelectionError) -> Self {
        Error::invalid_argument(e.to_string())
    }
}

/// 永続化に失敗した（選択はこのセッションのメモリ上にだけ残る）
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("selection was not saved: {reason}")]
pub struct PersistenceWarning {
    pub reason: String,
}

impl PersistenceWarning {
    pub fn notice(&self) -> Notice {
        Notice::StorageWarning(self.reason.clone())
    }
}

/// 変更操作の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub change: SelectionChange,
    pub warning: Option<PersistenceWarning>,
}

/// 購読の識別子（unsubscribe に使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// 選択の変化を受け取るリスナー
pub type SelectionListener = Box<dyn FnMut(&SelectionChange, &Selection)>;

pub struct SelectionStore {
    selection: Selection,
    storage: Arc<dyn SelectionStorage>,
    log: Arc<dyn Log>,
    listeners: Vec<(SubscriptionId, SelectionListener)>,
    next_id: u64,
    restore_warning: Option<PersistenceWarning>,
}

impl SelectionStore {
    /// 保存済みスナップショットから復元する。無い・壊れている・読めないときは空。
    pub fn restore(storage: Arc<dyn SelectionStorage>, log: Arc<dyn Log>) -> Self {
        let (selection, restore_warning) = match storage.load() {
            Ok(Some(products)) => (Selection::from_snapshot(products), None),
            Ok(None) => (Selection::new(), None),
            Err(Error::Json(m)) => {
                let _ = log.log(
                    &LogRecord::new(LogLevel::Warn, "discarding corrupt selection snapshot")
                        .layer("usecase")
                        .kind("persistence")
                        .field("reason", m),
                );
                (Selection::new(), None)
            }
            Err(e) => {
                let _ = log.log(
                    &LogRecord::new(LogLevel::Warn, "selection snapshot could not be read")
                        .layer("usecase")
                        .kind("persistence")
                        .field("reason", e.to_string()),
                );
                let warning = PersistenceWarning {
                    reason: e.to_string(),
                };
                (Selection::new(), Some(warning))
            }
        };
        Self {
            selection,
            storage,
            log,
            listeners: Vec::new(),
            next_id: 1,
            restore_warning,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn items(&self) -> &[Product] {
        self.selection.items()
    }

    /// 復元時に読み込みが失敗していれば、その警告
    pub fn restore_warning(&self) -> Option<&PersistenceWarning> {
        self.restore_warning.as_ref()
    }

    pub fn subscribe(&mut self, listener: SelectionListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// 購読を外す。未登録の id なら false。
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(i, _)| *i != id);
        self.listeners.len() != before
    }

    pub fn toggle(&mut self, product: &Product) -> MutationOutcome {
        let change = self.selection.toggle(product);
        self.commit(change)
    }

    /// カタログから名前で引いてから切り替える（カードのクリックと同じ）
    pub fn toggle_by_name(
        &mut self,
        catalog: &Catalog,
        name: &str,
    ) -> Result<MutationOutcome, SelectionError> {
        let product = catalog
            .find(name.trim())
            .ok_or_else(|| SelectionError::UnknownProduct(name.trim().to_string()))?;
        Ok(self.toggle(product))
    }

    /// 0 始まりの位置で外す
    pub fn remove(&mut self, index: usize) -> Result<MutationOutcome, SelectionError> {
        let len = self.selection.len();
        let change = self
            .selection
            .remove(index)
            .ok_or(SelectionError::IndexOutOfRange { index, len })?;
        Ok(self.commit(change))
    }

    pub fn clear(&mut self) -> MutationOutcome {
        let change = self.selection.clear();
        self.commit(change)
    }

    fn commit(&mut self, change: SelectionChange) -> MutationOutcome {
        let warning = match self.storage.save(self.selection.items()) {
            Ok(()) => None,
            Err(e) => {
                let _ = self.log.log(
                    &LogRecord::new(LogLevel::Warn, "selection was not saved")
                        .layer("usecase")
                        .kind("persistence")
                        .field("reason", e.to_string()),
                );
                Some(PersistenceWarning {
                    reason: e.to_string(),
                })
            }
        };
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Debug, "selection changed")
                .layer("usecase")
                .kind("selection")
                .field("change", change_kind(&change))
                .field("len", self.selection.len()),
        );
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change, &self.selection);
        }
        MutationOutcome { change, warning }
    }
}

fn change_kind(change: &SelectionChange) -> &'static str {
    match change {
        SelectionChange::Added(_) => "added",
        SelectionChange::Removed { .. } => "removed",
        SelectionChange::Cleared => "cleared",
    }
}
