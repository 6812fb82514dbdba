//! routine のユースケース（1 コマンド分の処理）
//!
//! 出力先は呼び出し側が渡す Write。ユーザー向けの通知もここに書く。

use crate::domain::view::{product_list, selection_list};
use crate::domain::{
    render_transcript, to_text, CategoryFilter, ChatSession, Notice, ProductFilter,
};
use crate::usecase::catalog::CatalogLoader;
use crate::usecase::chat::ChatUseCase;
use crate::usecase::selection_store::{MutationOutcome, SelectionStore};
use crate::usecase::shell::Shell;
use common::error::Error;
use common::ports::outbound::Log;
use std::io::{BufRead, Write};
use std::sync::Arc;

/// 1 行書く（失敗は Io エラー）
pub(crate) fn emit(out: &mut dyn Write, text: impl std::fmt::Display) -> Result<(), Error> {
    writeln!(out, "{}", text).map_err(|e| Error::io_msg(e.to_string()))
}

/// 変更結果を書き出す（保存に失敗していれば警告も）
pub(crate) fn report_mutation(out: &mut dyn Write, outcome: &MutationOutcome) -> Result<(), Error> {
    if let Some(ref w) = outcome.warning {
        emit(out, w.notice())?;
    }
    Ok(())
}

/// 組み立て済みの部品一式
pub struct RoutineUseCase {
    pub(crate) catalog: CatalogLoader,
    pub(crate) store: SelectionStore,
    pub(crate) chat: ChatUseCase,
    pub(crate) log: Arc<dyn Log>,
}

impl RoutineUseCase {
    pub fn new(
        catalog: CatalogLoader,
        store: SelectionStore,
        chat: ChatUseCase,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            catalog,
            store,
            chat,
            log,
        }
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// 絞り込んだ製品一覧（条件なしなら全件）
    pub fn products(
        &mut self,
        category: Option<&str>,
        search: Option<&str>,
        out: &mut dyn Write,
    ) -> Result<i32, Error> {
        let filter = ProductFilter::new(
            category.map(CategoryFilter::parse).unwrap_or_default(),
            search.unwrap_or(""),
        );
        let catalog = self.catalog.load()?;
        let visible = filter.apply(catalog.products());
        emit(out, product_list(&visible, self.store.selection()))?;
        Ok(0)
    }

    pub fn categories(&mut self, out: &mut dyn Write) -> Result<i32, Error> {
        for c in self.catalog.categories()? {
            emit(out, c)?;
        }
        Ok(0)
    }

    pub fn selected(&self, out: &mut dyn Write) -> Result<i32, Error> {
        emit(out, selection_list(self.store.selection(), false))?;
        Ok(0)
    }

    pub fn toggle(&mut self, name: &str, out: &mut dyn Write) -> Result<i32, Error> {
        let catalog = self.catalog.load()?;
        let outcome = self.store.toggle_by_name(catalog, name)?;
        report_mutation(out, &outcome)?;
        emit(out, selection_list(self.store.selection(), false))?;
        Ok(0)
    }

    /// 1 始まりの番号で外す
    pub fn remove(&mut self, position: usize, out: &mut dyn Write) -> Result<i32, Error> {
        let index = position
            .checked_sub(1)
            .ok_or_else(|| Error::invalid_argument("positions start at 1"))?;
        let outcome = self.store.remove(index)?;
        report_mutation(out, &outcome)?;
        emit(out, selection_list(self.store.selection(), false))?;
        Ok(0)
    }

    pub fn clear(&mut self, out: &mut dyn Write) -> Result<i32, Error> {
        let outcome = self.store.clear();
        report_mutation(out, &outcome)?;
        emit(out, selection_list(self.store.selection(), false))?;
        Ok(0)
    }

    /// 現在の選択からルーティンを生成して表示する
    pub fn generate(&mut self, out: &mut dyn Write) -> Result<i32, Error> {
        let catalog = self.catalog.load()?;
        let mut session = ChatSession::new();
        emit(out, Notice::Generating)?;
        match self.chat.generate(&mut session, catalog, self.store.selection()) {
            Ok(_) => {
                emit(out, to_text(&render_transcript(session.transcript())))?;
                Ok(0)
            }
            Err(e) => {
                // 通知を出したうえで、分類に応じた終了コードを返す
                emit(out, e.notice())?;
                Ok(Error::from(e).exit_code())
            }
        }
    }

    /// 対話モード
    pub fn shell(&mut self, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<i32, Error> {
        Shell::new(self).run(input, out)
    }
}
