//! 対話モード: 絞り込み・選択・チャットを 1 つのループで扱う
//!
//! 選択ストアの通知を受けたら次のプロンプトの前に一覧を描き直す。
//! どの失敗も通知を 1 行出して入力待ちに戻る。

use crate::domain::view::{product_list, selection_list};
use crate::domain::{
    format_reply, render_transcript, to_text, CategoryFilter, ChatSession, Notice, ProductFilter,
    Selection, SelectionChange, ShellCommand, SHELL_HELP,
};
use crate::usecase::app::{emit, report_mutation, RoutineUseCase};
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use std::cell::Cell;
use std::io::{BufRead, Write};
use std::rc::Rc;

/// 1 回の対話セッション
pub struct Shell<'a> {
    app: &'a mut RoutineUseCase,
    session: ChatSession,
    /// カテゴリ未選択かつ検索語なしの間は None（製品一覧を出さない）
    filter: Option<ProductFilter>,
    dirty: Rc<Cell<bool>>,
}

impl<'a> Shell<'a> {
    pub fn new(app: &'a mut RoutineUseCase) -> Self {
        Self {
            app,
            session: ChatSession::new(),
            filter: None,
            dirty: Rc::new(Cell::new(false)),
        }
    }

    /// 入力が尽きるか quit まで回す
    pub fn run(&mut self, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<i32, Error> {
        let dirty = Rc::clone(&self.dirty);
        let subscription = self
            .app
            .store
            .subscribe(Box::new(move |_: &SelectionChange, _: &Selection| dirty.set(true)));
        let result = self.repl(input, out);
        self.app.store.unsubscribe(subscription);
        result
    }

    fn repl(&mut self, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<i32, Error> {
        emit(out, "Type `help` for commands.")?;
        if let Err(e) = self.app.catalog.load() {
            emit(out, e.notice())?;
        }
        if let Some(w) = self.app.store.restore_warning() {
            emit(out, w.notice())?;
        }
        self.render(out)?;

        let mut line = String::new();
        loop {
            write!(out, "> ").map_err(|e| Error::io_msg(e.to_string()))?;
            out.flush().map_err(|e| Error::io_msg(e.to_string()))?;
            line.clear();
            let n = input
                .read_line(&mut line)
                .map_err(|e| Error::io_msg(e.to_string()))?;
            if n == 0 {
                break;
            }
            let cmd = match ShellCommand::parse(&line) {
                Ok(cmd) => cmd,
                Err(e) => {
                    emit(out, e)?;
                    continue;
                }
            };
            if cmd == ShellCommand::Quit {
                break;
            }
            let view_changed = self.handle(cmd, out)?;
            if self.dirty.replace(false) || view_changed {
                self.render(out)?;
            }
        }
        Ok(0)
    }

    /// 1 コマンドを処理する。絞り込み条件が変わったら true。
    fn handle(&mut self, cmd: ShellCommand, out: &mut dyn Write) -> Result<bool, Error> {
        match cmd {
            ShellCommand::Category(name) => {
                let search = self.current_search();
                self.filter = Some(ProductFilter::new(CategoryFilter::parse(&name), &search));
                Ok(true)
            }
            ShellCommand::Search(text) => {
                let category = self
                    .filter
                    .as_ref()
                    .map(|f| f.category.clone())
                    .unwrap_or_default();
                let chosen = self.filter.is_some() || !text.trim().is_empty();
                self.filter = chosen.then(|| ProductFilter::new(category, &text));
                Ok(true)
            }
            ShellCommand::Products => {
                self.render_products(out)?;
                Ok(false)
            }
            ShellCommand::Categories => {
                match self.app.catalog.categories() {
                    Ok(list) => emit(out, list.join("\n"))?,
                    Err(e) => emit(out, e.notice())?,
                }
                Ok(false)
            }
            ShellCommand::Selected => {
                emit(out, selection_list(self.app.store.selection(), true))?;
                Ok(false)
            }
            ShellCommand::Toggle(name) => {
                let catalog = match self.app.catalog.load() {
                    Ok(c) => c,
                    Err(e) => {
                        emit(out, e.notice())?;
                        return Ok(false);
                    }
                };
                match self.app.store.toggle_by_name(catalog, &name) {
                    Ok(outcome) => report_mutation(out, &outcome)?,
                    Err(e) => emit(out, Notice::Error(e.to_string()))?,
                }
                Ok(false)
            }
            ShellCommand::Remove(position) => {
                match position
                    .checked_sub(1)
                    .map(|index| self.app.store.remove(index))
                {
                    Some(Ok(outcome)) => report_mutation(out, &outcome)?,
                    Some(Err(e)) => emit(out, Notice::Error(e.to_string()))?,
                    None => emit(out, Notice::Error("positions start at 1".to_string()))?,
                }
                Ok(false)
            }
            ShellCommand::Clear => {
                if self.app.store.selection().is_empty() {
                    emit(out, Notice::NoProductsSelected)?;
                } else {
                    let outcome = self.app.store.clear();
                    report_mutation(out, &outcome)?;
                }
                Ok(false)
            }
            ShellCommand::Generate => {
                self.generate(out)?;
                Ok(false)
            }
            ShellCommand::Ask(text) => {
                self.ask(&text, out)?;
                Ok(false)
            }
            ShellCommand::Reload => {
                match self.app.catalog.reload() {
                    Ok(c) => emit(out, format!("Loaded {} products.", c.len()))?,
                    Err(e) => emit(out, e.notice())?,
                }
                Ok(true)
            }
            ShellCommand::Help => {
                emit(out, SHELL_HELP)?;
                Ok(false)
            }
            ShellCommand::Quit | ShellCommand::Empty => Ok(false),
        }
    }

    fn current_search(&self) -> String {
        self.filter
            .as_ref()
            .map(|f| f.search().to_string())
            .unwrap_or_default()
    }

    fn generate(&mut self, out: &mut dyn Write) -> Result<(), Error> {
        let catalog = match self.app.catalog.load() {
            Ok(c) => c,
            Err(e) => {
                emit(out, e.notice())?;
                return Ok(());
            }
        };
        emit(out, Notice::Generating)?;
        match self
            .app
            .chat
            .generate(&mut self.session, catalog, self.app.store.selection())
        {
            Ok(_) => emit(out, to_text(&render_transcript(self.session.transcript()))),
            Err(e) => emit(out, e.notice()),
        }
    }

    fn ask(&mut self, text: &str, out: &mut dyn Write) -> Result<(), Error> {
        match self.app.chat.follow_up(&mut self.session, text) {
            Ok(Some(reply)) => emit(out, format_reply(&reply)),
            Ok(None) => Ok(()),
            Err(e) => {
                let _ = self.app.log.log(
                    &LogRecord::new(LogLevel::Debug, "follow-up not sent")
                        .layer("usecase")
                        .kind("chat")
                        .field("reason", e.to_string()),
                );
                emit(out, e.notice())
            }
        }
    }

    fn render_products(&mut self, out: &mut dyn Write) -> Result<(), Error> {
        let filter = match self.filter {
            Some(ref f) => f,
            None => return emit(out, Notice::SelectCategory),
        };
        let catalog = match self.app.catalog.load() {
            Ok(c) => c,
            Err(e) => return emit(out, e.notice()),
        };
        let visible = filter.apply(catalog.products());
        emit(out, product_list(&visible, self.app.store.selection()))
    }

    fn render(&mut self, out: &mut dyn Write) -> Result<(), Error> {
        self.render_products(out)?;
        emit(out, "")?;
        emit(out, "Selected products:")?;
        emit(out, selection_list(self.app.store.selection(), true))
    }
}
