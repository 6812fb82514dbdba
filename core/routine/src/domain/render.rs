//! トランスクリプトの表示整形
//!
//! 空行で段落を分け、`- ` で始まる行を箇条書きにする。どちらも無くても 1 段落として出す。

use common::msg::{ChatMessage, Role};
use regex::Regex;
use std::sync::OnceLock;

/// 段落内の要素
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Paragraph(String),
    Bullet(String),
}

/// 表示ブロック（1 メッセージ = 1 ブロック）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayBlock {
    User(String),
    Assistant(Vec<Segment>),
}

fn paragraph_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[ \t]*\n").expect("paragraph regex"))
}

fn bullet_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*-\s+(.*)$").expect("bullet regex"))
}

/// アシスタント応答を段落と箇条書きに分ける
pub fn format_assistant(content: &str) -> Vec<Segment> {
    let normalized = content.replace("\r\n", "\n");
    let mut out = Vec::new();
    for para in paragraph_break().split(&normalized) {
        let mut text: Vec<&str> = Vec::new();
        for line in para.lines() {
            if let Some(cap) = bullet_line().captures(line) {
                if !text.is_empty() {
                    out.push(Segment::Paragraph(text.join(" ")));
                    text.clear();
                }
                let item = cap.get(1).map(|m| m.as_str()).unwrap_or("");
                out.push(Segment::Bullet(item.trim_end().to_string()));
            } else if !line.trim().is_empty() {
                text.push(line.trim());
            }
        }
        if !text.is_empty() {
            out.push(Segment::Paragraph(text.join(" ")));
        }
    }
    out
}

/// 表示するメッセージだけをブロックにする（hidden と system は出さない）
pub fn render_transcript(messages: &[ChatMessage]) -> Vec<DisplayBlock> {
    messages
        .iter()
        .filter(|m| !m.hidden && m.role != Role::System)
        .map(|m| match m.role {
            Role::User => DisplayBlock::User(m.content.clone()),
            _ => DisplayBlock::Assistant(format_assistant(&m.content)),
        })
        .collect()
}

/// 端末向けのテキストにする
pub fn to_text(blocks: &[DisplayBlock]) -> String {
    let mut out: Vec<String> = Vec::new();
    for block in blocks {
        match block {
            DisplayBlock::User(s) => out.push(format!("You: {}", s)),
            DisplayBlock::Assistant(segments) => {
                let mut lines: Vec<String> = Vec::new();
                let mut prev_bullet = false;
                for seg in segments {
                    match seg {
                        Segment::Paragraph(p) => {
                            if !lines.is_empty() {
                                lines.push(String::new());
                            }
                            lines.push(p.clone());
                            prev_bullet = false;
                        }
                        Segment::Bullet(b) => {
                            if !lines.is_empty() && !prev_bullet {
                                lines.push(String::new());
                            }
                            lines.push(format!("  \u{2022} {}", b));
                            prev_bullet = true;
                        }
                    }
                }
                out.push(lines.join("\n"));
            }
        }
    }
    out.join("\n\n")
}

/// 1 件のアシスタント応答だけを端末向けに整形する
pub fn format_reply(content: &str) -> String {
    to_text(&[DisplayBlock::Assistant(format_assistant(content))])
}
