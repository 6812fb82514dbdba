//! 製品一覧と選択一覧のテキスト表示

use crate::domain::notice::Notice;
use crate::domain::selection::Selection;
use common::domain::Product;

/// 製品 1 行（選択中は `[x]`）。説明があれば次の行に字下げして出す。
pub fn product_line(product: &Product, selected: bool) -> String {
    let mark = if selected { "[x]" } else { "[ ]" };
    let mut line = format!("{} {}", mark, product.name);
    if !product.brand.is_empty() {
        line.push_str(&format!(" ({})", product.brand));
    }
    if let Some(desc) = product.description.as_deref().filter(|d| !d.is_empty()) {
        line.push_str(&format!("\n      {}", desc));
    }
    line
}

/// 絞り込み結果の一覧。空なら通知文。
pub fn product_list(products: &[&Product], selection: &Selection) -> String {
    if products.is_empty() {
        return Notice::NoMatchingProducts.to_string();
    }
    products
        .iter()
        .map(|p| product_line(p, selection.contains(&p.name)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 選択一覧（1 始まりの番号付き）。空ならプレースホルダー。
///
/// `offer_clear` のときだけ、空でない一覧の末尾に全消去の案内を付ける。
pub fn selection_list(selection: &Selection, offer_clear: bool) -> String {
    if selection.is_empty() {
        return Notice::NoProductsSelected.to_string();
    }
    let mut lines: Vec<String> = selection
        .items()
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:>2}. {}", i + 1, p.name))
        .collect();
    if offer_clear {
        lines.push("    (clear: remove all)".to_string());
    }
    lines.join("\n")
}
