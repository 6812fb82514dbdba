//! ルーティン生成用のプロンプト組み立て

use common::domain::Product;
use common::msg::ChatMessage;

pub const SYSTEM_PROMPT: &str = "You are a helpful beauty routine assistant. Use the provided product data to recommend a routine using only the selected products. Format your response with line breaks and bullet points for clarity. Keep your answer short, friendly, and easy to read for beginners. Only answer questions about the routine or beauty topics like skincare, haircare, makeup, fragrance, etc.";

/// `- name: description` を 1 行ずつ並べた要約
pub fn product_digest(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| format!("- {}: {}", p.name, p.description_or_empty()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// カタログ全体と選択を埋め込んだユーザープロンプト
pub fn context_prompt(catalog: &[Product], selection: &[Product]) -> String {
    format!(
        "Here are all available products:\n{}\n\nSelected products:\n{}\n\nPlease recommend a routine using only the selected products.",
        product_digest(catalog),
        product_digest(selection)
    )
}

/// 生成リクエストの先頭 2 件（どちらも表示しない）
pub fn generation_messages(catalog: &[Product], selection: &[Product]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT).hidden(),
        ChatMessage::user(context_prompt(catalog, selection)).hidden(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::msg::Role;

    #[test]
    fn test_digest_handles_missing_description() {
        let products = vec![
            Product::new("Glow Serum", "skincare").with_description("Vitamin C"),
            Product::new("Plain Toner", "skincare"),
        ];
        assert_eq!(
            product_digest(&products),
            "- Glow Serum: Vitamin C\n- Plain Toner: "
        );
    }

    #[test]
    fn test_context_prompt_layout() {
        let all = vec![Product::new("A", "X"), Product::new("B", "Y")];
        let selected = vec![Product::new("B", "Y").with_description("balm")];
        assert_eq!(
            context_prompt(&all, &selected),
            "Here are all available products:\n- A: \n- B: \n\nSelected products:\n- B: balm\n\nPlease recommend a routine using only the selected products."
        );
    }

    #[test]
    fn test_generation_messages_are_hidden() {
        let msgs = generation_messages(&[], &[]);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, Role::System);
        assert_eq!(msgs[1].role, Role::User);
        assert!(msgs.iter().all(|m| m.hidden));
    }
}
