//! ユーザー向けの通知（プレースホルダーやエラー表示）

/// 画面に差し込む 1 行の通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Generating,
    GenerateFirst,
    NoResponse,
    Busy,
    Error(String),
    NoProductsSelected,
    NoMatchingProducts,
    SelectCategory,
    CatalogUnavailable(String),
    StorageWarning(String),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Generating => write!(f, "Generating your routine..."),
            Notice::GenerateFirst => write!(f, "Please generate a routine first."),
            Notice::NoResponse => write!(f, "Sorry, no response from AI."),
            Notice::Busy => write!(f, "Another request is still in progress."),
            Notice::Error(m) => write!(f, "Error: {}", m),
            Notice::NoProductsSelected => write!(f, "No products selected"),
            Notice::NoMatchingProducts => write!(f, "No products match the current filter"),
            Notice::SelectCategory => write!(f, "Select a category to view products"),
            Notice::CatalogUnavailable(m) => write!(f, "Products could not be loaded: {}", m),
            Notice::StorageWarning(m) => {
                write!(f, "Warning: selection was not saved ({}); it is kept for this session only", m)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_texts() {
        assert_eq!(Notice::GenerateFirst.to_string(), "Please generate a routine first.");
        assert_eq!(Notice::NoResponse.to_string(), "Sorry, no response from AI.");
        assert_eq!(Notice::Error("timeout".into()).to_string(), "Error: timeout");
    }
}
