//! Row classification for hierarchical tables.
//!
//! Production and commercialization tables are two-level: a `tb_item` cell
//! opens a new main product, and following `tb_subitem` cells belong to it.
//! The running "current main product" is a cursor local to one table walk;
//! it is threaded through this classifier explicitly so nothing leaks
//! across requests.

/// Markup hint taken from the primary cell's CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowHint {
    /// Cell carries `tb_item`: a new main product.
    Item,
    /// Cell carries `tb_subitem`: a sub-product of the current main product.
    Subitem,
    /// Neither class: a flat row.
    None,
}

/// Stateful classifier for one table walk. Create a fresh one per table.
#[derive(Debug, Default)]
pub struct RowClassifier {
    current_main: Option<String>,
}

impl RowClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `(main, sub)` labels to a row and advance the cursor.
    ///
    /// A `Subitem` hint with no open main product is treated as a new main
    /// product. That mirrors what the upstream markup forces on us when a
    /// table starts with a subitem row; the real intent upstream is unknown,
    /// so the behavior is kept rather than second-guessed.
    pub fn classify(&mut self, hint: RowHint, text: &str) -> (String, Option<String>) {
        match (hint, self.current_main.as_ref()) {
            (RowHint::Subitem, Some(main)) => (main.clone(), Some(text.to_string())),
            // Item rows and flat rows both reset the running main product,
            // as does a subitem arriving before any item.
            _ => {
                self.current_main = Some(text.to_string());
                (text.to_string(), None)
            }
        }
    }
}
