//! Walk the `tb_dados` report table into raw scraped records.
//!
//! Records keep the literal upstream cell text; numeric conversion is the
//! normalizer's job, later. The only ordering guarantee is document order,
//! no sorting is applied anywhere.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::rows::{RowClassifier, RowHint};

/// Raw row from a hierarchical table (production, commercialization).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub produto: String,
    pub sub_produto: Option<String>,
    pub quantidade_raw: String,
}

/// Raw row from a processing table.
#[derive(Debug, Clone, PartialEq)]
pub struct CultivarRow {
    pub cultivar: String,
    pub quantidade_raw: String,
}

/// Raw row from an import/export table.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRow {
    pub pais: String,
    pub quantidade_raw: String,
    pub valor_raw: String,
}

/// Parse a hierarchical 2-column table into classified product rows.
///
/// A structurally absent table or tbody yields an empty vec: the site
/// serves a perfectly valid page with no data table for year/category
/// combinations it has nothing recorded for.
pub fn parse_hierarchical(html: &str) -> Vec<ProductRow> {
    let document = Html::parse_document(html);
    let mut out = Vec::new();
    let mut classifier = RowClassifier::new();

    for_each_row(&document, |cells| match cells.len() {
        2 => {
            let (produto, sub_produto) =
                classifier.classify(cell_hint(cells[0]), &cell_text(cells[0]));
            out.push(ProductRow {
                produto,
                sub_produto,
                quantidade_raw: cell_text(cells[1]),
            });
        }
        0 => {} // header/spacer row without td cells
        n => warn!(columns = n, "skipping hierarchical row with unexpected column count"),
    });

    debug!(rows = out.len(), "hierarchical table walked");
    out
}

/// Parse a flat 2-column processing table (cultivar, quantity).
pub fn parse_cultivar(html: &str) -> Vec<CultivarRow> {
    let document = Html::parse_document(html);
    let mut out = Vec::new();

    for_each_row(&document, |cells| match cells.len() {
        2 => {
            let cultivar = cell_text(cells[0]);
            if cultivar.is_empty() {
                warn!("skipping processing row with empty cultivar cell");
                return;
            }
            out.push(CultivarRow {
                cultivar,
                quantidade_raw: cell_text(cells[1]),
            });
        }
        0 => {}
        n => warn!(columns = n, "skipping processing row with unexpected column count"),
    });

    debug!(rows = out.len(), "processing table walked");
    out
}

/// Parse a flat 3-column trade table (country, quantity, value).
pub fn parse_trade(html: &str) -> Vec<TradeRow> {
    let document = Html::parse_document(html);
    let mut out = Vec::new();

    for_each_row(&document, |cells| match cells.len() {
        3 => {
            let pais = cell_text(cells[0]);
            if pais.is_empty() {
                warn!("skipping trade row with empty country cell");
                return;
            }
            out.push(TradeRow {
                pais,
                quantidade_raw: cell_text(cells[1]),
                valor_raw: cell_text(cells[2]),
            });
        }
        0 => {}
        n => warn!(columns = n, "skipping trade row with unexpected column count"),
    });

    debug!(rows = out.len(), "trade table walked");
    out
}

/// Visit the `<td>` cells of every body row of the data table, in document
/// order. Does nothing when the table or its body is missing.
fn for_each_row<'a, F>(document: &'a Html, mut visit: F)
where
    F: FnMut(Vec<ElementRef<'a>>),
{
    let (Ok(body_sel), Ok(row_sel), Ok(cell_sel)) = (
        Selector::parse("table.tb_dados tbody"),
        Selector::parse("tr"),
        Selector::parse("td"),
    ) else {
        return;
    };

    let Some(body) = document.select(&body_sel).next() else {
        debug!("no tb_dados table body in document, nothing to walk");
        return;
    };

    for row in body.select(&row_sel) {
        visit(row.select(&cell_sel).collect());
    }
}

/// Flatten a cell's text nodes into one space-joined, trimmed string.
fn cell_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read the hierarchy hint from the cell's CSS classes.
fn cell_hint(el: ElementRef<'_>) -> RowHint {
    if el.value().classes().any(|c| c == "tb_item") {
        RowHint::Item
    } else if el.value().classes().any(|c| c == "tb_subitem") {
        RowHint::Subitem
    } else {
        RowHint::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIER_TABLE: &str = r#"
        <html><body><table class="tb_dados">
        <thead><tr><th>Produto</th><th>Quantidade (L.)</th></tr></thead>
        <tbody>
        <tr><td class="tb_item">VINHO DE MESA</td><td class="tb_item">169.762.429</td></tr>
        <tr><td class="tb_subitem">Tinto</td><td class="tb_subitem">139.320.884</td></tr>
        <tr><td class="tb_subitem">Branco</td><td class="tb_subitem">27.910.299</td></tr>
        <tr><td class="tb_item">SUCO</td><td class="tb_item">-</td></tr>
        </tbody>
        </table></body></html>"#;

    #[test]
    fn test_parse_hierarchical_classifies_rows() {
        let rows = parse_hierarchical(HIER_TABLE);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].produto, "VINHO DE MESA");
        assert_eq!(rows[0].sub_produto, None);
        assert_eq!(rows[0].quantidade_raw, "169.762.429");
        assert_eq!(rows[1].produto, "VINHO DE MESA");
        assert_eq!(rows[1].sub_produto.as_deref(), Some("Tinto"));
        assert_eq!(rows[2].sub_produto.as_deref(), Some("Branco"));
        assert_eq!(rows[3].produto, "SUCO");
        assert_eq!(rows[3].quantidade_raw, "-");
    }

    #[test]
    fn test_missing_table_yields_empty() {
        assert!(parse_hierarchical("<html><body><p>sem dados</p></body></html>").is_empty());
        assert!(parse_cultivar("<html><body></body></html>").is_empty());
        assert!(parse_trade(r#"<table class="tb_dados"></table>"#).is_empty());
    }

    #[test]
    fn test_wrong_column_count_skipped() {
        let html = r#"<table class="tb_dados"><tbody>
            <tr><td>a</td><td>1</td><td>2</td></tr>
            <tr><td class="tb_item">ok</td><td>3</td></tr>
            </tbody></table>"#;
        let rows = parse_hierarchical(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].produto, "ok");
    }

    #[test]
    fn test_cultivar_empty_first_cell_skipped() {
        let html = r#"<table class="tb_dados"><tbody>
            <tr><td>  </td><td>123</td></tr>
            <tr><td>Isabel</td><td>1.234</td></tr>
            </tbody></table>"#;
        let rows = parse_cultivar(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cultivar, "Isabel");
    }

    #[test]
    fn test_trade_rows_keep_raw_text() {
        let html = r#"<table class="tb_dados"><tbody>
            <tr><td>Argentina</td><td>5.846.504</td><td>10.306.442</td></tr>
            <tr><td>Chile</td><td>-</td><td>-</td></tr>
            </tbody></table>"#;
        let rows = parse_trade(html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pais, "Argentina");
        assert_eq!(rows[0].quantidade_raw, "5.846.504");
        assert_eq!(rows[1].valor_raw, "-");
    }

    #[test]
    fn test_cell_text_joins_nested_nodes() {
        let html = r#"<table class="tb_dados"><tbody>
            <tr><td class="tb_item"><a>VINHO</a> <b>FINO</b></td><td>1</td></tr>
            </tbody></table>"#;
        let rows = parse_hierarchical(html);
        assert_eq!(rows[0].produto, "VINHO FINO");
    }

    #[test]
    fn test_deterministic_re_extraction() {
        let a = parse_hierarchical(HIER_TABLE);
        let b = parse_hierarchical(HIER_TABLE);
        assert_eq!(a, b);
    }
}
