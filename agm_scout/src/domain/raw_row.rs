use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};

/// Element id of the container the portal renders results into.
pub const RESULTS_CONTAINER_ID: &str = "table01";
/// Result rows rendered by the portal alternate between these two classes.
pub const RESULT_ROW_CLASSES: [&str; 2] = ["even", "odd"];

/// CSS selector for result rows, matching any row whose class list holds
/// one of [`RESULT_ROW_CLASSES`].
pub fn result_rows_selector() -> String {
    RESULT_ROW_CLASSES
        .iter()
        .map(|class| format!("div#{} tr.{}", RESULTS_CONTAINER_ID, class))
        .join(", ")
}

/// XPath matching the same rows as [`result_rows_selector`].
pub fn result_rows_xpath() -> String {
    let classes = RESULT_ROW_CLASSES
        .iter()
        .map(|class| {
            format!(
                "contains(concat(' ', normalize-space(@class), ' '), ' {} ')",
                class
            )
        })
        .join(" or ");
    format!(
        "//div[@id='{}']//tr[{}]",
        RESULTS_CONTAINER_ID, classes
    )
}

/// One physical `<tr>` of the results table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub cells: Vec<String>,
    /// The leading cell carries `rowspan="2"`, i.e. this row opens a two-row group.
    pub spans_two_rows: bool,
}

impl RawRow {
    pub fn new(cells: Vec<String>, spans_two_rows: bool) -> Self {
        RawRow {
            cells,
            spans_two_rows,
        }
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Reads the result rows out of rendered page markup, in document order.
///
/// Accepts either the full page source or just the `#table01` container.
pub fn rows_from_html(html: &str) -> Vec<RawRow> {
    let row_selector = Selector::parse(&result_rows_selector()).unwrap();
    let cell_selector = Selector::parse("td").unwrap();
    let document = Html::parse_document(html);

    document
        .select(&row_selector)
        .map(|tr| {
            let tds: Vec<ElementRef> = tr.select(&cell_selector).collect();
            let spans_two_rows = tds
                .first()
                .and_then(|td| td.value().attr("rowspan"))
                .is_some_and(|span| span.trim() == "2");

            RawRow {
                cells: tds.iter().map(cell_text).collect(),
                spans_two_rows,
            }
        })
        .collect()
}

fn cell_text(td: &ElementRef) -> String {
    td.text().flat_map(str::split_whitespace).join(" ")
}
