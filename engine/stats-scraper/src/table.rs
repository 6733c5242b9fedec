//! Conversion of HTML `<table>` elements into rectangular datasets

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;
use crate::types::ExtractedTable;

/// Upper bound for `colspan`/`rowspan`, matching what browsers accept for colspan
const MAX_SPAN: usize = 1000;

/// One `<td>`/`<th>` with its spans
#[derive(Debug, Clone)]
struct Cell {
    text: String,
    is_header: bool,
    colspan: usize,
    rowspan: usize,
}

/// Every `<table>` element of the document, nested ones included, in document order
pub fn table_elements(document: &Html) -> Result<Vec<ElementRef<'_>>, ExtractError> {
    let selector = Selector::parse("table").map_err(|e| ExtractError::Selector {
        selector: "table".to_string(),
        message: e.to_string(),
    })?;

    Ok(document.select(&selector).collect())
}

/// Convert one table element into an [`ExtractedTable`]
pub fn extract_table(table: ElementRef<'_>) -> Result<ExtractedTable, ExtractError> {
    let table_id = table.value().attr("id").map(str::to_string);

    let caption = child_elements(table, "caption")
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ExtractError::MissingCaption { table_id: table_id.clone() })?;

    let table_id = table_id.ok_or_else(|| ExtractError::MissingId { caption: caption.clone() })?;

    let (head_rows, body_rows) = split_rows(table);
    if head_rows.is_empty() && body_rows.is_empty() {
        return Err(ExtractError::Empty(table_id));
    }

    let header = expand_spans(&head_rows);
    let body = expand_spans(&body_rows);

    let width = header.iter().chain(body.iter()).map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return Err(ExtractError::Empty(table_id));
    }

    let columns = if header.is_empty() {
        (0..width).map(|col| col.to_string()).collect()
    } else {
        let padded: Vec<Vec<String>> = header.into_iter().map(|row| pad(row, width)).collect();
        flatten_columns(&padded)
    };
    let rows = body.into_iter().map(|row| pad(row, width)).collect();

    Ok(ExtractedTable { caption, table_id, columns, rows })
}

/// Collapse multi-row headers into one label per column.
///
/// `levels[r][c]` is the text of header row `r` over column `c`. Empty levels
/// and a level repeating the one above it are skipped; the rest are joined
/// with a single space. A column left without any label is named by its index.
pub fn flatten_columns(levels: &[Vec<String>]) -> Vec<String> {
    let width = levels.iter().map(Vec::len).max().unwrap_or(0);

    (0..width)
        .map(|col| {
            let mut parts: Vec<&str> = Vec::new();
            for level in levels {
                let text = level.get(col).map(|s| s.trim()).unwrap_or("");
                if text.is_empty() || parts.last() == Some(&text) {
                    continue;
                }
                parts.push(text);
            }

            let label = parts.join(" ").trim().to_string();
            if label.is_empty() {
                col.to_string()
            } else {
                label
            }
        })
        .collect()
}

/// Direct element children of `parent` with the given tag name
fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent.children().filter_map(ElementRef::wrap).filter(move |el| el.value().name() == name)
}

/// Text content with whitespace runs collapsed
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_span(cell: ElementRef<'_>, attr: &str) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_SPAN)
}

fn row_cells(row: ElementRef<'_>) -> Vec<Cell> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .map(|el| Cell {
            text: element_text(el),
            is_header: el.value().name() == "th",
            colspan: parse_span(el, "colspan"),
            rowspan: parse_span(el, "rowspan"),
        })
        .collect()
}

/// Split the table's own rows into header rows and body rows.
///
/// Header rows are those of `<thead>`; without a `<thead>` they are the
/// leading rows made only of `<th>` cells. Rows of nested tables are not
/// visited.
fn split_rows(table: ElementRef<'_>) -> (Vec<Vec<Cell>>, Vec<Vec<Cell>>) {
    let mut head = Vec::new();
    let mut body = Vec::new();

    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "thead" => head.extend(child_elements(child, "tr").map(row_cells)),
            "tbody" | "tfoot" => body.extend(child_elements(child, "tr").map(row_cells)),
            "tr" => body.push(row_cells(child)),
            _ => {}
        }
    }

    if head.is_empty() {
        let leading = body
            .iter()
            .take_while(|row| !row.is_empty() && row.iter().all(|cell| cell.is_header))
            .count();
        // A table made only of <th> rows keeps them as data.
        if leading < body.len() {
            head = body.drain(..leading).collect();
        }
    }

    (head, body)
}

/// Lay rows out on a grid, repeating spanned cells into every slot they cover
fn expand_spans(rows: &[Vec<Cell>]) -> Vec<Vec<String>> {
    let mut grid: Vec<Vec<Option<String>>> = vec![Vec::new(); rows.len()];

    for (r, cells) in rows.iter().enumerate() {
        let mut col = 0;
        for cell in cells {
            while grid[r].get(col).is_some_and(Option::is_some) {
                col += 1;
            }

            let last_row = (r + cell.rowspan).min(rows.len());
            for target in grid.iter_mut().take(last_row).skip(r) {
                if target.len() < col + cell.colspan {
                    target.resize(col + cell.colspan, None);
                }
                for slot in &mut target[col..col + cell.colspan] {
                    *slot = Some(cell.text.clone());
                }
            }

            col += cell.colspan;
        }
    }

    grid.into_iter()
        .map(|row| row.into_iter().map(Option::unwrap_or_default).collect())
        .collect()
}

fn pad(mut row: Vec<String>, width: usize) -> Vec<String> {
    row.resize(width, String::new());
    row
}
