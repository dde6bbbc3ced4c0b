//! Table materialization from grids and from table markup.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{CELL_ELEMENT, ROW_ELEMENT, TABLE_ELEMENT};
use crate::error::{Error, Result};
use crate::model::{
    Alignment, Paragraph, Table, TableCell, TableGrid, TableRow, TableStyle, TableWidth, TextRun,
};

/// Parser states for the table-markup state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Between rows (or before/after the table element)
    Outside,
    /// Inside a `tbl:tr`, collecting cells
    InRow,
    /// Inside a `tbl:tc`, collecting literal text
    InCell,
}

fn is_dialect(name: &[u8]) -> bool {
    name == TABLE_ELEMENT || name == ROW_ELEMENT || name == CELL_ELEMENT
}

/// Builds structured tables from string grids or from table markup.
///
/// The two construction paths produce the same [`Table`] shape but differ in
/// styling: grids get uniform unstyled cells, markup gets a bold, shaded,
/// repeating header row.
#[derive(Debug, Clone, Default)]
pub struct TableMaterializer;

impl TableMaterializer {
    /// Create a new materializer.
    pub fn new() -> Self {
        Self
    }

    /// Build a table from a plain string grid.
    ///
    /// All four edges and interior lines get single-line borders; width is
    /// automatic; every row, including row 0, gets uniform non-bold,
    /// non-shaded cells. A missing or empty cell value becomes an empty
    /// string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the grid has no rows.
    pub fn build_from_grid(&self, grid: &TableGrid) -> Result<Table> {
        if grid.is_empty() {
            return Err(Error::InvalidArgument(
                "cannot build a table from an empty grid".into(),
            ));
        }

        let mut table = Table::new(TableStyle::default());
        for row in grid {
            let cells = row.iter().map(TableCell::text).collect();
            table.add_row(TableRow::new(cells));
        }
        Ok(table)
    }

    /// Parse the table-markup dialect into a table.
    ///
    /// Drives an explicit `{Outside, InRow, InCell}` state machine over the
    /// tokenizer's event stream. The first row is flagged as the header:
    /// bold text, shaded cell background, marked as repeating. Cell inner
    /// markup is flattened verbatim into the cell's literal text; embedded
    /// sub-markup is not independently interpreted.
    ///
    /// Nested tables, rows, and cells are not supported and fail fast.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MarkupParse`] on nested or misplaced dialect tokens
    /// and on a row or cell left unterminated at end of input, naming the
    /// open token and the tokenizer's byte position.
    pub fn parse_markup(&self, markup: &str) -> Result<Table> {
        let mut reader = Reader::from_str(markup);
        // The state machine owns all structural validation, including
        // unterminated tokens at end of input.
        reader.config_mut().check_end_names = false;

        // Table-wide styling is fixed for the markup path and built once.
        let mut table = Table::new(TableStyle {
            width: TableWidth::Percent(100),
            banded: true,
            ..TableStyle::default()
        });

        let mut state = ParseState::Outside;
        let mut header_seen = false;
        let mut in_header_row = false;
        let mut row: Vec<TableCell> = Vec::new();
        let mut cell_text = String::new();

        loop {
            let position = reader.buffer_position() as u64;
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = e.name();
                    let name = name.as_ref();
                    match state {
                        ParseState::Outside => {
                            if name == ROW_ELEMENT {
                                state = ParseState::InRow;
                                in_header_row = !header_seen;
                                row = Vec::new();
                            } else if name == CELL_ELEMENT {
                                return Err(Error::markup(
                                    "<tbl:tc> outside a row",
                                    position,
                                ));
                            }
                            // The enclosing <tbl:table> and any foreign
                            // markup between rows carry no state.
                        }
                        ParseState::InRow => {
                            if name == CELL_ELEMENT {
                                state = ParseState::InCell;
                                cell_text.clear();
                            } else if is_dialect(name) {
                                // Depth guard: nested table/row tokens fail
                                // fast instead of silently restructuring.
                                return Err(Error::markup(
                                    format!(
                                        "nested <{}> inside a row",
                                        String::from_utf8_lossy(name)
                                    ),
                                    position,
                                ));
                            }
                        }
                        ParseState::InCell => {
                            if is_dialect(name) {
                                return Err(Error::markup(
                                    format!(
                                        "nested <{}> inside a cell",
                                        String::from_utf8_lossy(name)
                                    ),
                                    position,
                                ));
                            }
                            // Foreign markup inside a cell is flattened
                            // into the literal text, not interpreted. The
                            // tag is re-emitted verbatim, attributes and all.
                            cell_text.push('<');
                            cell_text.push_str(&String::from_utf8_lossy(&e));
                            cell_text.push('>');
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let name = e.name();
                    let name = name.as_ref();
                    match state {
                        ParseState::Outside => {
                            if name == ROW_ELEMENT {
                                // A self-closing row is a row with no cells.
                                let mut table_row = TableRow::new(Vec::new());
                                if !header_seen {
                                    table_row.is_header = true;
                                    header_seen = true;
                                    table.header_rows = 1;
                                }
                                table.add_row(table_row);
                            } else if name == CELL_ELEMENT {
                                return Err(Error::markup(
                                    "<tbl:tc> outside a row",
                                    position,
                                ));
                            }
                        }
                        ParseState::InRow => {
                            if name == CELL_ELEMENT {
                                // A self-closing cell holds the empty string.
                                row.push(build_cell("", in_header_row));
                            } else if is_dialect(name) {
                                return Err(Error::markup(
                                    format!(
                                        "nested <{}> inside a row",
                                        String::from_utf8_lossy(name)
                                    ),
                                    position,
                                ));
                            }
                        }
                        ParseState::InCell => {
                            if is_dialect(name) {
                                return Err(Error::markup(
                                    format!(
                                        "nested <{}> inside a cell",
                                        String::from_utf8_lossy(name)
                                    ),
                                    position,
                                ));
                            }
                            cell_text.push('<');
                            cell_text.push_str(&String::from_utf8_lossy(&e));
                            cell_text.push_str("/>");
                        }
                    }
                }
                Ok(Event::End(e)) => {
                    let name = e.name();
                    let name = name.as_ref();
                    match state {
                        ParseState::InCell => {
                            if name == CELL_ELEMENT {
                                row.push(build_cell(&cell_text, in_header_row));
                                state = ParseState::InRow;
                            } else if is_dialect(name) {
                                return Err(Error::markup(
                                    format!(
                                        "</{}> closed before the open <tbl:tc>",
                                        String::from_utf8_lossy(name)
                                    ),
                                    position,
                                ));
                            } else {
                                cell_text.push_str("</");
                                cell_text.push_str(&String::from_utf8_lossy(name));
                                cell_text.push('>');
                            }
                        }
                        ParseState::InRow => {
                            if name == ROW_ELEMENT {
                                let mut table_row = TableRow::new(std::mem::take(&mut row));
                                if in_header_row {
                                    table_row.is_header = true;
                                    header_seen = true;
                                    table.header_rows = 1;
                                }
                                table.add_row(table_row);
                                state = ParseState::Outside;
                            } else if is_dialect(name) {
                                return Err(Error::markup(
                                    format!(
                                        "</{}> closed before the open <tbl:tr>",
                                        String::from_utf8_lossy(name)
                                    ),
                                    position,
                                ));
                            }
                        }
                        ParseState::Outside => {
                            if name == ROW_ELEMENT || name == CELL_ELEMENT {
                                return Err(Error::markup(
                                    format!(
                                        "unmatched </{}>",
                                        String::from_utf8_lossy(name)
                                    ),
                                    position,
                                ));
                            }
                        }
                    }
                }
                Ok(Event::Text(e)) => {
                    if state == ParseState::InCell {
                        let text = e
                            .unescape()
                            .map_err(|err| Error::markup(err.to_string(), position))?;
                        cell_text.push_str(&text);
                    }
                }
                Ok(Event::Comment(e)) => {
                    if state == ParseState::InCell {
                        cell_text.push_str("<!--");
                        cell_text.push_str(&String::from_utf8_lossy(&e));
                        cell_text.push_str("-->");
                    }
                }
                Ok(Event::CData(e)) => {
                    if state == ParseState::InCell {
                        cell_text.push_str("<![CDATA[");
                        cell_text.push_str(&String::from_utf8_lossy(&e));
                        cell_text.push_str("]]>");
                    }
                }
                Ok(Event::Eof) => match state {
                    ParseState::Outside => break,
                    ParseState::InRow => {
                        return Err(Error::markup("unterminated <tbl:tr>", position));
                    }
                    ParseState::InCell => {
                        return Err(Error::markup("unterminated <tbl:tc>", position));
                    }
                },
                Ok(_) => {}
                Err(e) => return Err(Error::markup(e.to_string(), position)),
            }
        }

        log::debug!(
            "parsed table markup: {} rows, {} columns",
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }
}

/// Build a centered single-paragraph cell; header cells get a bold run and
/// shaded background.
fn build_cell(text: &str, header: bool) -> TableCell {
    let mut paragraph = Paragraph::new();
    if header {
        paragraph.add_run(TextRun::bold(text));
    } else {
        paragraph.add_run(TextRun::new(text));
    }
    TableCell::with_paragraph(paragraph)
        .align(Alignment::Center)
        .shade(header)
}
