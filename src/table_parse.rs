/// Splits a text line into cells on tabs or runs of two or more spaces.
pub(crate) fn split_line_into_cells(line: &str) -> Vec<String> {
    fn flush(current: &mut String, cells: &mut Vec<String>) {
        let cell = current.trim();
        if !cell.is_empty() {
            cells.push(cell.to_string());
        }
        current.clear();
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut whitespace_run = 0_usize;

    for ch in trimmed.chars() {
        if ch == '\t' {
            flush(&mut current, &mut cells);
            whitespace_run = 0;
            continue;
        }

        if ch.is_whitespace() {
            whitespace_run += 1;
            if whitespace_run >= 2 {
                flush(&mut current, &mut cells);
            } else {
                current.push(' ');
            }
            continue;
        }

        whitespace_run = 0;
        current.push(ch);
    }
    flush(&mut current, &mut cells);

    cells
}

pub(crate) fn soft_split_line_into_cells(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Cells of one table-like line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowCells {
    pub cells: Vec<String>,
    /// Split on single spaces only, so cell boundaries are a guess.
    pub soft: bool,
}

/// Returns the cells of `line` when it reads as a table row of at least
/// `min_cols` cells.
///
/// Lines that only separate on single spaces must carry a digit and must not
/// end like a sentence, so titles and prose stay out of tables.
pub(crate) fn table_row_cells(line: &str, min_cols: usize) -> Option<RowCells> {
    let cells = split_line_into_cells(line);
    if cells.len() >= min_cols {
        return Some(RowCells { cells, soft: false });
    }

    let cells = soft_split_line_into_cells(line);
    if cells.len() < min_cols {
        return None;
    }

    let has_digit = line.chars().any(|ch| ch.is_ascii_digit());
    let looks_like_sentence = line.trim_end().ends_with(['.', '!', '?']);
    (has_digit && !looks_like_sentence).then_some(RowCells { cells, soft: true })
}
