use std::collections::{HashMap, HashSet};

use crate::model::{Cell, CleanedTable, RawTable};
use crate::options::HeaderPolicy;

/// True when every cell of `row` is absent or empty.
#[must_use]
pub fn is_blank_row(row: &[Cell]) -> bool {
    row.iter()
        .all(|cell| cell.as_deref().is_none_or(str::is_empty))
}

/// Blank labels become `Unnamed: {index}`. A repeat takes the next
/// `label.N` suffix that no earlier column already uses.
fn dedupe_labels(labels: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    labels
        .into_iter()
        .enumerate()
        .map(|(index, label)| {
            let label = if label.is_empty() {
                format!("Unnamed: {index}")
            } else {
                label
            };
            let mut out = label.clone();
            if used.contains(&out) {
                let suffix = next_suffix.entry(label.clone()).or_insert(1);
                loop {
                    out = format!("{label}.{suffix}");
                    *suffix += 1;
                    if !used.contains(&out) {
                        break;
                    }
                }
            }
            used.insert(out.clone());
            out
        })
        .collect()
}

/// Promotes row 0 to column labels and drops fully-empty data rows.
///
/// A table without rows cleans to an empty table. Cell text is never
/// trimmed or converted.
#[must_use]
pub fn clean_table(table: RawTable, policy: HeaderPolicy) -> CleanedTable {
    let page = table.page;
    let mut rows = table.rows.into_iter();
    let Some(header) = rows.next() else {
        return CleanedTable {
            page,
            ..CleanedTable::default()
        };
    };

    let labels = header
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect::<Vec<_>>();
    let columns = match policy {
        HeaderPolicy::Verbatim => labels,
        HeaderPolicy::Dedupe => dedupe_labels(labels),
    };

    let rows = rows.filter(|row| !is_blank_row(row)).collect();

    CleanedTable {
        page,
        columns,
        rows,
    }
}
