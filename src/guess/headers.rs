//! Header row detection

use rustc_hash::FxHashMap;

use crate::model::Row;

fn filled(row: &Row) -> usize {
    row.iter().filter(|cell| !cell.is_empty()).count()
}

/// Most common count of non-empty cells among rows with more than one.
///
/// Ties go to the wider count. Returns 0 when no row qualifies.
pub fn column_count_modal(rows: &[Row]) -> usize {
    let mut counts: FxHashMap<usize, usize> = FxHashMap::default();
    for row in rows {
        let length = filled(row);
        if length > 1 {
            *counts.entry(length).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .max_by_key(|&(length, seen)| (seen, length))
        .map(|(length, _)| length)
        .unwrap_or(0)
}

/// Find the header row: the first row at least as full as the modal row
/// width, minus `tolerance`.
///
/// Returns the row's index within `rows` and its values as text.
pub fn headers_guess(rows: &[Row], tolerance: usize) -> Option<(usize, Vec<String>)> {
    let modal = column_count_modal(rows);
    if modal == 0 {
        return None;
    }
    let threshold = modal.saturating_sub(tolerance);

    rows.iter().enumerate().find_map(|(index, row)| {
        (filled(row) >= threshold).then(|| {
            let headers = row
                .iter()
                .map(|cell| cell.value.display().trim().to_string())
                .collect();
            (index, headers)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::row_from_values;

    fn rows(data: Vec<Vec<&str>>) -> Vec<Row> {
        data.into_iter().map(row_from_values).collect()
    }

    #[test]
    fn test_modal_count() {
        let sample = rows(vec![
            vec!["title", "", ""],
            vec!["a", "b", "c"],
            vec!["1", "2", "3"],
            vec!["4", "", "6"],
        ]);
        assert_eq!(column_count_modal(&sample), 3);
        assert_eq!(column_count_modal(&rows(vec![vec!["x"]])), 0);
    }

    #[test]
    fn test_skips_title_rows() {
        let sample = rows(vec![
            vec!["Quarterly report", "", ""],
            vec!["", "", ""],
            vec![" region ", "sales", "year"],
            vec!["north", "10", "2020"],
            vec!["south", "12", "2020"],
        ]);
        let (index, headers) = headers_guess(&sample, 1).unwrap();
        assert_eq!(index, 2);
        assert_eq!(headers, vec!["region", "sales", "year"]);
    }

    #[test]
    fn test_tolerance_accepts_sparse_header() {
        let sample = rows(vec![
            vec!["id", "", "name"],
            vec!["1", "x", "a"],
            vec!["2", "y", "b"],
        ]);
        assert_eq!(headers_guess(&sample, 1).unwrap().0, 0);
        assert_eq!(headers_guess(&sample, 0).unwrap().0, 1);
    }

    #[test]
    fn test_no_candidate_rows() {
        assert_eq!(headers_guess(&[], 1), None);
        assert_eq!(headers_guess(&rows(vec![vec!["a"], vec!["b"]]), 1), None);
    }
}
