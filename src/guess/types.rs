//! Column type inference from sample rows

use crate::model::{CellType, Row};

/// Guess one type per column position from `rows`.
///
/// Lenient mode scores each candidate by the summed weight of the values it
/// accepts. Strict mode keeps only candidates that accept every value and
/// picks the heaviest. Columns with no values, or with no surviving
/// candidate, fall back to `String`.
pub fn type_guess(rows: &[Row], candidates: &[CellType], strict: bool) -> Vec<CellType> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|column| {
            if strict {
                guess_strict(rows, column, candidates)
            } else {
                guess_lenient(rows, column, candidates)
            }
        })
        .collect()
}

fn guess_lenient(rows: &[Row], column: usize, candidates: &[CellType]) -> CellType {
    let mut scores = vec![0u32; candidates.len()];
    let mut seen_value = false;

    for cell in rows.iter().filter_map(|row| row.get(column)) {
        if cell.is_empty() {
            continue;
        }
        seen_value = true;
        for (score, candidate) in scores.iter_mut().zip(candidates) {
            if candidate.test(&cell.value) {
                *score += candidate.guessing_weight();
            }
        }
    }

    if !seen_value {
        return CellType::String;
    }
    best(candidates.iter().zip(scores).filter(|(_, score)| *score > 0))
}

fn guess_strict(rows: &[Row], column: usize, candidates: &[CellType]) -> CellType {
    let mut alive = vec![true; candidates.len()];
    let mut seen_value = false;

    for cell in rows.iter().filter_map(|row| row.get(column)) {
        if cell.is_empty() {
            continue;
        }
        seen_value = true;
        for (alive, candidate) in alive.iter_mut().zip(candidates) {
            if *alive && !candidate.test(&cell.value) {
                *alive = false;
            }
        }
    }

    if !seen_value {
        return CellType::String;
    }
    best(
        candidates
            .iter()
            .zip(alive)
            .filter(|(_, alive)| *alive)
            .map(|(candidate, _)| (candidate, candidate.guessing_weight())),
    )
}

/// Highest score, then highest weight, then earliest candidate
fn best<'a>(scored: impl Iterator<Item = (&'a CellType, u32)>) -> CellType {
    let mut winner: Option<(&CellType, u32)> = None;
    for (candidate, score) in scored {
        let better = match winner {
            None => true,
            Some((current, current_score)) => {
                (score, candidate.guessing_weight()) > (current_score, current.guessing_weight())
            }
        };
        if better {
            winner = Some((candidate, score));
        }
    }
    winner
        .map(|(candidate, _)| candidate.clone())
        .unwrap_or_default()
}
