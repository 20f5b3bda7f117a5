//! Interactive selection of discovered games.

use std::io::Write;

use sunray_model::GameRecord;

/// A selection string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("empty selection")]
    Empty,
    #[error("invalid selection '{0}'")]
    InvalidToken(String),
    #[error("{0} is out of range (1-{1})")]
    OutOfRange(usize, usize),
}

/// Parses a selection like `all`, `3`, `1,4` or `2-9` against a list of
/// `count` items, returning zero-based indices in list order.
pub fn parse_selection(input: &str, count: usize) -> Result<Vec<usize>, SelectionError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SelectionError::Empty);
    }
    if input.eq_ignore_ascii_case("all") {
        return Ok((0..count).collect());
    }

    let mut picked = vec![false; count];
    for token in input.split(',') {
        let token = token.trim();
        let (start, end) = match token.split_once('-') {
            Some((a, b)) => (parse_number(a)?, parse_number(b)?),
            None => {
                let n = parse_number(token)?;
                (n, n)
            }
        };

        if start == 0 || end > count || start > end {
            let bad = if start == 0 || start > count { start } else { end };
            return Err(SelectionError::OutOfRange(bad, count));
        }
        for i in start..=end {
            picked[i - 1] = true;
        }
    }

    Ok(picked
        .iter()
        .enumerate()
        .filter(|&(_, &p)| p)
        .map(|(i, _)| i)
        .collect())
}

fn parse_number(token: &str) -> Result<usize, SelectionError> {
    token
        .trim()
        .parse()
        .map_err(|_| SelectionError::InvalidToken(token.trim().to_string()))
}

/// Prints the discovered games and prompts until a valid selection is read.
///
/// Returns `None` when stdin closes without a selection.
pub fn prompt(records: &[GameRecord]) -> anyhow::Result<Option<Vec<usize>>> {
    println!("\nDiscovered games:");
    for (i, record) in records.iter().enumerate() {
        println!("  {:>3}. {} [{}]", i + 1, record.name, record.source);
    }

    let stdin = std::io::stdin();
    loop {
        print!("\nSelect games to import (e.g. 1,3-5 or all): ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match parse_selection(&line, records.len()) {
            Ok(indices) => return Ok(Some(indices)),
            Err(e) => println!("{e}"),
        }
    }
}
