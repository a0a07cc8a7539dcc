//! Command-script drivers for the frontier containers.
//!
//! A script starts with the number of commands that follow. Heap scripts use
//! `PUSH x y priority` and `POP`; index scripts use `SET x y value`,
//! `GET x y` and `POP x y`. Each command that reads something produces one
//! output line.

use anyhow::{anyhow, Context};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

use crate::common::Coord;
use crate::frontier::{IndexedPriorityQueue, PositionIndex};

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Tokens {
            inner: input.split_whitespace(),
        }
    }

    fn word(&mut self) -> anyhow::Result<&'a str> {
        self.inner
            .next()
            .ok_or_else(|| anyhow!("unexpected end of script"))
    }

    fn parse<T>(&mut self, what: &str) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let word = self.word().with_context(|| format!("missing {what}"))?;
        word.parse()
            .map_err(|e| anyhow!("bad {what} `{word}`: {e}"))
    }

    fn coord(&mut self) -> anyhow::Result<Coord> {
        let x = self.parse("x")?;
        let y = self.parse("y")?;
        Ok(Coord::new(x, y))
    }
}

pub fn run_heap_script(input: &str, buckets: usize) -> anyhow::Result<Vec<String>> {
    let mut tokens = Tokens::new(input);
    let count: usize = tokens.parse("command count")?;
    let mut heap = IndexedPriorityQueue::new(PositionIndex::for_coords(buckets)?);
    let mut output = Vec::new();

    for line in 0..count {
        match tokens.word()? {
            "PUSH" => {
                let coord = tokens.coord()?;
                let priority: f64 = tokens.parse("priority")?;
                if !priority.is_finite() {
                    return Err(anyhow!(
                        "command {}: priority must be finite, got {priority}",
                        line + 1
                    ));
                }
                let outcome = heap.push_or_improve(coord, coord, priority);
                debug!("PUSH {coord} {priority}: {outcome:?}");
            }
            "POP" => {
                let priority = heap
                    .peek_min_priority()
                    .with_context(|| format!("command {}", line + 1))?;
                let coord = heap.pop_min()?;
                output.push(format!("{} {} {}", coord.x, coord.y, priority));
            }
            other => return Err(anyhow!("unknown heap command `{other}`")),
        }
    }

    Ok(output)
}

pub fn run_index_script(input: &str, buckets: usize) -> anyhow::Result<Vec<String>> {
    let mut tokens = Tokens::new(input);
    let count: usize = tokens.parse("command count")?;
    let mut index: PositionIndex<Coord, i64> = PositionIndex::for_coords(buckets)?;
    let mut output = Vec::new();

    let show = |value: Option<i64>| value.map_or_else(|| "none".to_string(), |v| v.to_string());

    for _ in 0..count {
        match tokens.word()? {
            "SET" => {
                let coord = tokens.coord()?;
                let value = tokens.parse("value")?;
                index.set(coord, value);
            }
            "GET" => {
                let coord = tokens.coord()?;
                output.push(show(index.get(&coord).copied()));
            }
            "POP" => {
                let coord = tokens.coord()?;
                output.push(show(index.pop(&coord)));
            }
            other => return Err(anyhow!("unknown index command `{other}`")),
        }
    }

    debug!(
        "index holds {} entries in {} of {} buckets",
        index.len(),
        index.used_buckets(),
        index.table_size()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;

    #[test]
    fn test_heap_script() {
        let script = "8
            PUSH 1 1 5
            PUSH 2 2 3
            PUSH 1 1 2
            PUSH 3 3 9
            PUSH 2 2 7
            POP
            POP
            POP";
        let output = run_heap_script(script, 19).unwrap();
        assert_eq!(output, vec!["1 1 2", "2 2 3", "3 3 9"]);
    }

    #[test]
    fn test_heap_script_pop_empty() {
        let err = run_heap_script("1\nPOP", 19).unwrap_err();
        assert_eq!(
            err.root_cause().downcast_ref::<SearchError>(),
            Some(&SearchError::EmptyQueue)
        );
    }

    #[test]
    fn test_heap_script_rejects_non_finite_priority() {
        let script = "5
            PUSH 1 1 NaN
            PUSH 2 2 5
            PUSH 3 3 1
            POP
            POP";
        let err = run_heap_script(script, 19).unwrap_err();
        assert!(err.to_string().contains("finite"), "{err}");

        assert!(run_heap_script("2\nPUSH 1 1 inf\nPOP", 19).is_err());
        assert!(run_heap_script("2\nPUSH 1 1 -inf\nPOP", 19).is_err());
        assert_eq!(run_heap_script("2\nPUSH 1 1 -2.5\nPOP", 19).unwrap(), vec!["1 1 -2.5"]);
    }

    #[test]
    fn test_index_script() {
        let script = "7
            SET 2 3 10
            SET 3 2 20
            GET 2 3
            SET 2 3 11
            GET 2 3
            POP 3 2
            GET 3 2";
        let output = run_index_script(script, 1).unwrap();
        assert_eq!(output, vec!["10", "11", "20", "none"]);
    }

    #[test]
    fn test_malformed_scripts() {
        assert!(run_heap_script("2\nPUSH 1 1 4", 19).is_err());
        assert!(run_heap_script("1\nPEEK", 19).is_err());
        assert!(run_index_script("1\nSET 1 x 3", 19).is_err());
        assert!(run_index_script("1\nGET 1 1", 0).is_err());
    }
}
