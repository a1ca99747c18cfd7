//! Plain-text rendering shared by the console and the CLI.

use crate::core::store::GarageStore;
use crate::vehicles::{VehicleKind, VehicleRecord};
use std::collections::BTreeMap;

/// Single-line preview of user input: runs of whitespace become one space and
/// anything past `max_chars` characters is replaced by `...`.
pub fn one_line(input: &str, max_chars: usize) -> String {
    let mut line = String::with_capacity(input.len());
    for (i, word) in input.split_whitespace().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        line.push_str(word);
    }
    if let Some((cut, _)) = line.char_indices().nth(max_chars) {
        line.truncate(cut);
        line.push_str("...");
    }
    line
}

pub fn garage_status<T: VehicleRecord>(id: usize, garage: &GarageStore<T>) -> String {
    format!(
        "Garage {}: {}/{} spaces used (capacity {})",
        id,
        garage.used_spaces(),
        garage.vehicle_limit(),
        garage.capacity()
    )
}

/// One vehicle per line, numbered from 1. Empty input renders a placeholder.
pub fn numbered<I>(lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let out = lines
        .into_iter()
        .enumerate()
        .map(|(i, l)| format!("{:>3}. {}", i + 1, l))
        .collect::<Vec<_>>();
    if out.is_empty() {
        "(no vehicles)".to_string()
    } else {
        out.join("\n")
    }
}

pub fn kind_counts(counts: &BTreeMap<VehicleKind, usize>) -> String {
    if counts.is_empty() {
        return "(no vehicles)".to_string();
    }
    counts
        .iter()
        .map(|(kind, n)| format!("{}: {}", kind, n))
        .collect::<Vec<_>>()
        .join(", ")
}
