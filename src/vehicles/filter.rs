//! Composable vehicle predicates and grouping for garage queries.
//!
//! Filters never touch slot layout; they run over whatever iterator
//! [`GarageStore::perform_query`](crate::core::store::GarageStore::perform_query) hands them.

use super::{Color, VehicleKind, VehicleRecord};
use crate::core::error::GarageError;
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compare {
    Equal,
    GreaterThan,
    LessThan,
}

impl Compare {
    pub fn holds(&self, actual: u32, expected: u32) -> bool {
        match self {
            Compare::Equal => actual == expected,
            Compare::GreaterThan => actual > expected,
            Compare::LessThan => actual < expected,
        }
    }
}

impl FromStr for Compare {
    type Err = GarageError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" | "==" | "eq" => Ok(Compare::Equal),
            ">" | "gt" => Ok(Compare::GreaterThan),
            "<" | "lt" => Ok(Compare::LessThan),
            other => Err(GarageError::ValidationError(format!(
                "unknown comparison '{}' (expected =, > or <)",
                other
            ))),
        }
    }
}

/// Conjunction of optional criteria. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleFilter {
    kind: Option<VehicleKind>,
    color: Option<Color>,
    wheels: Option<(Compare, u32)>,
}

impl VehicleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: VehicleKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn wheels(mut self, cmp: Compare, count: u32) -> Self {
        self.wheels = Some((cmp, count));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.color.is_none() && self.wheels.is_none()
    }

    pub fn matches<V: VehicleRecord + ?Sized>(&self, v: &V) -> bool {
        self.kind.is_none_or(|k| v.kind() == k)
            && self.color.is_none_or(|c| v.color() == c)
            && self
                .wheels
                .is_none_or(|(cmp, count)| cmp.holds(v.wheels(), count))
    }

    /// Parses console criteria such as `kind=car color=red wheels>2`.
    pub fn parse_terms<'a, I>(terms: I) -> Result<Self, GarageError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut filter = VehicleFilter::new();
        for term in terms {
            if let Some(kind) = term.strip_prefix("kind=") {
                filter = filter.kind(kind.parse()?);
            } else if let Some(color) = term.strip_prefix("color=") {
                filter = filter.color(color.parse()?);
            } else if let Some(rest) = term.strip_prefix("wheels") {
                let split = rest
                    .find(|c: char| c.is_ascii_digit())
                    .ok_or_else(|| bad_term(term))?;
                let (op, count) = rest.split_at(split);
                let count = count.parse::<u32>().map_err(|_| bad_term(term))?;
                filter = filter.wheels(op.parse()?, count);
            } else {
                return Err(bad_term(term));
            }
        }
        Ok(filter)
    }
}

fn bad_term(term: &str) -> GarageError {
    GarageError::ValidationError(format!(
        "unrecognized filter '{}' (use kind=<kind>, color=<color>, wheels<op><n>)",
        term
    ))
}

/// Number of vehicles per kind, only listing kinds that occur.
pub fn count_by_kind<'a, V, I>(vehicles: I) -> BTreeMap<VehicleKind, usize>
where
    V: VehicleRecord + 'a,
    I: IntoIterator<Item = &'a V>,
{
    let mut counts = BTreeMap::new();
    for v in vehicles {
        *counts.entry(v.kind()).or_insert(0) += 1;
    }
    counts
}
