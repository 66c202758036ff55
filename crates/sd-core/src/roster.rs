use std::collections::HashSet;

use crate::competitor::{Competitor, CompetitorId};
use crate::error::{CoreError, CoreResult};

/// A non-empty, ordered list of distinct competitors.
///
/// Competitors are distinct by ID and by name (ignoring ASCII case).
/// Operators pick competitors by name, so two entrants may not share one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    competitors: Vec<Competitor>,
}

impl Roster {
    /// Validate and wrap a list of competitors.
    pub fn new(competitors: Vec<Competitor>) -> CoreResult<Self> {
        if competitors.is_empty() {
            return Err(CoreError::EmptyRoster);
        }
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for c in &competitors {
            if !ids.insert(c.id) || !names.insert(c.name.to_ascii_lowercase()) {
                return Err(CoreError::DuplicateCompetitor(c.name.clone()));
            }
        }
        Ok(Self { competitors })
    }

    /// Build a roster from `(name, house)` pairs.
    pub fn from_entries<I, N, H>(entries: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (N, H)>,
        N: Into<String>,
        H: Into<String>,
    {
        let competitors = entries
            .into_iter()
            .map(|(name, house)| Competitor::new(name, house))
            .collect::<CoreResult<Vec<_>>>()?;
        Self::new(competitors)
    }

    /// The competitors, in roster order.
    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    /// Number of competitors (never zero).
    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }

    /// Look up a competitor by ID.
    pub fn get(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    /// Find a competitor by name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Competitor> {
        self.competitors
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Consume the roster, yielding its competitors.
    pub fn into_competitors(self) -> Vec<Competitor> {
        self.competitors
    }
}
