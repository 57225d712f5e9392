use serde::Serialize;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Opaque line item identifier. Ids are drawn from a per-document counter
/// and never reused, so a removed item's id stays dead for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub(crate) u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(ItemId)
    }
}

/// A billable row: description, quantity, rate and the derived amount.
///
/// `amount` is read-only from the outside. It is recomputed as
/// `quantity * rate` whenever either factor changes.
#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    pub id: ItemId,
    pub description: String,
    pub quantity: f64,
    pub rate: f64,
    pub amount: f64,
}

impl LineItem {
    pub(crate) fn new(id: ItemId) -> Self {
        Self {
            id,
            description: String::new(),
            quantity: 1.0,
            rate: 0.0,
            amount: 0.0,
        }
    }

    pub(crate) fn recompute_amount(&mut self) {
        self.amount = self.quantity * self.rate;
    }
}
