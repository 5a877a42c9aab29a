//! Cheapest-first fill planning for buy orders.
//!
//! Planning never touches the book. The caller applies a [`FillPlan`] only
//! once it exists, which makes a trade all-or-nothing.

use crate::models::{Price, Volume};

/// A non-expired quote eligible for matching, identified by its storage key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offer {
    pub key: usize,
    pub price: Price,
    pub available: Volume,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedFill {
    pub key: usize,
    pub price: Price,
    pub volume: Volume,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillPlan {
    pub fills: Vec<PlannedFill>,
}

impl FillPlan {
    pub fn executed_volume(&self) -> u64 {
        self.fills.iter().map(|fill| u64::from(fill.volume)).sum()
    }

    pub fn volume_weighted_average_price(&self) -> Price {
        let executed = self.executed_volume();
        if executed == 0 {
            return 0.0;
        }
        let notional: f64 = self
            .fills
            .iter()
            .map(|fill| fill.price * f64::from(fill.volume))
            .sum();
        notional / executed as f64
    }

    pub fn last(&self) -> Option<&PlannedFill> {
        self.fills.last()
    }
}

/// Total volume across `offers`, saturating rather than overflowing.
pub fn available_volume(offers: &[Offer]) -> u64 {
    offers
        .iter()
        .fold(0u64, |acc, offer| acc.saturating_add(u64::from(offer.available)))
}

/// Plans a buy of `requested` against `offers`.
///
/// Offers are walked by ascending price; the sort is stable so equal
/// prices keep their input order. Returns `None` when the offers cannot
/// fill the whole request.
pub fn plan_buy(mut offers: Vec<Offer>, requested: Volume) -> Option<FillPlan> {
    if requested == 0 || available_volume(&offers) < u64::from(requested) {
        return None;
    }
    offers.sort_by(|a, b| a.price.total_cmp(&b.price));

    let mut remaining = requested;
    let mut fills = Vec::new();
    for offer in offers {
        if remaining == 0 {
            break;
        }
        if offer.available == 0 {
            continue;
        }
        let volume = remaining.min(offer.available);
        remaining -= volume;
        fills.push(PlannedFill {
            key: offer.key,
            price: offer.price,
            volume,
        });
    }

    debug_assert_eq!(remaining, 0);
    Some(FillPlan { fills })
}
