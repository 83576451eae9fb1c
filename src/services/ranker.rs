//! Top movers
//!
//! Gainers: positive daily change, descending. Losers: negative daily change, ascending.
//! Sorting is stable, so equal changes keep their input order.

use std::cmp::Ordering;

use crate::models::Quote;

/// Default number of movers per side
pub const DEFAULT_MOVERS: usize = 5;

/// Split quotes into top gainers and top losers by daily change
pub fn rank(quotes: &[Quote], limit: usize) -> (Vec<Quote>, Vec<Quote>) {
    let with_change: Vec<(&Quote, f64)> = quotes
        .iter()
        .filter_map(|q| q.daily_change().filter(|c| c.is_finite()).map(|c| (q, c)))
        .collect();

    let mut gainers: Vec<(&Quote, f64)> =
        with_change.iter().copied().filter(|(_, c)| *c > 0.0).collect();
    gainers.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let mut losers: Vec<(&Quote, f64)> =
        with_change.iter().copied().filter(|(_, c)| *c < 0.0).collect();
    losers.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let take = |v: Vec<(&Quote, f64)>| -> Vec<Quote> {
        v.into_iter().take(limit).map(|(q, _)| q.clone()).collect()
    };
    (take(gainers), take(losers))
}
