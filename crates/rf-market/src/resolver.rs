//! The greedy matching pass.

use rf_core::{CommodityId, MIN_QUANTITY, Step, Transaction};

use crate::MarketBook;

/// Match one commodity's requests against its offers for this period.
///
/// Greedy, deterministic: requests are served in arrival order, each one
/// consuming from offers in arrival order; an offer may split across several
/// requests and a request across several offers.  Every non-zero consumption
/// yields one [`Transaction`] whose quantity is the smaller of the two
/// remaining counters at the moment of matching.
///
/// Consumes the book — whatever is left unmatched (excess supply or unmet
/// demand) is dropped with it.  Infallible by design: empty books or
/// one-sided books produce an empty transaction list.
pub fn resolve(mut book: MarketBook, commodity: CommodityId, step: Step) -> Vec<Transaction> {
    // Arrival order is push order, but sort anyway so the priority contract
    // holds even if a caller assembled the book by hand.
    book.offers.sort_by_key(|e| e.seq);
    book.requests.sort_by_key(|e| e.seq);

    let mut transactions = Vec::new();
    let mut next_offer = 0usize;

    for request in &mut book.requests {
        while request.quantity >= MIN_QUANTITY && next_offer < book.offers.len() {
            let offer = &mut book.offers[next_offer];
            if offer.quantity < MIN_QUANTITY {
                next_offer += 1;
                continue;
            }

            let matched = request.quantity.min(offer.quantity);
            offer.quantity -= matched;
            request.quantity -= matched;

            transactions.push(Transaction {
                supplier: offer.agent,
                requester: request.agent,
                commodity,
                quantity: matched,
                step,
            });
        }
        if next_offer >= book.offers.len() {
            // Supply exhausted; every remaining request goes unmet.
            break;
        }
    }

    transactions
}
