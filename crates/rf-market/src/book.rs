//! Per-commodity offer/request books.

use rustc_hash::FxHashMap;

use rf_core::{AgentId, CommodityId, MIN_QUANTITY};

// ── BookEntry ─────────────────────────────────────────────────────────────────

/// One booked offer or request, with its remaining-quantity counter.
#[derive(Clone, PartialEq, Debug)]
pub struct BookEntry {
    /// The offering or requesting agent.
    pub agent: AgentId,
    /// Remaining unmatched quantity; decremented as the resolver matches.
    pub quantity: f64,
    /// Ledger-wide arrival sequence number — the matching priority.
    ///
    /// Arrival order is itself downstream of agent registration order
    /// (callbacks run in registration order), so this single counter realizes
    /// the registration-then-arrival tie-break.
    pub seq: u64,
}

// ── MarketBook ────────────────────────────────────────────────────────────────

/// Outstanding offers and requests for one commodity in the current period.
#[derive(Default, Clone, Debug)]
pub struct MarketBook {
    pub offers: Vec<BookEntry>,
    pub requests: Vec<BookEntry>,
}

impl MarketBook {
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty() && self.requests.is_empty()
    }

    pub fn total_offered(&self) -> f64 {
        self.offers.iter().map(|e| e.quantity).sum()
    }

    pub fn total_requested(&self) -> f64 {
        self.requests.iter().map(|e| e.quantity).sum()
    }
}

// ── MarketLedger ──────────────────────────────────────────────────────────────

/// All commodity books for the current period, plus the arrival counter.
///
/// The ledger owns no state across periods: every book is removed from it by
/// the resolution pass, and the arrival counter only ever increases (it
/// orders entries *within* a book, so persisting it across periods is
/// harmless and keeps sequence numbers globally unique for diagnostics).
#[derive(Default, Debug)]
pub struct MarketLedger {
    books: FxHashMap<CommodityId, MarketBook>,
    next_seq: u64,
}

impl MarketLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Book supply.  Dust-sized quantities are ignored.
    pub fn book_offer(&mut self, commodity: CommodityId, supplier: AgentId, quantity: f64) {
        if quantity < MIN_QUANTITY {
            return;
        }
        let seq = self.bump();
        self.books.entry(commodity).or_default().offers.push(BookEntry {
            agent: supplier,
            quantity,
            seq,
        });
    }

    /// Book demand.  Dust-sized quantities are ignored.
    pub fn book_request(&mut self, commodity: CommodityId, requester: AgentId, quantity: f64) {
        if quantity < MIN_QUANTITY {
            return;
        }
        let seq = self.bump();
        self.books.entry(commodity).or_default().requests.push(BookEntry {
            agent: requester,
            quantity,
            seq,
        });
    }

    /// `true` if `commodity` saw at least one offer or request this period.
    pub fn has_activity(&self, commodity: CommodityId) -> bool {
        self.books.get(&commodity).is_some_and(|b| !b.is_empty())
    }

    /// Remove and return the book for `commodity`, leaving the ledger clear
    /// of it.  The resolver consumes the returned book.
    pub fn take_book(&mut self, commodity: CommodityId) -> Option<MarketBook> {
        self.books.remove(&commodity)
    }

    /// Drop every remaining book, ending the period.
    ///
    /// The scheduler calls this after the resolution pass so a booking for a
    /// commodity with no bound market cannot lie in wait and match demand in
    /// a later period.
    pub fn clear(&mut self) {
        self.books.clear();
    }

    fn bump(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
