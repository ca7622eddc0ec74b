//! Commodity interning.
//!
//! A commodity is a class of exchangeable resource ("fresh_fuel",
//! "spent_fuel", …).  The kernel compares commodities by identity, never by
//! string: every name is interned exactly once into a [`CommodityBook`] and
//! referred to by its `CommodityId` everywhere else.  Interning order is part
//! of the deterministic setup — the same deck interns the same ids.

use rustc_hash::FxHashMap;

use crate::CommodityId;

/// Interner mapping commodity names to stable `CommodityId`s.
///
/// Owned by the simulation context; agents and books only ever see ids.
#[derive(Default, Debug, Clone)]
pub struct CommodityBook {
    names: Vec<String>,
    by_name: FxHashMap<String, CommodityId>,
}

impl CommodityBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning the existing id if it was seen before.
    ///
    /// # Panics
    /// Panics if more than `u16::MAX - 1` distinct commodities are interned;
    /// real decks have a handful.
    pub fn intern(&mut self, name: &str) -> CommodityId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = CommodityId(
            u16::try_from(self.names.len()).expect("commodity id space exhausted"),
        );
        self.names.push(name.to_owned());
        self.by_name.insert(name.to_owned(), id);
        id
    }

    /// Look up an already-interned name without inserting.
    pub fn get(&self, name: &str) -> Option<CommodityId> {
        self.by_name.get(name).copied()
    }

    /// The name behind an id, for diagnostics and output.
    pub fn name(&self, id: CommodityId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Number of distinct interned commodities.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All ids in interning order.
    pub fn ids(&self) -> impl Iterator<Item = CommodityId> + '_ {
        (0..self.names.len() as u16).map(CommodityId)
    }
}
