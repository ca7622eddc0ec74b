//! Unit tests for rf-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, CommodityId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering_follows_registration() {
        assert!(AgentId(0) < AgentId(1));
        assert!(CommodityId(7) > CommodityId(6));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(CommodityId::INVALID.0, u16::MAX);
        assert_eq!(AgentId::default(), AgentId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::{Lifetime, SimClock, Step};

    #[test]
    fn step_arithmetic() {
        assert_eq!(Step(3).offset(4), Step(7));
        assert_eq!(Step(7).since(Step(3)), 4);
        assert_eq!(Step(7) - Step(3), 4);
        assert_eq!(Step(3) + 4, Step(7));
    }

    #[test]
    fn clock_advances_by_one() {
        let mut clock = SimClock::new();
        assert_eq!(clock.current_step, Step::ZERO);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_step, Step(2));
    }

    #[test]
    fn finite_lifetime_derives_decommission_step() {
        assert_eq!(Lifetime::Finite(3).decommission_step(Step(5)), Some(Step(8)));
    }

    /// Lifetimes come straight from input decks; an absurd value must
    /// saturate instead of panicking.
    #[test]
    fn oversized_lifetime_saturates() {
        assert_eq!(
            Lifetime::Finite(u64::MAX).decommission_step(Step(5)),
            Some(Step(u64::MAX))
        );
    }

    #[test]
    fn unbounded_lifetime_never_expires() {
        assert_eq!(Lifetime::Unbounded.decommission_step(Step(5)), None);
    }
}

#[cfg(test)]
mod commodity {
    use crate::CommodityBook;

    #[test]
    fn interning_is_idempotent() {
        let mut book = CommodityBook::new();
        let a = book.intern("fresh_fuel");
        let b = book.intern("spent_fuel");
        assert_ne!(a, b);
        assert_eq!(book.intern("fresh_fuel"), a);
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn lookup_and_names() {
        let mut book = CommodityBook::new();
        let id = book.intern("ore");
        assert_eq!(book.get("ore"), Some(id));
        assert_eq!(book.get("slag"), None);
        assert_eq!(book.name(id), Some("ore"));
    }
}

#[cfg(test)]
mod resource {
    use crate::{CommodityBook, CoreError, Resource};

    fn two_commods() -> (crate::CommodityId, crate::CommodityId) {
        let mut book = CommodityBook::new();
        (book.intern("a"), book.intern("b"))
    }

    #[test]
    fn split_preserves_total() {
        let (a, _) = two_commods();
        let mut r = Resource::new(a, 10.0).unwrap();
        let part = r.split(6.0).unwrap();
        assert_eq!(part.quantity, 6.0);
        assert_eq!(r.quantity, 4.0);
        assert_eq!(part.commodity, a);
    }

    #[test]
    fn overdraw_is_an_error() {
        let (a, _) = two_commods();
        let mut r = Resource::new(a, 1.0).unwrap();
        assert!(matches!(
            r.split(2.0),
            Err(CoreError::InsufficientQuantity { .. })
        ));
        // Untouched on failure.
        assert_eq!(r.quantity, 1.0);
    }

    #[test]
    fn absorb_merges_same_commodity() {
        let (a, _) = two_commods();
        let mut r = Resource::new(a, 1.5).unwrap();
        r.absorb(Resource::new(a, 2.5).unwrap()).unwrap();
        assert_eq!(r.quantity, 4.0);
    }

    #[test]
    fn absorb_rejects_mismatched_commodity() {
        let (a, b) = two_commods();
        let mut r = Resource::new(a, 1.0).unwrap();
        assert!(matches!(
            r.absorb(Resource::new(b, 1.0).unwrap()),
            Err(CoreError::CommodityMismatch { .. })
        ));
    }

    #[test]
    fn negative_quantity_rejected() {
        let (a, _) = two_commods();
        assert!(matches!(
            Resource::new(a, -1.0),
            Err(CoreError::NegativeQuantity(_))
        ));
    }
}
