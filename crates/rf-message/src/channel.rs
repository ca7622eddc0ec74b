//! `MessageChannel` — queues between senders and the scheduler's delivery loop.
//!
//! # Why the channel does not deliver
//!
//! Delivery mutates the recipient, and only the scheduler holds the agent
//! registry.  The channel therefore owns just the plumbing: a FIFO of
//! in-phase messages awaiting synchronous delivery, and a step-keyed inbox of
//! shipments awaiting settlement.  The scheduler pops from both and invokes
//! `receive_message` itself.
//!
//! A single global FIFO (rather than one queue per recipient) preserves the
//! required ordering for free: messages sent by agent A before agent B in the
//! same phase reach any shared recipient in that same relative order.

use std::collections::{BTreeMap, VecDeque};

use rf_core::Step;

use crate::{Message, MessageKind};

/// Message queues for one simulation run.
#[derive(Default, Debug)]
pub struct MessageChannel {
    /// Messages awaiting synchronous delivery within the current phase.
    pending: VecDeque<Message>,
    /// Shipments keyed by the step at which they settle.
    inbox: BTreeMap<Step, Vec<Message>>,
}

impl MessageChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a message.  Never blocks.
    ///
    /// Offers and requests go to the in-phase FIFO.  A fresh shipment rests
    /// in the inbox until the next step's begin-phase; a forwarded one has
    /// already paid that deferral once, so it rejoins the FIFO and continues
    /// hop to hop within the current settlement.
    pub fn send(&mut self, message: Message, now: Step) {
        if message.kind == MessageKind::Shipment && !message.route.in_flight() {
            self.inbox.entry(now.offset(1)).or_default().push(message);
        } else {
            self.pending.push_back(message);
        }
    }

    /// Pop the next in-phase message, FIFO.
    pub fn pop_pending(&mut self) -> Option<Message> {
        self.pending.pop_front()
    }

    /// Remove and return all shipments that settle at or before `now`.
    ///
    /// "Or before" covers steps in which no `advance` ran the settlement
    /// (the scheduler settles every step, so in practice keys equal `now`).
    pub fn settle_due(&mut self, now: Step) -> Vec<Message> {
        let mut due = Vec::new();
        // Keys are sorted; pull until a key beyond `now` appears.
        while let Some((&step, _)) = self.inbox.iter().next() {
            if step > now {
                break;
            }
            let (_, mut batch) = self.inbox.remove_entry(&step).expect("key just observed");
            due.append(&mut batch);
        }
        due
    }

    /// Number of in-phase messages not yet delivered.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of shipments waiting for a future step.
    pub fn in_transit(&self) -> usize {
        self.inbox.values().map(Vec::len).sum()
    }
}
