use crate::{Direction, Event, Fault, Location, Notification, Phase, Resolver};

/// Register side effect of one reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    None,
    /// Load the byte into the data register.
    Transmit(u8),
    ClearAcknowledgeFailure,
    /// Re-arm automatic acknowledge for the next transaction.
    EnableAcknowledge,
    ClearFault(Fault),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaction {
    pub effect: Effect,
    pub notification: Option<Notification>,
}

impl Reaction {
    const fn effect(effect: Effect) -> Self {
        Self {
            effect,
            notification: None,
        }
    }

    const fn quiet() -> Self {
        Self::effect(Effect::None)
    }
}

/// State of the transaction in progress.
///
/// `window` is the part of the resolved location that has not been
/// transferred yet; its length is the remaining byte count and only ever
/// shrinks until the next address match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    phase: Phase,
    identifier: Option<u8>,
    window: Location,
    stored: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub const fn new() -> Self {
        Self {
            phase: Phase::AwaitingIdentifier,
            identifier: None,
            window: Location::EMPTY,
            stored: 0,
        }
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Identifier that selected the current window, if it was resolved.
    pub const fn identifier(&self) -> Option<u8> {
        self.identifier
    }

    pub const fn remaining(&self) -> usize {
        self.window.len()
    }

    /// Reacts to one decoded event.
    pub fn step<R: Resolver + ?Sized>(&mut self, event: Event, resolver: &R) -> Reaction {
        match event {
            Event::AddressMatch { direction } => self.on_address_match(direction),
            Event::ByteReceived(byte) => self.on_byte_received(byte, resolver),
            Event::ByteRequested => self.on_byte_requested(),
            Event::AcknowledgeFailure => Reaction::effect(Effect::ClearAcknowledgeFailure),
            Event::StopCondition => Reaction {
                effect: Effect::EnableAcknowledge,
                notification: self.close(),
            },
            Event::Fault(fault) => Reaction {
                effect: Effect::ClearFault(fault),
                notification: Some(Notification::Fault(fault)),
            },
        }
    }

    fn on_address_match(&mut self, direction: Direction) -> Reaction {
        let notification = self.close();

        self.phase = Phase::AwaitingIdentifier;
        if direction == Direction::Receive {
            // The master writes, so the next byte selects a new window.
            self.window = Location::EMPTY;
            self.identifier = None;
        }

        Reaction {
            effect: Effect::None,
            notification,
        }
    }

    fn on_byte_received<R: Resolver + ?Sized>(&mut self, byte: u8, resolver: &R) -> Reaction {
        match self.phase {
            Phase::AwaitingIdentifier => {
                self.phase = Phase::Streaming;

                match resolver.resolve(byte) {
                    Some(location) => {
                        self.identifier = Some(byte);
                        self.window = location;
                        Reaction::quiet()
                    }
                    None => {
                        self.identifier = None;
                        self.window = Location::EMPTY;
                        Reaction {
                            effect: Effect::None,
                            notification: Some(Notification::UnknownIdentifier { identifier: byte }),
                        }
                    }
                }
            }
            Phase::Streaming => {
                if self.window.put_byte(byte) {
                    self.stored += 1;
                }
                Reaction::quiet()
            }
        }
    }

    fn on_byte_requested(&mut self) -> Reaction {
        // Past the end the master always gets zero, never a repeat.
        let byte = self.window.take_byte().unwrap_or(0);
        Reaction::effect(Effect::Transmit(byte))
    }

    /// Ends the current write burst and reports it if anything was stored.
    fn close(&mut self) -> Option<Notification> {
        let len = core::mem::take(&mut self.stored);

        match self.identifier {
            Some(identifier) if len > 0 => Some(Notification::Written { identifier, len }),
            _ => None,
        }
    }
}
