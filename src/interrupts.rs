use crate::{Effect, Event, Pending, Registers};

/// Turns the highest priority latched condition into an event, performing
/// the register reads that go with it.
pub fn next_event<B: Registers>(bus: &B) -> Option<Event> {
    let event = match bus.status().pending()? {
        Pending::AddressMatch => Event::AddressMatch {
            direction: bus.release_address(),
        },
        Pending::ByteReceived => Event::ByteReceived(bus.read_data()),
        Pending::ByteRequested => Event::ByteRequested,
        Pending::AcknowledgeFailure => Event::AcknowledgeFailure,
        Pending::StopCondition => Event::StopCondition,
        Pending::Fault(fault) => Event::Fault(fault),
    };

    Some(event)
}

pub fn apply<B: Registers>(bus: &B, effect: Effect) {
    match effect {
        Effect::None => {}
        Effect::Transmit(byte) => bus.write_data(byte),
        Effect::ClearAcknowledgeFailure => bus.clear_acknowledge_failure(),
        Effect::EnableAcknowledge => bus.enable_acknowledge(),
        Effect::ClearFault(fault) => bus.clear_fault(fault),
    }
}
