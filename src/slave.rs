use core::cell::RefCell;

use critical_section::Mutex;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel};
use heapless::Deque;

use crate::{
    interrupts,
    session_holder::SessionHolder,
    Event, Notification, Phase, Registers, Resolver, SlaveConfig,
};

pub const PHASES_HISTORY_SIZE: usize = 5;
pub const EVENTS_HISTORY_SIZE: usize = 5;

#[cfg(feature = "dump")]
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateDump {
    pub phase_history: [Phase; PHASES_HISTORY_SIZE],
    pub current_phase: Phase,
    pub event_history: [Event; EVENTS_HISTORY_SIZE],
}

pub type NotificationChannel<const SZ: usize> =
    channel::Channel<CriticalSectionRawMutex, Notification, SZ>;

/// Exposes resolver-selected memory to the bus master.
///
/// Meant to live in a `static`: the interrupt handler calls
/// [`handle_event`](Self::handle_event) and the application awaits
/// [`listen`](Self::listen).
pub struct MemorySlave<B, R, const CHSIZE: usize> {
    bus: B,
    resolver: R,

    channel: NotificationChannel<CHSIZE>,

    session: SessionHolder<PHASES_HISTORY_SIZE>,
    events_history: Mutex<RefCell<Deque<Event, EVENTS_HISTORY_SIZE>>>,
}

#[cfg(feature = "dump")]
fn deque_into_array<T: Copy, const N: usize>(d: &Deque<T, N>, arr: &mut [T; N]) {
    let n = d.len();
    let (a, b) = d.as_slices();
    let s = N - n;

    arr[s..s + a.len()].copy_from_slice(a);
    arr[s + a.len()..].copy_from_slice(b);
}

#[cfg(feature = "defmt")]
fn log_notification(notification: &Notification) {
    match notification {
        Notification::Fault(fault) => defmt::warn!("i2c fault: {}", fault),
        Notification::UnknownIdentifier { identifier } => {
            defmt::debug!("unknown identifier {:#x}", identifier)
        }
        Notification::Written { identifier, len } => {
            defmt::trace!("{} bytes written to {:#x}", len, identifier)
        }
    }
}

impl<B: Registers, R: Resolver, const CHSIZE: usize> MemorySlave<B, R, CHSIZE> {
    pub const fn new(bus: B, resolver: R) -> Self {
        Self {
            bus,
            resolver,
            channel: NotificationChannel::new(),
            session: SessionHolder::new(),
            events_history: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Brings the peripheral up in standard-mode slave operation.
    pub fn init(&self, config: SlaveConfig) {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "i2c slave at {:#x}, {} MHz input clock",
            config.address().get(),
            config.timing().frequency_mhz()
        );

        self.bus.configure(config.address(), config.timing());
    }

    /// Handles the highest priority pending condition. Call once per
    /// interrupt; the peripheral interrupts again for anything left over.
    pub fn handle_event(&self) {
        let Some(event) = interrupts::next_event(&self.bus) else {
            return;
        };

        #[cfg(feature = "defmt")]
        defmt::trace!("i2c event: {}", event);

        let reaction = critical_section::with(|cs| {
            let mut session = self.session.load(cs);
            let reaction = session.step(event, &self.resolver);
            self.session.store(cs, session);

            let mut h = self.events_history.borrow_ref_mut(cs);
            if h.is_full() {
                h.pop_front();
            }
            let _ = h.push_back(event);

            reaction
        });

        interrupts::apply(&self.bus, reaction.effect);

        if let Some(notification) = reaction.notification {
            self.notify(notification);
        }
    }

    fn notify(&self, notification: Notification) {
        #[cfg(feature = "defmt")]
        log_notification(&notification);

        // Best effort: the bus cannot wait for the application.
        if self.channel.try_send(notification).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("notification dropped: {}", notification);
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.get_phase()
    }

    pub async fn listen(&self) -> Notification {
        self.channel.receive().await
    }

    pub fn try_listen(&self) -> Option<Notification> {
        self.channel.try_receive().ok()
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    #[cfg(feature = "dump")]
    pub fn dump_state(&self) -> StateDump {
        let mut phases = [Phase::AwaitingIdentifier; PHASES_HISTORY_SIZE];
        let mut events = [Event::StopCondition; EVENTS_HISTORY_SIZE];

        critical_section::with(|cs| {
            let phases_deque = self.session.get_history(cs);
            deque_into_array(&phases_deque, &mut phases);

            let events_deque = self.events_history.borrow_ref(cs);
            deque_into_array(&events_deque, &mut events);
        });

        StateDump {
            phase_history: phases,
            current_phase: self.phase(),
            event_history: events,
        }
    }
}
