use core::cell::{Cell, Ref, RefCell};

use atomic::{Atomic, Ordering};
use critical_section::{CriticalSection, Mutex};
use heapless::Deque;

use crate::{Phase, Session};

pub struct SessionHolder<const HISTORY_SIZE: usize> {
    session: Mutex<Cell<Session>>,
    history: Mutex<RefCell<Deque<Phase, HISTORY_SIZE>>>,
    phase: Atomic<Phase>,
}

impl<const HISTORY_SIZE: usize> SessionHolder<HISTORY_SIZE> {
    pub const fn new() -> Self {
        Self {
            session: Mutex::new(Cell::new(Session::new())),
            history: Mutex::new(RefCell::new(Deque::new())),
            phase: Atomic::new(Phase::AwaitingIdentifier),
        }
    }

    pub fn load(&self, cs: CriticalSection) -> Session {
        self.session.borrow(cs).get()
    }

    pub fn store(&self, cs: CriticalSection, session: Session) {
        let phase = session.phase();
        if phase != self.get_phase() {
            self.add_phase_in_history(cs, phase);
        }

        self.session.borrow(cs).set(session);
        self.phase.store(phase, Ordering::SeqCst);
    }

    /// Lock-free view of the phase for the application side.
    pub fn get_phase(&self) -> Phase {
        self.phase.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn get_history<'cs>(
        &'cs self,
        cs: CriticalSection<'cs>,
    ) -> Ref<'cs, Deque<Phase, HISTORY_SIZE>> {
        self.history.borrow_ref(cs)
    }

    fn add_phase_in_history(&self, cs: CriticalSection, phase: Phase) {
        let mut h = self.history.borrow_ref_mut(cs);
        if h.is_full() {
            h.pop_front();
        }
        // Cannot fail, a slot was just freed.
        let _ = h.push_back(phase);
    }
}
