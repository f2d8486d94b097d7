use foundation::time::Time;

/// A recorded event and the frame-clock time it was emitted at.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub time: Time,
    pub payload: E,
}

/// Append-only event queue drained once per frame by the host.
#[derive(Debug)]
pub struct EventBus<E> {
    events: Vec<Event<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, time: Time, payload: E) {
        self.events.push(Event { time, payload });
    }

    pub fn events(&self) -> &[Event<E>] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        std::mem::take(&mut self.events)
    }
}
