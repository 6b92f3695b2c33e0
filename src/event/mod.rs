mod bus;
mod events;

pub use bus::EventBus;
pub use events::*;

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &StoreEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&StoreEvent) + Send,
{
    fn handle_event(&mut self, event: &StoreEvent) {
        self(event)
    }
}
