//! Domain events module.
//!
//! Provides domain event types, the sink trait the mission engine emits
//! through, and [`CompletionListeners`], the in-memory fan-out presentation
//! layers register callbacks with. Delivery is not durable across restarts.

mod domain_event;
mod listeners;
mod sink;

pub use domain_event::*;
pub use listeners::*;
pub use sink::*;
