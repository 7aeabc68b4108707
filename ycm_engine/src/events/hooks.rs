use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{BookingSettledEvent, CharterBookingEvent, EventHandler, EventProducer, Handler, LowBalanceEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub booking_settled_producer: Vec<EventProducer<BookingSettledEvent>>,
    pub low_balance_producer: Vec<EventProducer<LowBalanceEvent>>,
    pub charter_booking_producer: Vec<EventProducer<CharterBookingEvent>>,
}

impl EventProducers {
    pub async fn publish_booking_settled(&self, event: BookingSettledEvent) {
        for producer in &self.booking_settled_producer {
            producer.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_low_balance(&self, event: LowBalanceEvent) {
        for producer in &self.low_balance_producer {
            producer.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_charter_booking(&self, event: CharterBookingEvent) {
        for producer in &self.charter_booking_producer {
            producer.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_booking_settled: Vec<EventHandler<BookingSettledEvent>>,
    pub on_low_balance: Vec<EventHandler<LowBalanceEvent>>,
    pub on_charter_booking: Vec<EventHandler<CharterBookingEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        fn handlers<E: Send + Sync + 'static>(size: usize, hooks: Vec<Handler<E>>) -> Vec<EventHandler<E>> {
            hooks.into_iter().map(|f| EventHandler::new(size, f)).collect()
        }
        Self {
            on_booking_settled: handlers(buffer_size, hooks.on_booking_settled),
            on_low_balance: handlers(buffer_size, hooks.on_low_balance),
            on_charter_booking: handlers(buffer_size, hooks.on_charter_booking),
        }
    }

    pub fn producers(&self) -> EventProducers {
        EventProducers {
            booking_settled_producer: self.on_booking_settled.iter().map(|h| h.subscribe()).collect(),
            low_balance_producer: self.on_low_balance.iter().map(|h| h.subscribe()).collect(),
            charter_booking_producer: self.on_charter_booking.iter().map(|h| h.subscribe()).collect(),
        }
    }

    /// Spawns every handler. Each one shuts down once all of its producers have been dropped.
    pub async fn start_handlers(self) {
        for handler in self.on_booking_settled {
            tokio::spawn(handler.start_handler());
        }
        for handler in self.on_low_balance {
            tokio::spawn(handler.start_handler());
        }
        for handler in self.on_charter_booking {
            tokio::spawn(handler.start_handler());
        }
    }
}

/// Subscribers to settlement events. Several subscribers can register for the same event (e.g. an email invite and
/// a live dashboard push); each one receives its own copy.
#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_booking_settled: Vec<Handler<BookingSettledEvent>>,
    pub on_low_balance: Vec<Handler<LowBalanceEvent>>,
    pub on_charter_booking: Vec<Handler<CharterBookingEvent>>,
}

impl EventHooks {
    pub fn on_booking_settled<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(BookingSettledEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_booking_settled.push(Arc::new(f));
        self
    }

    pub fn on_low_balance<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(LowBalanceEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_low_balance.push(Arc::new(f));
        self
    }

    pub fn on_charter_booking<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(CharterBookingEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_charter_booking.push(Arc::new(f));
        self
    }
}
