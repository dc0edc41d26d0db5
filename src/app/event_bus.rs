//! Prozessweiter Publish/Subscribe-Kanal.
//!
//! Zustellung ist synchron und in Emissionsreihenfolge. Events, die während einer
//! Zustellung veröffentlicht werden, landen in einer Warteschlange und werden im
//! Anschluss zugestellt, damit Subscriber nie ein späteres Event vor einem
//! früheren sehen.

use super::command_log::EventLog;
use super::{AppEvent, EventTopic};
use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Empfänger von Events.
pub trait EventSubscriber {
    /// Verarbeitet ein zugestelltes Event.
    fn on_event(&mut self, event: &AppEvent);
}

/// Adapter, um Closures als Subscriber zu registrieren.
struct FnSubscriber<F>(F);

impl<F: FnMut(&AppEvent)> EventSubscriber for FnSubscriber<F> {
    fn on_event(&mut self, event: &AppEvent) {
        (self.0)(event)
    }
}

struct Subscription {
    topics: Vec<EventTopic>,
    subscriber: Rc<RefCell<dyn EventSubscriber>>,
}

/// Synchroner Event-Bus für einen logischen Thread.
#[derive(Default)]
pub struct EventBus {
    subscriptions: RefCell<Vec<Subscription>>,
    queue: RefCell<VecDeque<AppEvent>>,
    dispatching: Cell<bool>,
    log: RefCell<EventLog>,
}

impl EventBus {
    /// Erstellt einen Bus ohne Subscriber.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert einen Subscriber für die angegebenen Topics.
    pub fn subscribe(&self, topics: &[EventTopic], subscriber: Rc<RefCell<dyn EventSubscriber>>) {
        self.subscriptions.borrow_mut().push(Subscription {
            topics: topics.to_vec(),
            subscriber,
        });
    }

    /// Registriert eine Closure als Subscriber.
    pub fn subscribe_fn(&self, topics: &[EventTopic], handler: impl FnMut(&AppEvent) + 'static) {
        self.subscribe(topics, Rc::new(RefCell::new(FnSubscriber(handler))));
    }

    /// Veröffentlicht ein Event an alle Subscriber des Topics.
    pub fn publish(&self, event: AppEvent) {
        self.queue.borrow_mut().push_back(event);
        if self.dispatching.replace(true) {
            return;
        }

        loop {
            let Some(event) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            self.deliver(&event);
            self.log.borrow_mut().record(event);
        }

        self.dispatching.set(false);
    }

    fn deliver(&self, event: &AppEvent) {
        let topic = event.topic();
        let targets: Vec<Rc<RefCell<dyn EventSubscriber>>> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.topics.contains(&topic))
            .map(|s| s.subscriber.clone())
            .collect();

        for target in targets {
            match target.try_borrow_mut() {
                Ok(mut subscriber) => subscriber.on_event(event),
                Err(_) => log::error!("Subscriber belegt, Event {:?} nicht zugestellt", topic),
            }
        }
    }

    /// Alle bisher zugestellten Events (begrenzt).
    pub fn history(&self) -> Ref<'_, EventLog> {
        self.log.borrow()
    }

    /// Verwirft die Event-Historie (Test-Isolation).
    pub fn clear_history(&self) {
        self.log.borrow_mut().clear();
    }
}
