use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Receives text changes from a [`Model`].
///
/// Called synchronously from [`Model::set_text`] or [`TextChange::notify`].
/// When the model is shared through `Rc<RefCell<Model>>`, notifying through
/// [`Model::stage_text`] releases the model borrow first, so observers may
/// read it back.
pub trait Observer {
    fn text_changed(&self, text: &str);
}

/// Token returned by [`Model::subscribe`]; pass it to
/// [`Model::unsubscribe`] to detach.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Observable text value.
///
/// Subscribers are held weakly: dropping the last `Rc` to an observer
/// detaches it, and the stale entry is pruned on the next notification.
pub struct Model {
    text: String,
    subscribers: Vec<(Subscription, Weak<dyn Observer>)>,
    next_id: u64,
}

impl Model {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            subscribers: Vec::new(),
            next_id: 1,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Stores `text`, then notifies every live observer in subscription
    /// order before returning.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.stage_text(text).notify();
    }

    /// Stores `text` and returns the pending notification for the observers
    /// alive right now. Call [`TextChange::notify`] once the model is no
    /// longer borrowed.
    #[must_use = "observers are only notified by TextChange::notify"]
    pub fn stage_text(&mut self, text: impl Into<String>) -> TextChange {
        self.text = text.into();

        let before = self.subscribers.len();
        self.subscribers.retain(|(_, weak)| weak.strong_count() > 0);
        if self.subscribers.len() != before {
            log::debug!("pruned {} dropped observer(s)", before - self.subscribers.len());
        }

        TextChange {
            text: self.text.clone(),
            observers: self
                .subscribers
                .iter()
                .filter_map(|(_, weak)| weak.upgrade())
                .collect(),
        }
    }

    pub fn subscribe(&mut self, observer: &Rc<dyn Observer>) -> Subscription {
        let token = Subscription(self.next_id);
        self.next_id += 1;
        self.subscribers.push((token, Rc::downgrade(observer)));
        token
    }

    /// Returns false if `token` was never issued by this model or is
    /// already detached.
    pub fn unsubscribe(&mut self, token: Subscription) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(t, _)| *t != token);
        self.subscribers.len() != before
    }

    /// Number of observers still alive.
    pub fn observer_count(&self) -> usize {
        self.subscribers
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }
}

/// A text change captured by [`Model::stage_text`], not yet delivered.
pub struct TextChange {
    text: String,
    observers: Vec<Rc<dyn Observer>>,
}

impl TextChange {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Delivers the change in subscription order.
    pub fn notify(self) {
        for observer in &self.observers {
            observer.text_changed(&self.text);
        }
    }
}

impl fmt::Debug for TextChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextChange")
            .field("text", &self.text)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new("Initial Text")
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("text", &self.text)
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Observer that keeps the latest text for a node to pick up on a later
/// frame.
#[derive(Debug, Default)]
pub struct TextBinding {
    text: RefCell<String>,
    changed: Cell<bool>,
}

impl TextBinding {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            text: RefCell::new(initial.into()),
            changed: Cell::new(false),
        }
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Returns whether the text changed since the last call, and clears the flag.
    pub fn take_changed(&self) -> bool {
        self.changed.replace(false)
    }
}

impl Observer for TextBinding {
    fn text_changed(&self, text: &str) {
        let mut current = self.text.borrow_mut();
        current.clear();
        current.push_str(text);
        self.changed.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every notification in arrival order.
    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<(&'static str, String)>>>,
    }

    impl Observer for Recorder {
        fn text_changed(&self, text: &str) {
            self.log.borrow_mut().push((self.name, text.to_string()));
        }
    }

    fn recorder(name: &'static str, log: &Rc<RefCell<Vec<(&'static str, String)>>>) -> Rc<dyn Observer> {
        Rc::new(Recorder { name, log: log.clone() })
    }

    #[test]
    fn default_text() {
        assert_eq!(Model::default().text(), "Initial Text");
    }

    #[test]
    fn set_text_notifies_in_subscription_order_before_returning() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder("a", &log);
        let b = recorder("b", &log);

        let mut model = Model::default();
        model.subscribe(&a);
        model.subscribe(&b);
        model.set_text("hello");

        assert_eq!(model.text(), "hello");
        assert_eq!(
            *log.borrow(),
            vec![("a", "hello".to_string()), ("b", "hello".to_string())]
        );
    }

    #[test]
    fn unsubscribed_observer_is_not_notified() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder("a", &log);
        let b = recorder("b", &log);

        let mut model = Model::default();
        let ta = model.subscribe(&a);
        model.subscribe(&b);

        assert!(model.unsubscribe(ta));
        assert!(!model.unsubscribe(ta));

        model.set_text("x");
        assert_eq!(*log.borrow(), vec![("b", "x".to_string())]);
    }

    #[test]
    fn dropped_observer_is_skipped_and_pruned() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder("a", &log);
        let b = recorder("b", &log);

        let mut model = Model::default();
        model.subscribe(&a);
        model.subscribe(&b);
        drop(a);

        assert_eq!(model.observer_count(), 1);
        model.set_text("y");
        assert_eq!(*log.borrow(), vec![("b", "y".to_string())]);
        assert_eq!(model.subscribers.len(), 1);
    }

    #[test]
    fn staged_change_reaches_only_observers_alive_when_staged() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder("a", &log);

        let mut model = Model::default();
        model.subscribe(&a);
        let change = model.stage_text("later");
        assert_eq!(model.text(), "later");
        assert!(log.borrow().is_empty());

        let b = recorder("b", &log);
        model.subscribe(&b);
        change.notify();
        assert_eq!(*log.borrow(), vec![("a", "later".to_string())]);
    }

    #[test]
    fn text_binding_mirrors_latest_value() {
        let binding = Rc::new(TextBinding::new("start"));
        let observer: Rc<dyn Observer> = binding.clone();

        let mut model = Model::default();
        model.subscribe(&observer);

        assert!(!binding.take_changed());
        model.set_text("one");
        model.set_text("two");

        assert_eq!(binding.text(), "two");
        assert!(binding.take_changed());
        assert!(!binding.take_changed());
    }
}
