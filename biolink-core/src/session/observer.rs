use crate::message::Message;
use crate::metrics::{Metric, MetricSnapshot};

/// Callbacks fired from the receive loop, in message order.
///
/// All methods default to no-ops. Callbacks run on the session task, so
/// a slow observer delays the next `receive`.
pub trait SessionObserver {
    /// Every decoded message, before dispatch.
    fn on_message(&mut self, _message: &Message) {}

    /// A tracked metric changed; `snapshot` already holds the new value.
    fn on_value_change(&mut self, _metric: Metric, _value: f64, _snapshot: &MetricSnapshot) {}

    fn on_auth_failed(&mut self, _message: &Message) {}

    fn on_session_complete(&mut self, _message: &Message) {}
}

impl SessionObserver for () {}

impl<T: SessionObserver + ?Sized> SessionObserver for &mut T {
    fn on_message(&mut self, message: &Message) {
        (**self).on_message(message);
    }

    fn on_value_change(&mut self, metric: Metric, value: f64, snapshot: &MetricSnapshot) {
        (**self).on_value_change(metric, value, snapshot);
    }

    fn on_auth_failed(&mut self, message: &Message) {
        (**self).on_auth_failed(message);
    }

    fn on_session_complete(&mut self, message: &Message) {
        (**self).on_session_complete(message);
    }
}
