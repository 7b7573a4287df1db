use std::collections::VecDeque;

/// Surface for one-shot user-facing messages.
pub trait Notifier {
    fn alert(&mut self, title: &str, body: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub body: String,
}

/// Alerts waiting to be shown, oldest first.
#[derive(Debug, Default)]
pub struct AlertQueue {
    pending: VecDeque<Alert>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Alert> {
        self.pending.front()
    }

    pub fn dismiss(&mut self) -> Option<Alert> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.pending.iter()
    }
}

impl Notifier for AlertQueue {
    fn alert(&mut self, title: &str, body: &str) {
        self.pending.push_back(Alert {
            title: title.to_string(),
            body: body.to_string(),
        });
    }
}
