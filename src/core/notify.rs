//! Toast notifications with timed entry, auto-dismiss and exit.
//!
//! Timers are requested through `Timers` and delivered back with
//! `Notifications::fire`. They can't be cancelled: a timer that fires for a
//! toast already leaving or removed does nothing.

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastLevel {
    #[default]
    Success,
    Info,
    Error,
}

impl ToastLevel {
    pub fn class(self) -> &'static str {
        match self {
            ToastLevel::Success => "success",
            ToastLevel::Info => "info",
            ToastLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// In the document, entry animation not started yet.
    Entering,
    /// Carries the `show` class.
    Visible,
    /// `show` removed; waiting for the exit animation before removal.
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub level: ToastLevel,
    pub phase: ToastPhase,
}

impl Toast {
    pub fn class(&self) -> String {
        let mut class = format!("cart-notification {}", self.level.class());
        if self.phase == ToastPhase::Visible {
            class.push_str(" show");
        }
        class
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastTimer {
    Reveal(u64),
    Dismiss(u64),
    Remove(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub delay_ms: u32,
    pub timer: ToastTimer,
}

pub trait Timers {
    fn schedule(&mut self, delay_ms: u32, timer: ToastTimer);
}

/// Collects requests so the caller can arm real timers once it has released
/// whatever it was borrowing.
impl Timers for Vec<Scheduled> {
    fn schedule(&mut self, delay_ms: u32, timer: ToastTimer) {
        self.push(Scheduled { delay_ms, timer });
    }
}

#[derive(Debug, Clone)]
pub struct Notifications {
    toasts: Vec<Toast>,
    next_id: u64,
    entry_delay_ms: u32,
    exit_delay_ms: u32,
}

impl Notifications {
    pub fn new(entry_delay_ms: u32, exit_delay_ms: u32) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
            entry_delay_ms,
            exit_delay_ms,
        }
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn get(&self, id: u64) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    /// Append a toast. `duration_ms == 0` keeps it until dismissed by hand.
    pub fn show(
        &mut self,
        timers: &mut impl Timers,
        title: impl Into<String>,
        message: impl Into<String>,
        level: ToastLevel,
        duration_ms: u32,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            title: title.into(),
            message: message.into(),
            level,
            phase: ToastPhase::Entering,
        });
        trace!(toast = id, duration_ms, "toast shown");

        timers.schedule(self.entry_delay_ms, ToastTimer::Reveal(id));
        if duration_ms > 0 {
            timers.schedule(duration_ms, ToastTimer::Dismiss(id));
        }
        id
    }

    /// Start the exit of toast `id`. Returns `false` if it was already leaving
    /// or is gone.
    pub fn dismiss(&mut self, timers: &mut impl Timers, id: u64) -> bool {
        let Some(toast) = self.toasts.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if toast.phase == ToastPhase::Leaving {
            return false;
        }
        toast.phase = ToastPhase::Leaving;
        timers.schedule(self.exit_delay_ms, ToastTimer::Remove(id));
        true
    }

    /// Deliver a timer. Returns whether anything changed.
    pub fn fire(&mut self, timers: &mut impl Timers, timer: ToastTimer) -> bool {
        match timer {
            ToastTimer::Reveal(id) => match self.toasts.iter_mut().find(|t| t.id == id) {
                Some(t) if t.phase == ToastPhase::Entering => {
                    t.phase = ToastPhase::Visible;
                    true
                }
                _ => false,
            },
            ToastTimer::Dismiss(id) => self.dismiss(timers, id),
            ToastTimer::Remove(id) => {
                let before = self.toasts.len();
                self.toasts.retain(|t| t.id != id);
                before != self.toasts.len()
            }
        }
    }
}
