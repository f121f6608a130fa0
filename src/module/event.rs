//! Environment events fed to a module.

/// Kind of an input or environment event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    KeyDown(u32),
    KeyUp(u32),
    MouseMove { x: i32, y: i32 },
    MouseButton { button: u8, pressed: bool },
    /// Stop the module.
    Quit,
    Custom(String),
}

/// A timestamped event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub timestamp: u64,
    pub kind: EventKind,
}

impl Event {
    pub fn new(timestamp: u64, kind: EventKind) -> Self {
        Self { timestamp, kind }
    }
}

/// Consumer of drained events, such as a GUI layer.
pub trait EventSink {
    fn handle_event(&mut self, event: &Event);
}

impl<F> EventSink for F
where
    F: FnMut(&Event),
{
    fn handle_event(&mut self, event: &Event) {
        self(event)
    }
}
