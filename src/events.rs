//! Drag event vocabulary and host listener registry.
//!
//! Events carry the names of the platform drag protocol so host code written
//! against native drag semantics sees the same sequence whether the drag is
//! simulated or platform-driven:
//!
//! | Event       | Emitted by           | Payload                         |
//! |-------------|----------------------|---------------------------------|
//! | `dragstart` | item                 | session snapshot                |
//! | `drag`      | item                 | pointer position                |
//! | `dragenter` | zone                 | session snapshot                |
//! | `dragover`  | zone                 | session snapshot, every frame   |
//! | `dragleave` | zone                 | session snapshot                |
//! | `drop`      | zone                 | session snapshot + payload      |
//! | `dragend`   | item, then source zone | outcome                       |

use crate::geometry::Point;
use crate::session::DragSession;
use crate::types::{DragOutcome, DragPayload, ItemId, ZoneId};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    DragStart,
    Drag,
    DragEnter,
    DragOver,
    DragLeave,
    Drop,
    DragEnd,
}

impl DragEventKind {
    /// Native event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DragStart => "dragstart",
            Self::Drag => "drag",
            Self::DragEnter => "dragenter",
            Self::DragOver => "dragover",
            Self::DragLeave => "dragleave",
            Self::Drop => "drop",
            Self::DragEnd => "dragend",
        }
    }
}

impl fmt::Display for DragEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The item or zone an event is dispatched on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Item(ItemId),
    Zone(ZoneId),
}

impl fmt::Display for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(id) => write!(f, "{}", id),
            Self::Zone(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragEvent {
    pub kind: DragEventKind,
    pub target: EventTarget,
    /// Snapshot of the session at dispatch time
    pub session: DragSession,
    pub position: Point,
    /// Set on `dragend` only
    pub outcome: Option<DragOutcome>,
}

impl DragEvent {
    pub fn payload(&self) -> &DragPayload {
        &self.session.payload
    }

    /// `name(target)`, e.g. `dragenter(Z2)`.
    pub fn label(&self) -> String {
        format!("{}({})", self.kind, self.target)
    }
}

/// Which events a listener receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerScope {
    Item(ItemId),
    Zone(ZoneId),
    /// Every event of the engine
    All,
}

impl ListenerScope {
    fn matches(&self, target: &EventTarget) -> bool {
        match (self, target) {
            (Self::All, _) => true,
            (Self::Item(a), EventTarget::Item(b)) => a == b,
            (Self::Zone(a), EventTarget::Zone(b)) => a == b,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&DragEvent)>;

struct Listener {
    id: ListenerId,
    scope: ListenerScope,
    kind: Option<DragEventKind>,
    callback: Callback,
}

/// Host listeners, dispatched in registration order.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
    next_id: u64,
    dispatched: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen to events in `scope`; `kind = None` means every kind.
    pub fn on(
        &mut self,
        scope: ListenerScope,
        kind: Option<DragEventKind>,
        callback: impl FnMut(&DragEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            scope,
            kind,
            callback: Box::new(callback),
        });
        id
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Drop every listener bound to a specific item or zone.
    pub fn remove_scope(&mut self, scope: &ListenerScope) {
        self.listeners.retain(|l| &l.scope != scope);
    }

    pub fn dispatch(&mut self, event: &DragEvent) {
        self.dispatched += 1;
        for listener in &mut self.listeners {
            let kind_matches = listener.kind.is_none_or(|k| k == event.kind);
            if kind_matches && listener.scope.matches(&event.target) {
                (listener.callback)(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Total events dispatched.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}
