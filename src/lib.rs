//! Dragzone - drag-and-drop interaction coordinator.
//!
//! Lets a user pick up an item with the pointer, carry it across a surface
//! and drop it into one of several zones, while driving pick-up, hover and
//! settle transitions. Rendering and animation stay with the host, behind
//! the [`scene::VisualTree`] and [`transition::Animator`] traits.
//!
//! ```ignore
//! let mut engine = DragEngine::new(scene, TimedAnimator::new(), EngineConfig::default());
//! let zone = engine.register_zone(list_node, ZoneOptions::new())?;
//! let item = engine.register_item(card_node, DragPayload::new("note", "n1"), ItemOptions::new())?;
//!
//! engine.pointer_down(card_node, pos, Modifiers::none())?;
//! engine.pointer_move(next_pos)?;
//! engine.tick(now);
//! engine.pointer_up(next_pos)?;
//! ```

pub mod bridge;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod item;
pub mod logging;
pub mod perf;
pub mod registry;
pub mod scene;
pub mod session;
pub mod spatial_index;
pub mod style;
pub mod transition;
pub mod types;
pub mod zone;

pub use bridge::{Modifiers, NativeDragEvent, PointerEvent};
pub use config::{CopyModifier, EngineConfig};
pub use engine::DragEngine;
pub use error::{DragError, DragResult};
pub use events::{DragEvent, DragEventKind, EventTarget, ListenerScope};
pub use geometry::{Axis, Point, Rect, Size};
pub use item::{ItemOptions, ItemState};
pub use scene::{NodeId, Scene, VisualTree};
pub use session::{DragSession, SessionStatus};
pub use transition::{Animator, ImmediateAnimator, TimedAnimator};
pub use types::{DragEffect, DragOutcome, DragPayload, ItemId, PreviewStrategy, ZoneId};
pub use zone::ZoneOptions;
