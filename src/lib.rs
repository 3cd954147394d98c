//! # wheelspin
//!
//! The spin engine behind a prize wheel widget: a user-authored angular speed
//! curve drives a rotation animation, a cached wheel image is composited under a
//! fixed pointer, and the entry under that pointer is selected when the spin ends.
//!
//! ## Quick Start
//!
//! ```
//! use wheelspin::prelude::*;
//!
//! let mut engine = SpinEngine::new(SpinSettings::default());
//! engine.set_entries(entries_from_labels(["Alice", "Bob", "Carol"]));
//!
//! let mut rng = Prng::new(42);
//! engine.spin(0.0, &mut rng).unwrap();
//!
//! let mut now = 0.0;
//! let outcome = loop {
//!     now += 16.0;
//!     if let Some(done) = engine.frame(now).completed {
//!         break done;
//!     }
//! };
//! assert!(outcome.index < 3);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): JSON persistence of settings and curves
//! - `cli`: the `wheelspin-cli` headless simulator
//!
//! ## Modules
//!
//! - [`curve`]: speed curve model (interpolation + normalized integral)
//! - [`editor`]: pointer-driven curve authoring and its visualization
//! - [`animator`]: spin sessions and the per-frame rotation
//! - [`selection`]: pointer read-out shared by magnifier, live label and outcome
//! - [`render`]: immediate-mode drawing interface and the two-pass wheel renderer
//! - [`magnifier`]: scrolling read-out panel
//! - [`engine`]: host-facing facade

#[path = "core/curve.rs"]
pub mod curve;

#[path = "core/editor.rs"]
pub mod editor;

#[path = "core/rng.rs"]
pub mod rng;

#[path = "core/animator.rs"]
pub mod animator;

#[path = "core/selection.rs"]
pub mod selection;

#[path = "core/entry.rs"]
pub mod entry;

#[path = "core/render.rs"]
pub mod render;

#[path = "core/magnifier.rs"]
pub mod magnifier;

#[path = "core/recording.rs"]
pub mod recording;

#[path = "core/settings.rs"]
pub mod settings;

#[path = "core/fmt.rs"]
pub mod fmt;

#[path = "core/engine.rs"]
pub mod engine;

/// Prelude module for convenient imports.
///
/// ```
/// use wheelspin::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animator::{SpinAnimator, SpinRejected, SpinSession, SpinState};
    pub use crate::curve::{ControlPoint, CurveError, SpeedCurve};
    pub use crate::editor::{CurveEditor, GraphLayout};
    pub use crate::engine::{FrameReport, SpinCompleted, SpinEngine};
    pub use crate::entry::{entries_from_labels, WheelEntry};
    pub use crate::recording::RecordingSurface;
    pub use crate::render::{Compositor, Surface, WheelLayout, WheelRenderer};
    pub use crate::rng::{Prng, SpinRandom};
    pub use crate::selection::{read_pointer, selected_index, PointerReading};
    pub use crate::settings::SpinSettings;
}
