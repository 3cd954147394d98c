//! Host-facing facade tying entries, the curve editor and the animator together.
//!
//! Hosts call [`SpinEngine::frame`] from their frame callback and draw with the
//! returned rotation. The live read-out and the final outcome both come from
//! [`read_pointer`], the same function the magnifier uses.

use tracing::info;

use crate::animator::{SpinAnimator, SpinRejected, SpinSession};
use crate::curve::SpeedCurve;
use crate::editor::{CurveEditor, GraphLayout};
use crate::entry::WheelEntry;
use crate::rng::SpinRandom;
use crate::selection::{read_pointer, PointerReading};
use crate::settings::SpinSettings;

const DEFAULT_GRAPH_W: f64 = 480.0;
const DEFAULT_GRAPH_H: f64 = 240.0;

/// Fired once per completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinCompleted {
    pub index: usize,
    pub label: String,
}

/// State after one frame callback.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub rotation_deg: f64,
    /// Session progress, `None` while idle.
    pub progress: Option<f64>,
    /// Entry under the pointer; `None` for an empty wheel.
    pub reading: Option<PointerReading>,
    pub completed: Option<SpinCompleted>,
}

#[derive(Debug, Clone)]
pub struct SpinEngine {
    entries: Vec<WheelEntry>,
    editor: CurveEditor,
    animator: SpinAnimator,
    settings: SpinSettings,
    last_outcome: Option<SpinCompleted>,
}

impl SpinEngine {
    pub fn new(settings: SpinSettings) -> Self {
        let settings = settings.sanitized();
        let editor = CurveEditor::new(
            settings.curve.clone(),
            GraphLayout::new(DEFAULT_GRAPH_W, DEFAULT_GRAPH_H),
            settings.duration_s,
        );
        Self {
            entries: Vec::new(),
            editor,
            animator: SpinAnimator::with_turns(settings.turns()),
            settings,
            last_outcome: None,
        }
    }

    /// Replace the entry list. Rejected while a spin is running.
    pub fn set_entries(&mut self, entries: Vec<WheelEntry>) -> bool {
        if self.animator.is_spinning() {
            return false;
        }
        self.entries = entries;
        true
    }

    pub fn entries(&self) -> &[WheelEntry] {
        &self.entries
    }

    pub fn editor(&self) -> &CurveEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut CurveEditor {
        &mut self.editor
    }

    pub fn curve(&self) -> &SpeedCurve {
        self.editor.curve()
    }

    /// Current settings, including the edited curve.
    pub fn settings(&self) -> SpinSettings {
        SpinSettings {
            curve: self.editor.curve().clone(),
            ..self.settings.clone()
        }
    }

    /// Apply new settings. A running session keeps its own duration and turns.
    pub fn apply_settings(&mut self, settings: SpinSettings) {
        let settings = settings.sanitized();
        self.editor.set_curve(settings.curve.clone());
        self.editor.set_duration_s(settings.duration_s);
        self.animator.set_turns(settings.turns());
        self.settings = settings;
    }

    pub fn set_duration_s(&mut self, duration_s: f64) {
        let settings = SpinSettings {
            duration_s,
            ..self.settings.clone()
        }
        .sanitized();
        self.editor.set_duration_s(settings.duration_s);
        self.settings.duration_s = settings.duration_s;
    }

    pub fn duration_s(&self) -> f64 {
        self.settings.duration_s
    }

    pub fn is_spinning(&self) -> bool {
        self.animator.is_spinning()
    }

    pub fn rotation_deg(&self) -> f64 {
        self.animator.rotation_deg()
    }

    pub fn session(&self) -> Option<&SpinSession> {
        self.animator.session()
    }

    /// Manual rotation while idle.
    pub fn set_rotation(&mut self, deg: f64) -> bool {
        self.animator.set_rotation(deg)
    }

    pub fn spin(
        &mut self,
        now_ms: f64,
        rng: &mut impl SpinRandom,
    ) -> Result<SpinSession, SpinRejected> {
        self.animator
            .start(now_ms, self.settings.duration_ms(), self.entries.len(), rng)
    }

    /// Advance to `now_ms`. `completed` is set on exactly one frame per finished spin.
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        let step = self.animator.advance(now_ms, self.editor.curve());
        let rotation_deg = self.animator.rotation_deg();
        let reading = read_pointer(rotation_deg, self.entries.len());

        let completed = match (step, reading) {
            (Some(f), Some(r)) if f.finished => {
                let label = self.entries[r.index].label.clone();
                info!(index = r.index, label = %label, rotation_deg, "spin completed");
                let outcome = SpinCompleted {
                    index: r.index,
                    label,
                };
                self.last_outcome = Some(outcome.clone());
                Some(outcome)
            }
            _ => None,
        };

        FrameReport {
            rotation_deg,
            progress: step.map(|f| f.progress),
            reading,
            completed,
        }
    }

    /// What the pointer currently reads.
    pub fn reading(&self) -> Option<PointerReading> {
        read_pointer(self.animator.rotation_deg(), self.entries.len())
    }

    pub fn current_entry(&self) -> Option<&WheelEntry> {
        self.reading().and_then(|r| self.entries.get(r.index))
    }

    pub fn last_outcome(&self) -> Option<&SpinCompleted> {
        self.last_outcome.as_ref()
    }

    /// Host teardown mid-spin: stop without an outcome.
    pub fn abandon(&mut self) -> bool {
        self.animator.abandon().is_some()
    }
}
