use foundation::time::Time;
use imagery::ProbeOutcome;

/// Seconds a finished status stays fully opaque before fading.
pub const STATUS_HOLD_S: f64 = 5.0;
/// Opacity after each further second; dismissed one second after the last.
const FADE_STEPS: [f32; 4] = [0.8, 0.6, 0.4, 0.2];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tone {
    Pending,
    Success,
    Warning,
    Error,
}

impl Tone {
    pub fn color(self) -> [u8; 3] {
        match self {
            Tone::Pending => [255, 255, 0],
            Tone::Success => [0x4C, 0xAF, 0x50],
            Tone::Warning => [255, 165, 0],
            Tone::Error => [0xF4, 0x43, 0x36],
        }
    }
}

/// A transient message shown while and after a connectivity test runs.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub lines: Vec<String>,
    pub tone: Tone,
    pub shown_at: Time,
    /// Whether the message fades out on its own.
    pub auto_dismiss: bool,
}

impl StatusMessage {
    pub fn testing(now: Time) -> Self {
        Self {
            lines: vec!["Testing NASA API connection...".to_string()],
            tone: Tone::Pending,
            shown_at: now,
            auto_dismiss: false,
        }
    }

    /// Failures stay on screen; everything else fades.
    pub fn from_probe(outcome: &ProbeOutcome, now: Time) -> Self {
        let tone = match outcome {
            ProbeOutcome::Success { .. } => Tone::Success,
            ProbeOutcome::NoImages { .. } => Tone::Warning,
            ProbeOutcome::Failed { .. } => Tone::Error,
        };
        Self {
            lines: outcome.report(),
            tone,
            shown_at: now,
            auto_dismiss: tone != Tone::Error,
        }
    }

    /// Opacity at `now`, or `None` once the message has been dismissed.
    pub fn opacity(&self, now: Time) -> Option<f32> {
        if !self.auto_dismiss {
            return Some(1.0);
        }
        let elapsed = now.since(self.shown_at);
        if elapsed < STATUS_HOLD_S {
            return Some(1.0);
        }
        let step = (elapsed - STATUS_HOLD_S).floor() as usize;
        FADE_STEPS.get(step).copied()
    }

    pub fn is_visible(&self, now: Time) -> bool {
        self.opacity(now).is_some()
    }
}
