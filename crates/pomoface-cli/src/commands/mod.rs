pub mod config;
pub mod run;
pub mod simulate;
pub mod table;

use pomoface_core::{
    Config, ControlState, HostFrames, Pomodoro, RecordingSurface, RecordingView,
};

/// A pomodoro with no screen: view and surface are in-memory recorders and
/// the caller owns the clock.
pub struct Headless {
    pub app: Pomodoro<RecordingView, HostFrames>,
    surface: RecordingSurface,
}

impl Headless {
    pub fn new(
        config: &Config,
        session_ms: f64,
        break_ms: f64,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let app = Pomodoro::new(
            config,
            RecordingView::new(session_ms, break_ms),
            HostFrames::new(0.0),
        )?;
        Ok(Self {
            app,
            surface: RecordingSurface::new(),
        })
    }

    /// Deliver a refresh at `time` if one is pending.
    pub fn frame(&mut self, time: f64) -> bool {
        self.app.scheduler_mut().set_now(time);
        match self.app.scheduler_mut().take_due() {
            Some(handle) => self.app.frame(handle, time, &mut self.surface),
            None => false,
        }
    }

    /// Strokes drawn by the last executed frame.
    pub fn strokes(&self) -> usize {
        self.surface.frame().len()
    }

    /// Stand in for the user when automatic cycling is off.
    pub fn advance_ended_phase(&mut self) {
        if self.app.deferred().next().is_some() {
            return;
        }
        match self.app.state() {
            ControlState::EndedSession => {
                self.app.submit(pomoface_core::Action::StartBreak);
            }
            ControlState::EndedBreak => {
                self.app.submit(pomoface_core::Action::StartSession);
            }
            _ => {}
        }
    }
}
