//! The display collaborator the core pushes to.

use super::mode::{DisplayMode, Representation};

/// What the core needs from a page or terminal front end.
pub trait View {
    /// Session length typed by the user, in ms.
    fn read_session_duration_input(&self) -> f64;

    /// Break length typed by the user, in ms.
    fn read_break_duration_input(&self) -> f64;

    /// Push region contents; regions not mentioned keep their content.
    fn render(&mut self, representation: &Representation);

    fn show_session_display(&mut self);

    fn show_break_display(&mut self);

    fn propose_session_display(&mut self);

    fn propose_break_display(&mut self);
}

/// In-memory view used by headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub session_input: f64,
    pub break_input: f64,
    regions: Representation,
    display: Option<DisplayMode>,
    renders: usize,
}

impl RecordingView {
    pub fn new(session_input: f64, break_input: f64) -> Self {
        Self {
            session_input,
            break_input,
            ..Self::default()
        }
    }

    /// Current content of every region pushed so far.
    pub fn regions(&self) -> &Representation {
        &self.regions
    }

    /// Text of a region, if it holds text.
    pub fn text(&self, region: &str) -> Option<&str> {
        match self.regions.get(region) {
            Some(super::RegionValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn display(&self) -> Option<DisplayMode> {
        self.display
    }

    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl View for RecordingView {
    fn read_session_duration_input(&self) -> f64 {
        self.session_input
    }

    fn read_break_duration_input(&self) -> f64 {
        self.break_input
    }

    fn render(&mut self, representation: &Representation) {
        for (region, value) in representation {
            self.regions.insert(region.clone(), value.clone());
        }
        self.renders += 1;
    }

    fn show_session_display(&mut self) {
        self.display = Some(DisplayMode::ShowSession);
    }

    fn show_break_display(&mut self) {
        self.display = Some(DisplayMode::ShowBreak);
    }

    fn propose_session_display(&mut self) {
        self.display = Some(DisplayMode::ProposeSession);
    }

    fn propose_break_display(&mut self) {
        self.display = Some(DisplayMode::ProposeBreak);
    }
}
