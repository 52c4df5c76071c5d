// Status output sinks
use crate::latency::LatencyQuality;
use crate::utils;

/// Local player's role, as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Shaman,
    Mouse,
}

impl Role {
    pub fn from_flag(is_shaman: bool) -> Self {
        if is_shaman { Role::Shaman } else { Role::Mouse }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Shaman => "Shaman",
            Role::Mouse => "Mouse",
        }
    }
}

/// Where status text goes. Every method has a no-op default so sinks only
/// implement what they display.
pub trait StatusSink {
    fn player_id(&mut self, _id: &str) {}
    fn role(&mut self, _role: Role) {}
    fn player_count(&mut self, _count: usize) {}
    fn latency(&mut self, _ms: f64, _quality: LatencyQuality) {}
    fn dimensions(&mut self, _width: f32, _height: f32) {}
    /// Transient message (winner, new round, disconnect).
    fn show_message(&mut self, _text: &str) {}
}

/// Status lines, as the game HUD formats them.
pub fn format_player_id(id: &str) -> String {
    format!("Player: {}", utils::short_id(id))
}

pub fn format_latency(ms: f64, quality: LatencyQuality) -> String {
    format!("{:.0}ms ({})", ms, quality.as_str())
}

pub fn format_winner(id: &str) -> String {
    format!("Player {} won!", utils::short_id(id))
}

/// Status sink that keeps the latest value of everything it was shown.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct RecordingStatus {
    pub player_id: Option<String>,
    pub role: Option<Role>,
    pub player_count: Option<usize>,
    pub latency: Option<(f64, LatencyQuality)>,
    pub dimensions: Option<(f32, f32)>,
    pub messages: Vec<String>,
}

#[cfg(test)]
impl StatusSink for RecordingStatus {
    fn player_id(&mut self, id: &str) {
        self.player_id = Some(id.to_string());
    }

    fn role(&mut self, role: Role) {
        self.role = Some(role);
    }

    fn player_count(&mut self, count: usize) {
        self.player_count = Some(count);
    }

    fn latency(&mut self, ms: f64, quality: LatencyQuality) {
        self.latency = Some((ms, quality));
    }

    fn dimensions(&mut self, width: f32, height: f32) {
        self.dimensions = Some((width, height));
    }

    fn show_message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats() {
        assert_eq!(format_player_id("abcdefgh"), "Player: abcde");
        assert_eq!(format_latency(42.4, LatencyQuality::Excellent), "42ms (excellent)");
        assert_eq!(format_winner("xyz123"), "Player xyz12 won!");
        assert_eq!(Role::from_flag(true), Role::Shaman);
    }
}
