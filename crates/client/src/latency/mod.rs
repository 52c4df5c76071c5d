// Round-trip latency probe
use protocol::ClientMessage;

/// Display band for a latency value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl LatencyQuality {
    pub fn from_ms(ms: f64) -> Self {
        if ms < 50.0 {
            LatencyQuality::Excellent
        } else if ms < 100.0 {
            LatencyQuality::Good
        } else if ms < 200.0 {
            LatencyQuality::Fair
        } else {
            LatencyQuality::Poor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LatencyQuality::Excellent => "excellent",
            LatencyQuality::Good => "good",
            LatencyQuality::Fair => "fair",
            LatencyQuality::Poor => "poor",
        }
    }
}

/// Single-sample round-trip estimate, driven by a periodic timer every
/// `interval_ms`.
#[derive(Debug, Clone)]
pub struct LatencyMonitor {
    interval_ms: u64,
    active: bool,
    last_probe: Option<f64>,
    current: Option<f64>,
}

impl LatencyMonitor {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            active: false,
            last_probe: None,
            current: None,
        }
    }

    #[inline]
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Latest round trip in ms.
    #[inline]
    pub fn current(&self) -> Option<f64> {
        self.current
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    /// Stop probing; the channel is gone.
    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Timer fired: record the send time and emit a probe, unless cancelled or
    /// the channel is closed.
    pub fn probe(&mut self, now: f64, channel_open: bool) -> Option<ClientMessage> {
        if !self.active || !channel_open {
            return None;
        }
        self.last_probe = Some(now);
        Some(ClientMessage::Ping)
    }

    /// Reply received. Returns the new estimate; replies with no probe on
    /// record are ignored.
    pub fn on_pong(&mut self, now: f64) -> Option<f64> {
        let sent = self.last_probe?;
        let rtt = (now - sent).max(0.0);
        self.current = Some(rtt);
        Some(rtt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands() {
        assert_eq!(LatencyQuality::from_ms(0.0), LatencyQuality::Excellent);
        assert_eq!(LatencyQuality::from_ms(49.9), LatencyQuality::Excellent);
        assert_eq!(LatencyQuality::from_ms(50.0), LatencyQuality::Good);
        assert_eq!(LatencyQuality::from_ms(150.0), LatencyQuality::Fair);
        assert_eq!(LatencyQuality::from_ms(200.0), LatencyQuality::Poor);
        assert_eq!(LatencyQuality::Poor.as_str(), "poor");
    }

    #[test]
    fn test_probe_and_pong() {
        let mut mon = LatencyMonitor::new(2000);
        assert_eq!(mon.interval_ms(), 2000);
        assert!(mon.probe(0.0, true).is_none());
        mon.start();
        assert_eq!(mon.probe(1000.0, true), Some(ClientMessage::Ping));
        assert_eq!(mon.on_pong(1042.0), Some(42.0));
        assert_eq!(mon.current(), Some(42.0));
        assert!(mon.probe(3000.0, true).is_some());
        assert_eq!(mon.on_pong(3100.0), Some(100.0));
    }

    #[test]
    fn test_closed_or_cancelled_sends_nothing() {
        let mut mon = LatencyMonitor::new(2000);
        mon.start();
        assert!(mon.probe(0.0, false).is_none());
        mon.cancel();
        assert!(mon.probe(5000.0, true).is_none());
        assert!(!mon.is_active());
    }

    #[test]
    fn test_unsolicited_pong_ignored() {
        let mut mon = LatencyMonitor::new(2000);
        assert_eq!(mon.on_pong(10.0), None);
        assert_eq!(mon.current(), None);
    }
}
