//! Stateless projections of dial state.
//!
//! The dial never draws anything. A renderer takes a [`DialState`] snapshot
//! and turns it into output; it keeps no state of its own between calls.

use crate::common::{RingKind, SweepMode};
use crate::components::ring::RingState;
use crate::dial::DialState;
use colored::Colorize;
use std::fmt::Write;

pub trait Renderer {
    fn render(&self, state: &DialState) -> String;
}

/// Highlight colour of each ring's active item.
pub fn active_color(kind: RingKind) -> (u8, u8, u8) {
    match kind {
        RingKind::Day => (0x98, 0x97, 0x1a),
        RingKind::Month => (0xd7, 0x99, 0x12),
        RingKind::Weekday => (0xcc, 0x24, 0x1d),
        RingKind::Hour => (0xff, 0xff, 0xff),
        RingKind::Minute => (0xdd, 0xdd, 0xdd),
        RingKind::Second => (0xaa, 0xaa, 0xaa),
    }
}

/// Draws each ring as one terminal line: the labels nearest the reference
/// position, with the active one in the middle.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    /// Labels shown on each side of the reference position.
    pub window: usize,
    pub colored: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            window: 3,
            colored: true,
        }
    }
}

impl TextRenderer {
    pub fn plain() -> Self {
        Self {
            colored: false,
            ..Self::default()
        }
    }

    /// Renders a single ring line.
    pub fn render_ring(&self, ring: &RingState) -> String {
        let mut line = format!("{:<8}", ring.kind.name());
        let Some(active) = ring.active else {
            let _ = write!(line, "   -- no active item ({} items)", ring.items.len());
            return line;
        };

        let count = ring.items.len() as isize;
        let window = self.window as isize;
        for offset in -window..=window {
            let mut index = active as isize + offset;
            if ring.sweep == SweepMode::Full360 {
                index = index.rem_euclid(count);
            }
            let label = if (0..count).contains(&index) {
                self.label(ring, index as usize, offset == 0)
            } else {
                "    ".to_string()
            };
            line.push(' ');
            line.push_str(&label);
        }
        if let Some(rotation) = ring.rotation {
            let _ = write!(line, "   {rotation:+8.2}°");
        }
        line
    }

    fn label(&self, ring: &RingState, index: usize, is_active: bool) -> String {
        let text = &ring.items[index].label;
        if is_active {
            let framed = format!("[{text}]");
            if !self.colored {
                return framed;
            }
            let (r, g, b) = active_color(ring.kind);
            return framed.truecolor(r, g, b).bold().to_string();
        }
        // Minute and second rings only print every tenth label.
        let sparse = matches!(ring.kind, RingKind::Minute | RingKind::Second);
        let text = if sparse && index % 10 != 0 {
            "··".to_string()
        } else {
            text.clone()
        };
        let padded = format!(" {text} ");
        if self.colored {
            padded.dimmed().to_string()
        } else {
            padded
        }
    }
}

impl Renderer for TextRenderer {
    fn render(&self, state: &DialState) -> String {
        let mut out = match state.timestamp {
            Some(timestamp) => format!("{timestamp}\n"),
            None => "no timestamp\n".to_string(),
        };
        for ring in &state.rings {
            out.push_str(&self.render_ring(ring));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dial::Dial;
    use chrono_tz::Tz;

    #[test]
    fn plain_rendering_marks_active_labels() {
        let mut dial = Dial::default();
        dial.set_date("2024-02-29T00:00:00", &Tz::UTC);
        let text = TextRenderer::plain().render(&dial.state());
        assert!(text.starts_with("2024-02-29T00:00:00\n"));
        assert!(text.contains("[29]"));
        assert!(text.contains("[Feb]"));
        assert!(text.contains("[Thu]"));
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn full_rings_wrap_partial_rings_do_not() {
        let mut dial = Dial::default();
        dial.set_date("2024-01-01T00:00:00", &Tz::UTC);
        let state = dial.state();
        let renderer = TextRenderer::plain();

        let hour = renderer.render_ring(state.ring(RingKind::Hour).unwrap());
        assert!(hour.contains(" 23 "));

        let month = renderer.render_ring(state.ring(RingKind::Month).unwrap());
        assert!(!month.contains("Dec"));
        assert!(month.contains("[Jan]"));
    }

    #[test]
    fn inactive_ring_says_so() {
        let state = Dial::default().state();
        let line = TextRenderer::plain().render_ring(state.ring(RingKind::Second).unwrap());
        assert!(line.contains("no active item (60 items)"));
    }
}
