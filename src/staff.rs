//! Geometry of the five-line staff.
//!
//! Each staff position is half a line spacing. The bottom line sits at
//! [`BOTTOM_LINE_POSITION`] and the top line four spacings above it; ledger
//! lines fall on the even positions outside that range.

pub const BOTTOM_LINE_POSITION: i32 = -6;
pub const TOP_LINE_POSITION: i32 = BOTTOM_LINE_POSITION + 8;
const LINE_COUNT: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaffLayout {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub line_spacing: f32,
}

impl Default for StaffLayout {
    fn default() -> Self {
        Self {
            left: 50.0,
            top: 200.0,
            width: 200.0,
            line_spacing: 10.0,
        }
    }
}

impl StaffLayout {
    pub fn bottom(&self) -> f32 {
        self.top + (LINE_COUNT - 1) as f32 * self.line_spacing
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// y of each staff line, top to bottom.
    pub fn line_ys(&self) -> impl Iterator<Item = f32> + '_ {
        (0..LINE_COUNT).map(move |i| self.top + i as f32 * self.line_spacing)
    }

    pub fn y_for(&self, position: i32) -> f32 {
        self.bottom() - (position - BOTTOM_LINE_POSITION) as f32 * self.line_spacing / 2.0
    }

    pub fn clef_x(&self) -> f32 {
        self.left + self.line_spacing
    }

    /// The clef marker spans one spacing above the staff to one below.
    pub fn clef_span(&self) -> (f32, f32) {
        (self.top - self.line_spacing, self.bottom() + self.line_spacing)
    }

    pub fn note_x(&self) -> f32 {
        self.left + 5.0 * self.line_spacing
    }

    pub fn note_radius(&self) -> f32 {
        self.line_spacing * 0.4
    }

    /// Horizontal extent of a ledger line around the note head.
    pub fn ledger_span(&self) -> (f32, f32) {
        (self.note_x() - self.line_spacing, self.note_x() + self.line_spacing)
    }

    /// Positions needing a ledger line for a note at `position`, nearest the
    /// staff first.
    pub fn ledger_positions(position: i32) -> Vec<i32> {
        if position < BOTTOM_LINE_POSITION {
            (position..BOTTOM_LINE_POSITION)
                .rev()
                .filter(|p| p % 2 == 0)
                .collect()
        } else if position > TOP_LINE_POSITION {
            (TOP_LINE_POSITION + 1..=position)
                .filter(|p| p % 2 == 0)
                .collect()
        } else {
            Vec::new()
        }
    }

    pub fn ledger_ys(&self, position: i32) -> Vec<f32> {
        Self::ledger_positions(position)
            .into_iter()
            .map(|p| self.y_for(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_evenly_spaced() {
        let layout = StaffLayout::default();
        let ys: Vec<f32> = layout.line_ys().collect();
        assert_eq!(ys, vec![200.0, 210.0, 220.0, 230.0, 240.0]);
        assert_eq!(layout.bottom(), 240.0);
        assert_eq!(layout.right(), 250.0);
    }

    #[test]
    fn test_line_positions_land_on_lines() {
        let layout = StaffLayout::default();
        assert_eq!(layout.y_for(BOTTOM_LINE_POSITION), 240.0);
        assert_eq!(layout.y_for(TOP_LINE_POSITION), 200.0);
        assert_eq!(layout.y_for(-1), 215.0);
        assert_eq!(layout.y_for(-8), 250.0);
    }

    #[test]
    fn test_no_ledgers_inside_staff() {
        for p in -7..=3 {
            assert!(StaffLayout::ledger_positions(p).is_empty(), "position {p}");
        }
    }

    #[test]
    fn test_ledgers_below_staff() {
        assert_eq!(StaffLayout::ledger_positions(-8), vec![-8]);
        assert_eq!(StaffLayout::ledger_positions(-9), vec![-8]);
        assert_eq!(StaffLayout::ledger_positions(-10), vec![-8, -10]);
        assert_eq!(StaffLayout::default().ledger_ys(-10), vec![250.0, 260.0]);
    }

    #[test]
    fn test_ledgers_above_staff() {
        assert_eq!(StaffLayout::ledger_positions(4), vec![4]);
        assert_eq!(StaffLayout::ledger_positions(5), vec![4]);
        assert_eq!(StaffLayout::ledger_positions(6), vec![4, 6]);
        assert_eq!(StaffLayout::default().ledger_ys(6), vec![190.0, 180.0]);
    }
}
