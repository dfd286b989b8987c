/*
 * Pure layout math for containers of owner-drawn widgets: a vertical flow
 * that stacks children top to bottom and the scrollbar arithmetic that goes
 * with it. Nothing here touches a window; callers move the native children to
 * the returned rectangles.
 */

use crate::types::{Rect, Size};

/// Stacks children vertically, like a column of top-docked controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalFlow {
    /// Space between the container edge and the children, on every side.
    pub padding: i32,
    /// Vertical gap between consecutive children.
    pub spacing: i32,
    /// Children take the full inner width instead of their own.
    pub stretch: bool,
}

impl Default for VerticalFlow {
    fn default() -> Self {
        Self {
            padding: 8,
            spacing: 4,
            stretch: true,
        }
    }
}

impl VerticalFlow {
    /// Height needed to show every child without scrolling.
    pub fn content_height(&self, children: &[Size]) -> i32 {
        if children.is_empty() {
            return 2 * self.padding.max(0);
        }
        let heights: i32 = children.iter().map(|c| c.height.max(0)).sum();
        let gaps = self.spacing.max(0) * (children.len() as i32 - 1);
        heights + gaps + 2 * self.padding.max(0)
    }

    /*
     * Rectangles for `children` inside `viewport`, shifted up by
     * `scroll_offset`. Children scrolled out of view still get a rectangle so
     * the caller can move them consistently.
     */
    pub fn arrange(&self, viewport: Rect, children: &[Size], scroll_offset: i32) -> Vec<Rect> {
        let padding = self.padding.max(0);
        let inner_left = viewport.left + padding;
        let inner_width = (viewport.width() - 2 * padding).max(0);
        let mut top = viewport.top + padding - scroll_offset;

        children
            .iter()
            .map(|child| {
                let width = if self.stretch {
                    inner_width
                } else {
                    child.width.clamp(0, inner_width)
                };
                let height = child.height.max(0);
                let rect = Rect::new(inner_left, top, inner_left + width, top + height);
                top = rect.bottom + self.spacing.max(0);
                rect
            })
            .collect()
    }
}

/// Scroll state of a viewport showing part of a taller content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub viewport: i32,
    pub content: i32,
}

/// Position and length of a scrollbar thumb along its track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollThumb {
    pub position: i32,
    pub length: i32,
}

impl ScrollMetrics {
    pub fn new(viewport: i32, content: i32) -> Self {
        Self {
            viewport: viewport.max(0),
            content: content.max(0),
        }
    }

    pub fn is_scrollable(&self) -> bool {
        self.content > self.viewport
    }

    pub fn max_offset(&self) -> i32 {
        (self.content - self.viewport).max(0)
    }

    pub fn clamp_offset(&self, offset: i32) -> i32 {
        offset.clamp(0, self.max_offset())
    }

    /*
     * Thumb for a track of `track` pixels. The thumb length is proportional to
     * the visible fraction but never shorter than `min_length`. Returns `None`
     * when everything fits and no scrollbar is needed.
     */
    pub fn thumb(&self, track: i32, offset: i32, min_length: i32) -> Option<ScrollThumb> {
        if !self.is_scrollable() || track <= 0 {
            return None;
        }
        let proportional =
            (track as i64 * self.viewport as i64 / self.content as i64) as i32;
        let length = proportional.max(min_length).min(track);
        let travel = track - length;
        let offset = self.clamp_offset(offset);
        let position = (travel as i64 * offset as i64 / self.max_offset() as i64) as i32;
        Some(ScrollThumb { position, length })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize, height: i32) -> Vec<Size> {
        vec![Size::new(60, height); n]
    }

    #[test]
    fn flow_stacks_children_with_spacing() {
        let flow = VerticalFlow {
            padding: 10,
            spacing: 5,
            stretch: true,
        };
        let rects = flow.arrange(Rect::new(0, 0, 200, 100), &rows(3, 20), 0);
        assert_eq!(rects[0], Rect::new(10, 10, 190, 30));
        assert_eq!(rects[1], Rect::new(10, 35, 190, 55));
        assert_eq!(rects[2], Rect::new(10, 60, 190, 80));
        assert_eq!(flow.content_height(&rows(3, 20)), 90);
    }

    #[test]
    fn scroll_offset_moves_every_child_up() {
        let flow = VerticalFlow::default();
        let unscrolled = flow.arrange(Rect::new(0, 0, 100, 50), &rows(4, 30), 0);
        let scrolled = flow.arrange(Rect::new(0, 0, 100, 50), &rows(4, 30), 25);
        for (a, b) in unscrolled.iter().zip(&scrolled) {
            assert_eq!(b.top, a.top - 25);
            assert_eq!(b.height(), a.height());
        }
    }

    #[test]
    fn unstretched_children_keep_their_width_within_bounds() {
        let flow = VerticalFlow {
            stretch: false,
            ..VerticalFlow::default()
        };
        let rects = flow.arrange(
            Rect::new(0, 0, 100, 100),
            &[Size::new(40, 10), Size::new(500, 10)],
            0,
        );
        assert_eq!(rects[0].width(), 40);
        assert_eq!(rects[1].width(), 84);
    }

    #[test]
    fn empty_flow_is_only_padding() {
        assert_eq!(VerticalFlow::default().content_height(&[]), 16);
    }

    #[test]
    fn offsets_are_clamped_to_the_content() {
        let metrics = ScrollMetrics::new(100, 250);
        assert_eq!(metrics.max_offset(), 150);
        assert_eq!(metrics.clamp_offset(-5), 0);
        assert_eq!(metrics.clamp_offset(400), 150);
        assert!(!ScrollMetrics::new(100, 80).is_scrollable());
        assert_eq!(ScrollMetrics::new(100, 80).max_offset(), 0);
    }

    #[test]
    fn thumb_tracks_offset_and_respects_minimum() {
        let metrics = ScrollMetrics::new(100, 400);
        let top = metrics.thumb(200, 0, 10).unwrap();
        assert_eq!(top, ScrollThumb { position: 0, length: 50 });
        let bottom = metrics.thumb(200, 300, 10).unwrap();
        assert_eq!(bottom.position, 150);

        let tall = ScrollMetrics::new(10, 10_000);
        assert_eq!(tall.thumb(200, 0, 16).unwrap().length, 16);
        assert_eq!(ScrollMetrics::new(100, 100).thumb(200, 0, 10), None);
    }
}
