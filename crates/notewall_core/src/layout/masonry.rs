//! Masonry (column-stacked) card layout.
//!
//! # Responsibility
//! - Place items into equal-width columns in index order.
//! - Cache the last placement and serve frame/visibility queries from it.
//!
//! # Invariants
//! - Column choice is round-robin (`index % column_count`), never
//!   shortest-column; item order is never reshuffled.
//! - Every pass recomputes from scratch; there is no incremental patching.
//! - A failed pass publishes nothing: the cache is cleared, not half-filled.
//!
//! # Caller obligations
//! - The height oracle must not trigger another layout pass. `relayout`
//!   takes `&mut self`, so this cannot happen through the same engine.
//! - Debouncing rapid relayout triggers (resize storms) is up to the caller.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const DEFAULT_COLUMN_COUNT: usize = 2;
const DEFAULT_PADDING: f64 = 8.0;

pub type LayoutResult<T> = Result<T, LayoutError>;

/// Layout-layer error for oracle output, configuration and queries.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Height oracle returned a negative or non-finite value.
    InvalidHeight { index: usize, height: f64 },
    /// Frame query outside the last computed item range.
    IndexOutOfRange { index: usize, item_count: usize },
    /// Column count, padding or container width violates preconditions.
    InvalidConfig(&'static str),
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHeight { index, height } => {
                write!(f, "invalid height {height} for item {index}")
            }
            Self::IndexOutOfRange { index, item_count } => {
                write!(f, "item index {index} out of range for {item_count} item(s)")
            }
            Self::InvalidConfig(details) => write!(f, "invalid layout config: {details}"),
        }
    }
}

impl Error for LayoutError {}

/// Axis-aligned rectangle in container-local coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Returns whether both rects share a region of non-zero area.
    ///
    /// Rects that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }
}

/// Output of one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    /// Inset frame per item, indexed by item position.
    pub frames: Vec<Rect>,
    /// Tallest column's cumulative height.
    pub total_content_height: f64,
}

impl PlacementResult {
    pub fn item_count(&self) -> usize {
        self.frames.len()
    }
}

/// Column count and card spacing of the wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub column_count: usize,
    /// Inset applied to each column slot on the left, right and top edges.
    pub padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_count: DEFAULT_COLUMN_COUNT,
            padding: DEFAULT_PADDING,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> LayoutResult<()> {
        if self.column_count == 0 {
            return Err(LayoutError::InvalidConfig("column_count must be >= 1"));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(LayoutError::InvalidConfig(
                "padding must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Column an item lands in.
pub fn column_for_index(index: usize, column_count: usize) -> usize {
    index % column_count
}

/// Computes a masonry placement for `item_count` items.
///
/// `height_oracle(index, content_width)` is called exactly once per item in
/// ascending index order; `content_width` is the column width minus both
/// horizontal paddings.
///
/// # Errors
/// - `InvalidConfig` when `column_count == 0`, or when `padding` or
///   `container_width` is negative or non-finite.
/// - `InvalidHeight` naming the first index whose oracle height is negative
///   or non-finite. No placements are returned in that case.
pub fn compute_layout<F>(
    item_count: usize,
    container_width: f64,
    column_count: usize,
    padding: f64,
    mut height_oracle: F,
) -> LayoutResult<PlacementResult>
where
    F: FnMut(usize, f64) -> f64,
{
    LayoutConfig {
        column_count,
        padding,
    }
    .validate()?;
    if !container_width.is_finite() || container_width < 0.0 {
        return Err(LayoutError::InvalidConfig(
            "container_width must be finite and >= 0",
        ));
    }

    let column_width = container_width / column_count as f64;
    let content_width = column_width - 2.0 * padding;
    // Round-robin never reaches a column index >= item_count.
    let mut y_offsets = vec![0.0_f64; column_count.min(item_count)];

    let mut frames = Vec::with_capacity(item_count);
    let mut total_content_height = 0.0_f64;

    for index in 0..item_count {
        let column = column_for_index(index, column_count);
        let height = height_oracle(index, content_width);
        if !height.is_finite() || height < 0.0 {
            return Err(LayoutError::InvalidHeight { index, height });
        }

        let slot = Rect::new(
            column as f64 * column_width,
            y_offsets[column],
            column_width,
            height,
        );
        frames.push(Rect::new(
            slot.x + padding,
            slot.y + padding,
            slot.width - 2.0 * padding,
            slot.height,
        ));

        total_content_height = total_content_height.max(slot.max_y());
        y_offsets[column] += slot.height;
    }

    Ok(PlacementResult {
        frames,
        total_content_height,
    })
}

/// Stateful layout engine holding the last successful placement.
#[derive(Debug, Clone, Default)]
pub struct MasonryLayout {
    config: LayoutConfig,
    container_width: f64,
    current: Option<PlacementResult>,
}

impl MasonryLayout {
    pub fn new(config: LayoutConfig) -> LayoutResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            container_width: 0.0,
            current: None,
        })
    }

    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    /// Replaces column count/padding and drops the cached placement.
    pub fn set_config(&mut self, config: LayoutConfig) -> LayoutResult<()> {
        config.validate()?;
        self.config = config;
        self.current = None;
        Ok(())
    }

    /// Recomputes the full layout and caches it on success.
    ///
    /// On failure the previous placement is discarded as well, so queries
    /// never observe a layout that no longer matches the content.
    pub fn relayout<F>(
        &mut self,
        item_count: usize,
        container_width: f64,
        height_oracle: F,
    ) -> LayoutResult<&PlacementResult>
    where
        F: FnMut(usize, f64) -> f64,
    {
        let started_at = Instant::now();
        self.current = None;

        let placement = match compute_layout(
            item_count,
            container_width,
            self.config.column_count,
            self.config.padding,
            height_oracle,
        ) {
            Ok(placement) => placement,
            Err(err) => {
                warn!(
                    "event=layout_compute module=layout status=error items={} columns={} error={}",
                    item_count, self.config.column_count, err
                );
                return Err(err);
            }
        };

        debug!(
            "event=layout_compute module=layout status=ok items={} columns={} content_height={} duration_us={}",
            item_count,
            self.config.column_count,
            placement.total_content_height,
            started_at.elapsed().as_micros()
        );
        self.container_width = container_width;
        let cached: &PlacementResult = self.current.insert(placement);
        Ok(cached)
    }

    /// Last successful placement, if any.
    pub fn placement(&self) -> Option<&PlacementResult> {
        self.current.as_ref()
    }

    pub fn item_count(&self) -> usize {
        self.current
            .as_ref()
            .map_or(0, PlacementResult::item_count)
    }

    /// Scrollable content size as `(width, height)`.
    pub fn content_size(&self) -> (f64, f64) {
        match self.current.as_ref() {
            Some(placement) => (self.container_width, placement.total_content_height),
            None => (0.0, 0.0),
        }
    }

    pub fn frame_for_item(&self, index: usize) -> LayoutResult<Rect> {
        self.current
            .as_ref()
            .and_then(|placement| placement.frames.get(index).copied())
            .ok_or(LayoutError::IndexOutOfRange {
                index,
                item_count: self.item_count(),
            })
    }

    /// Indices (ascending) of every item whose frame intersects `rect`.
    pub fn items_intersecting(&self, rect: &Rect) -> Vec<usize> {
        let Some(placement) = self.current.as_ref() else {
            return Vec::new();
        };
        placement
            .frames
            .iter()
            .enumerate()
            .filter(|(_, frame)| frame.intersects(rect))
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_layout, LayoutConfig, LayoutError, MasonryLayout, Rect};

    #[test]
    fn rect_edge_contact_is_not_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(a.intersects(&Rect::new(9.5, 9.5, 1.0, 1.0)));
    }

    #[test]
    fn empty_rect_never_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&Rect::new(5.0, 5.0, 0.0, 3.0)));
        assert!(!a.intersects(&Rect::new(5.0, 5.0, -2.0, 3.0)));
    }

    #[test]
    fn config_rejects_zero_columns_and_negative_padding() {
        let zero = LayoutConfig {
            column_count: 0,
            padding: 8.0,
        };
        assert!(matches!(zero.validate(), Err(LayoutError::InvalidConfig(_))));

        let negative = LayoutConfig {
            column_count: 2,
            padding: -1.0,
        };
        assert!(matches!(
            negative.validate(),
            Err(LayoutError::InvalidConfig(_))
        ));
    }

    #[test]
    fn compute_rejects_non_finite_container_width() {
        let err = compute_layout(1, f64::NAN, 2, 0.0, |_, _| 1.0).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfig(_)));
    }

    #[test]
    fn oracle_receives_content_width() {
        let mut widths = Vec::new();
        compute_layout(2, 300.0, 2, 10.0, |_, width| {
            widths.push(width);
            1.0
        })
        .unwrap();
        assert_eq!(widths, vec![130.0, 130.0]);
    }

    #[test]
    fn set_config_invalidates_cached_layout() {
        let mut layout = MasonryLayout::default();
        layout.relayout(3, 300.0, |_, _| 50.0).unwrap();
        assert_eq!(layout.item_count(), 3);

        layout
            .set_config(LayoutConfig {
                column_count: 3,
                padding: 4.0,
            })
            .unwrap();
        assert!(layout.placement().is_none());
        assert!(layout.frame_for_item(0).is_err());
    }

    #[test]
    fn content_size_tracks_width_and_tallest_column() {
        let mut layout = MasonryLayout::default();
        layout
            .relayout(3, 390.0, |index, _| if index == 1 { 300.0 } else { 100.0 })
            .unwrap();
        assert_eq!(layout.content_size(), (390.0, 300.0));
    }
}
