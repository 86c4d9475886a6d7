//! Touch samples as reported by the platform

use crate::coords::Point;
use crate::event::TouchId;
use smallvec::SmallVec;

/// One raw touch sample in pixel space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSample {
    /// Platform touch identifier
    pub id: TouchId,
    /// X position in pixels
    pub x: i32,
    /// Y position in pixels
    pub y: i32,
}

impl TouchSample {
    /// Create a sample
    pub const fn new(id: i64, x: i32, y: i32) -> Self {
        Self {
            id: TouchId(id),
            x,
            y,
        }
    }

    /// Position as a pixel-space point on the z = 0 plane
    pub fn pixel_point(&self) -> Point {
        Point::new(self.x as f32, self.y as f32, 0.0)
    }
}

/// Simultaneous touch samples plus their tap count
#[derive(Clone, Debug, PartialEq)]
pub struct TouchBatch {
    samples: SmallVec<[TouchSample; 4]>,
    tap_count: usize,
}

impl TouchBatch {
    /// An empty batch
    pub fn empty() -> Self {
        Self {
            samples: SmallVec::new(),
            tap_count: 1,
        }
    }

    /// Build a batch from parallel platform arrays
    ///
    /// `count` is clamped to the shortest array; a negative count yields an
    /// empty batch.
    pub fn from_slices(count: i32, xs: &[i32], ys: &[i32], ids: &[i64]) -> Self {
        let available = xs.len().min(ys.len()).min(ids.len());
        let requested = usize::try_from(count).unwrap_or(0);
        if requested > available {
            tracing::warn!(
                "Touch count {} exceeds supplied arrays ({}), clamping",
                requested,
                available
            );
        }

        let samples = (0..requested.min(available))
            .map(|i| TouchSample::new(ids[i], xs[i], ys[i]))
            .collect();

        Self {
            samples,
            tap_count: 1,
        }
    }

    /// Set the tap count carried by every touch in the batch
    pub fn with_tap_count(mut self, tap_count: usize) -> Self {
        self.tap_count = tap_count;
        self
    }

    /// Samples in platform order
    pub fn samples(&self) -> &[TouchSample] {
        &self.samples
    }

    /// Tap count
    pub fn tap_count(&self) -> usize {
        self.tap_count
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the batch has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl FromIterator<TouchSample> for TouchBatch {
    fn from_iter<I: IntoIterator<Item = TouchSample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
            tap_count: 1,
        }
    }
}
