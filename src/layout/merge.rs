//! Merging of duplicate and overlapping same-class detections.
//!
//! Layout detectors routinely emit several boxes for one paragraph: exact
//! duplicates, heavily overlapping boxes, or a small box nested in a larger
//! one. Within each class, boxes are visited in descending confidence order
//! and each unmerged box greedily absorbs every other box that satisfies the
//! merge predicate against its (growing) union, until nothing more matches.

use std::collections::{BTreeMap, VecDeque};

use crate::config::MergeConfig;
use crate::model::{BBox, Detection, Region, RegionClass};

use super::geometry::{containment, iou, near_duplicate};

/// Something with a class, a box and a confidence that can absorb a peer.
pub trait LayoutItem {
    /// Layout class.
    fn class(&self) -> RegionClass;

    /// Bounding box.
    fn bbox(&self) -> &BBox;

    /// Detector confidence.
    fn confidence(&self) -> f32;

    /// Fold `other` into `self`: union box, max confidence.
    fn absorb(&mut self, other: Self)
    where
        Self: Sized;
}

impl LayoutItem for Detection {
    fn class(&self) -> RegionClass {
        self.class
    }

    fn bbox(&self) -> &BBox {
        &self.bbox
    }

    fn confidence(&self) -> f32 {
        self.confidence
    }

    fn absorb(&mut self, other: Self) {
        self.bbox = self.bbox.union(&other.bbox);
        self.confidence = self.confidence.max(other.confidence);
    }
}

impl LayoutItem for Region {
    fn class(&self) -> RegionClass {
        self.class
    }

    fn bbox(&self) -> &BBox {
        &self.bbox
    }

    fn confidence(&self) -> f32 {
        self.confidence
    }

    /// The surviving region keeps its own content; it only inherits the
    /// absorbed region's content when its own is empty.
    fn absorb(&mut self, other: Self) {
        self.bbox = self.bbox.union(&other.bbox);
        self.confidence = self.confidence.max(other.confidence);
        if self.content.trim().is_empty() {
            self.content = other.content;
        }
    }
}

/// Output of a merge run.
#[derive(Debug, Clone)]
pub struct MergeResult<T> {
    /// Canonical regions, grouped by class
    pub items: Vec<T>,
    /// Items dropped below the confidence floor
    pub low_confidence: usize,
    /// Items absorbed into another item
    pub absorbed: usize,
}

/// Same-class region merger.
pub struct RegionMerger<'a> {
    config: &'a MergeConfig,
}

impl<'a> RegionMerger<'a> {
    /// Create a merger with the given thresholds.
    pub fn new(config: &'a MergeConfig) -> Self {
        Self { config }
    }

    /// Check whether two boxes should be merged.
    pub fn should_merge(&self, a: &BBox, b: &BBox) -> bool {
        near_duplicate(a, b, self.config.near_duplicate_eps)
            || iou(a, b) >= self.config.iou_threshold
            || containment(a, b) >= self.config.containment_threshold
    }

    /// Merge one page's detections.
    ///
    /// The result contains no two same-class items satisfying
    /// [`should_merge`](Self::should_merge), so merging it again is a no-op.
    pub fn merge<T: LayoutItem>(&self, items: Vec<T>) -> MergeResult<T> {
        let total = items.len();
        let mut by_class: BTreeMap<RegionClass, Vec<T>> = BTreeMap::new();
        for item in items {
            if item.confidence() < self.config.min_confidence {
                continue;
            }
            by_class.entry(item.class()).or_default().push(item);
        }
        let kept: usize = by_class.values().map(Vec::len).sum();
        let low_confidence = total - kept;
        if low_confidence > 0 {
            log::warn!(
                "Dropped {} detections below confidence {:.2}",
                low_confidence,
                self.config.min_confidence
            );
        }

        let mut absorbed = 0;
        let mut out = Vec::with_capacity(kept);
        for (class, group) in by_class {
            let before = group.len();
            let merged = self.merge_class(group);
            if merged.len() < before {
                log::debug!("Merged {} {} regions into {}", before, class, merged.len());
            }
            absorbed += before - merged.len();
            out.extend(merged);
        }

        MergeResult {
            items: out,
            low_confidence,
            absorbed,
        }
    }

    /// Repeat greedy passes until a pass absorbs nothing.
    ///
    /// A later anchor can grow into an earlier one within a single pass, so
    /// one pass is not always a fixed point. Every productive pass removes at
    /// least one item, which bounds the loop by the class size.
    fn merge_class<T: LayoutItem>(&self, mut items: Vec<T>) -> Vec<T> {
        loop {
            let before = items.len();
            items = self.merge_pass(items);
            if items.len() == before || items.len() <= 1 {
                return items;
            }
        }
    }

    fn merge_pass<T: LayoutItem>(&self, mut items: Vec<T>) -> Vec<T> {
        items.sort_by(|a, b| {
            b.confidence()
                .total_cmp(&a.confidence())
                .then(a.bbox().x0.total_cmp(&b.bbox().x0))
                .then(a.bbox().y0.total_cmp(&b.bbox().y0))
        });

        let mut pending: VecDeque<T> = items.into();
        let mut out = Vec::with_capacity(pending.len());
        while let Some(mut anchor) = pending.pop_front() {
            // Each absorption shrinks the worklist, so this terminates.
            while let Some(other) = pending
                .iter()
                .position(|r| self.should_merge(anchor.bbox(), r.bbox()))
                .and_then(|pos| pending.remove(pos))
            {
                anchor.absorb(other);
            }
            out.push(anchor);
        }
        out
    }
}
