//! Reading-order reconstruction from 2-D layout.
//!
//! Regions spanning most of the page width (titles, wide figures, abstracts
//! set across both columns) act as horizontal cut lines. The strips between
//! them are column bands: within a band the single widest gap between
//! horizontal centers decides whether the band reads as one flow or as a
//! left column followed by a right column.

use std::cmp::Ordering;

use crate::config::OrderConfig;

use super::merge::LayoutItem;

/// Reading-order sequencer for one page.
pub struct ReadingOrder<'a> {
    config: &'a OrderConfig,
}

impl<'a> ReadingOrder<'a> {
    /// Create a sequencer with the given thresholds.
    pub fn new(config: &'a OrderConfig) -> Self {
        Self { config }
    }

    /// Return `items` in reading order.
    ///
    /// Every input item appears exactly once in the output. Column regions
    /// are assigned to the band holding their vertical center, so a region
    /// that straddles a padded cut line is never lost.
    pub fn sequence<T: LayoutItem>(&self, items: Vec<T>, page_width: f32, page_height: f32) -> Vec<T> {
        if items.is_empty() {
            return items;
        }

        let full_width = self.config.full_width_fraction * page_width;
        let (mut full, columns): (Vec<T>, Vec<T>) =
            items.into_iter().partition(|it| it.bbox().width() >= full_width);
        full.sort_by(top_left);

        let pad = self.config.band_pad_fraction * page_height;
        let mut bands: Vec<Vec<T>> = (0..=full.len()).map(|_| Vec::new()).collect();
        for item in columns {
            let center = item.bbox().center_y();
            let band = full
                .iter()
                .take_while(|f| f.bbox().y0 - pad <= center)
                .count();
            bands[band].push(item);
        }

        log::debug!(
            "Reading order: {} full-width regions, {} column bands",
            full.len(),
            bands.iter().filter(|b| !b.is_empty()).count()
        );

        let mut out = Vec::new();
        let mut full = full.into_iter();
        for band in bands {
            self.emit_band(band, page_width, &mut out);
            if let Some(region) = full.next() {
                out.push(region);
            }
        }
        out
    }

    fn emit_band<T: LayoutItem>(&self, mut band: Vec<T>, page_width: f32, out: &mut Vec<T>) {
        if band.is_empty() {
            return;
        }

        band.sort_by(|a, b| {
            a.bbox()
                .center_x()
                .total_cmp(&b.bbox().center_x())
                .then_with(|| top_left(a, b))
        });

        let (gap, split_at) = widest_gap(&band);
        if gap >= self.config.min_column_gap_fraction * page_width {
            let mut right = band.split_off(split_at + 1);
            band.sort_by(top_left);
            right.sort_by(top_left);
            out.extend(band);
            out.extend(right);
        } else {
            band.sort_by(top_left);
            out.extend(band);
        }
    }
}

/// Widest gap between consecutive horizontal centers, and the index of the
/// item just left of it. The first of several equal gaps wins.
fn widest_gap<T: LayoutItem>(sorted: &[T]) -> (f32, usize) {
    let mut best = (0.0_f32, 0);
    for (i, pair) in sorted.windows(2).enumerate() {
        let gap = pair[1].bbox().center_x() - pair[0].bbox().center_x();
        if gap > best.0 {
            best = (gap, i);
        }
    }
    best
}

fn top_left<T: LayoutItem>(a: &T, b: &T) -> Ordering {
    a.bbox()
        .y0
        .total_cmp(&b.bbox().y0)
        .then(a.bbox().x0.total_cmp(&b.bbox().x0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Region, RegionClass};

    const PAGE_W: f32 = 1000.0;
    const PAGE_H: f32 = 1400.0;

    fn region(name: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> Region {
        Region::new(
            RegionClass::Text,
            BBox::new(x0, y0, x1, y1).unwrap(),
            0.9,
            1,
            name,
        )
        .unwrap()
    }

    fn order(items: Vec<Region>) -> Vec<String> {
        let config = OrderConfig::default();
        ReadingOrder::new(&config)
            .sequence(items, PAGE_W, PAGE_H)
            .into_iter()
            .map(|r| r.content)
            .collect()
    }

    #[test]
    fn test_title_then_left_then_right() {
        let items = vec![
            region("right", 520.0, 200.0, 950.0, 600.0),
            region("left", 50.0, 200.0, 480.0, 600.0),
            region("title", 50.0, 50.0, 950.0, 120.0),
        ];
        assert_eq!(order(items), vec!["title", "left", "right"]);
    }

    #[test]
    fn test_single_column_sorted_by_top_then_left() {
        let items = vec![
            region("c", 100.0, 500.0, 600.0, 550.0),
            region("a", 100.0, 100.0, 600.0, 150.0),
            region("b2", 140.0, 300.0, 600.0, 350.0),
            region("b1", 100.0, 300.0, 600.0, 350.0),
        ];
        assert_eq!(order(items), vec!["a", "b1", "b2", "c"]);
    }

    #[test]
    fn test_two_columns_read_left_column_fully_first() {
        let items = vec![
            region("r1", 520.0, 100.0, 950.0, 300.0),
            region("l2", 50.0, 350.0, 480.0, 600.0),
            region("r2", 520.0, 350.0, 950.0, 600.0),
            region("l1", 50.0, 100.0, 480.0, 300.0),
        ];
        assert_eq!(order(items), vec!["l1", "l2", "r1", "r2"]);
    }

    #[test]
    fn test_full_width_regions_cut_bands() {
        let items = vec![
            region("figure", 40.0, 700.0, 960.0, 900.0),
            region("bottom-right", 520.0, 950.0, 950.0, 1300.0),
            region("top-right", 520.0, 100.0, 950.0, 650.0),
            region("bottom-left", 50.0, 950.0, 480.0, 1300.0),
            region("top-left", 50.0, 100.0, 480.0, 650.0),
        ];
        assert_eq!(
            order(items),
            vec!["top-left", "top-right", "figure", "bottom-left", "bottom-right"]
        );
    }

    #[test]
    fn test_small_gap_keeps_single_flow() {
        // Centers 100 apart on a 1000-wide page: below the 12% threshold.
        let items = vec![
            region("b", 150.0, 100.0, 350.0, 150.0),
            region("a", 50.0, 200.0, 250.0, 250.0),
        ];
        assert_eq!(order(items), vec!["b", "a"]);
    }

    #[test]
    fn test_straddling_region_is_kept() {
        let items = vec![
            region("title", 50.0, 100.0, 950.0, 200.0),
            region("overlaps-title", 50.0, 180.0, 480.0, 400.0),
        ];
        let out = order(items);
        assert_eq!(out, vec!["title", "overlaps-title"]);
    }

    #[test]
    fn test_empty_page() {
        assert!(order(Vec::new()).is_empty());
    }

    #[test]
    fn test_deterministic_on_ties() {
        let items = vec![
            region("x", 100.0, 100.0, 300.0, 150.0),
            region("y", 100.0, 100.0, 300.0, 150.0),
        ];
        assert_eq!(order(items.clone()), order(items));
    }
}
