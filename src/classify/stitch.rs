//! Stitching of paragraphs the detector split into several boxes.

use crate::config::StitchConfig;
use crate::model::{BBox, Block, RegionClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LetterCase {
    Upper,
    Lower,
}

/// Case of the first alphabetic character, if any.
fn first_alpha_case(s: &str) -> Option<LetterCase> {
    s.trim().chars().find(|c| c.is_alphabetic()).map(|c| {
        if c.is_uppercase() {
            LetterCase::Upper
        } else {
            LetterCase::Lower
        }
    })
}

/// `below` starts just under `above`, shares its left edge and has about
/// the same width.
fn super_close(above: &BBox, below: &BBox, config: &StitchConfig) -> bool {
    let height = above.height().max(1.0);
    let width = above.width().max(1.0);
    let below_width = below.width().max(1.0);

    let vgap = below.y0 - above.y1;
    if !(0.0..=config.max_vgap_fraction * height).contains(&vgap) {
        return false;
    }
    if (below.x0 - above.x0).abs() > config.left_tolerance_fraction * width {
        return false;
    }
    let ratio = below_width / width;
    (1.0 - config.width_tolerance_fraction..=1.0 + config.width_tolerance_fraction)
        .contains(&ratio)
}

/// Merge an uppercase-led text block with the run of lowercase-led text
/// blocks directly beneath it. The merged box is the union of the run.
pub(crate) fn stitch_paragraphs(blocks: Vec<Block>, config: &StitchConfig) -> Vec<Block> {
    let mut out: Vec<Block> = Vec::with_capacity(blocks.len());
    let mut iter = blocks.into_iter().peekable();
    let mut stitched = 0;

    while let Some(mut run) = iter.next() {
        if run.class != RegionClass::Text || first_alpha_case(&run.content) != Some(LetterCase::Upper)
        {
            out.push(run);
            continue;
        }

        while let Some(next) = iter.next_if(|next| {
            next.class == RegionClass::Text
                && first_alpha_case(&next.content) == Some(LetterCase::Lower)
                && super_close(&run.bbox, &next.bbox, config)
        }) {
            let merged = format!("{} {}", run.content.trim_end(), next.content.trim());
            run.content = merged.trim().to_string();
            run.bbox = run.bbox.union(&next.bbox);
            stitched += 1;
        }
        out.push(run);
    }

    if stitched > 0 {
        log::debug!("Stitched {} continuation blocks", stitched);
    }
    out
}
