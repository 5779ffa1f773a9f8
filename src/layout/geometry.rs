//! Overlap measures on axis-aligned boxes.

use crate::model::BBox;

const EPS: f32 = 1e-9;

/// Area of the intersection of two boxes (0 if disjoint).
pub fn intersection_area(a: &BBox, b: &BBox) -> f32 {
    let w = (a.x1.min(b.x1) - a.x0.max(b.x0)).max(0.0);
    let h = (a.y1.min(b.y1) - a.y0.max(b.y0)).max(0.0);
    w * h
}

/// Intersection over union.
pub fn iou(a: &BBox, b: &BBox) -> f32 {
    let inter = intersection_area(a, b);
    if inter <= 0.0 {
        return 0.0;
    }
    inter / (a.area() + b.area() - inter + EPS)
}

/// Fraction of the smaller box covered by the intersection.
pub fn containment(a: &BBox, b: &BBox) -> f32 {
    let smaller = a.area().min(b.area());
    if smaller <= 0.0 {
        return 0.0;
    }
    intersection_area(a, b) / (smaller + EPS)
}

/// All four edges within `eps` of each other.
pub fn near_duplicate(a: &BBox, b: &BBox, eps: f32) -> bool {
    (a.x0 - b.x0).abs() <= eps
        && (a.y0 - b.y0).abs() <= eps
        && (a.x1 - b.x1).abs() <= eps
        && (a.y1 - b.y1).abs() <= eps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x0: f32, y0: f32, x1: f32, y1: f32) -> BBox {
        BBox::new(x0, y0, x1, y1).unwrap()
    }

    #[test]
    fn test_iou_identical_and_disjoint() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-5);
        assert_eq!(iou(&a, &bbox(20.0, 20.0, 30.0, 30.0)), 0.0);
        // Touching edges do not overlap
        assert_eq!(iou(&a, &bbox(10.0, 0.0, 20.0, 10.0)), 0.0);
    }

    #[test]
    fn test_iou_half_overlap() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let b = bbox(5.0, 0.0, 15.0, 10.0);
        // 50 / (100 + 100 - 50)
        assert!((iou(&a, &b) - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_containment_of_nested_box() {
        let outer = bbox(0.0, 0.0, 100.0, 100.0);
        let inner = bbox(10.0, 10.0, 20.0, 20.0);
        assert!((containment(&outer, &inner) - 1.0).abs() < 1e-5);
        assert!((containment(&inner, &outer) - 1.0).abs() < 1e-5);
        assert!(iou(&outer, &inner) < 0.02);
    }

    #[test]
    fn test_near_duplicate() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        assert!(near_duplicate(&a, &bbox(1.5, -2.0, 11.0, 8.0), 2.0));
        assert!(!near_duplicate(&a, &bbox(2.5, 0.0, 10.0, 10.0), 2.0));
    }
}
