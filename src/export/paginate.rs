//! A4 pagination math for the raster snapshot. Pure functions so the
//! slicing contract is testable without touching a PDF writer.

/// A4 portrait, millimetres.
pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;

/// Placement plan for one snapshot: the image height once fitted to the
/// page width, and the per-page top offset (0, -297, -594, ...). Each
/// offset shifts the full image up so the page exposes the next band.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub image_height_mm: f64,
    pub top_offsets_mm: Vec<f64>,
}

/// Height in mm of a raster scaled to the full 210 mm page width.
pub fn fit_height_mm(width_px: u32, height_px: u32) -> f64 {
    if width_px == 0 {
        return 0.0;
    }
    height_px as f64 * PAGE_WIDTH_MM / width_px as f64
}

/// Pages needed for an image of the given height: ceil(H / 297), at
/// least one. An exact multiple does not get a trailing blank page.
pub fn page_count(image_height_mm: f64) -> usize {
    if image_height_mm <= PAGE_HEIGHT_MM {
        return 1;
    }
    (image_height_mm / PAGE_HEIGHT_MM).ceil() as usize
}

pub fn plan_pages(width_px: u32, height_px: u32) -> PagePlan {
    let image_height_mm = fit_height_mm(width_px, height_px);
    let pages = page_count(image_height_mm);
    let top_offsets_mm = (0..pages)
        .map(|page| -(page as f64) * PAGE_HEIGHT_MM)
        .collect();
    PagePlan {
        image_height_mm,
        top_offsets_mm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_height_scales_to_page_width() {
        // 210 px wide maps 1:1 onto mm
        assert_eq!(fit_height_mm(210, 650), 650.0);
        assert_eq!(fit_height_mm(1000, 500), 105.0);
        assert_eq!(fit_height_mm(0, 500), 0.0);
    }

    #[test]
    fn spec_example_needs_three_pages() {
        // 650 mm of rendered height at 210 mm width
        let plan = plan_pages(210, 650);
        assert_eq!(plan.top_offsets_mm.len(), 3);
        assert_eq!(plan.top_offsets_mm, vec![0.0, -297.0, -594.0]);
        assert_eq!(plan.image_height_mm, 650.0);
    }

    #[test]
    fn short_image_is_a_single_page() {
        assert_eq!(page_count(100.0), 1);
        assert_eq!(plan_pages(800, 400).top_offsets_mm, vec![0.0]);
    }

    #[test]
    fn exact_multiple_has_no_blank_trailing_page() {
        assert_eq!(page_count(297.0), 1);
        assert_eq!(page_count(594.0), 2);
    }

    #[test]
    fn just_over_a_page_spills_onto_the_next() {
        assert_eq!(page_count(297.1), 2);
        assert_eq!(page_count(298.0), 2);
    }

    #[test]
    fn degenerate_heights_still_produce_one_page() {
        assert_eq!(page_count(0.0), 1);
        let plan = plan_pages(100, 0);
        assert_eq!(plan.top_offsets_mm, vec![0.0]);
    }
}
