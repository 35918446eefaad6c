/// Paper is counted in whole pages (students) or sheets (printers).
/// Signed so that SQLite INTEGER columns map onto it directly.
pub type Pages = i64;

/// Pages a print job consumes.
/// Duplex halves the page count per copy, rounding up; copies multiply the rounded figure.
/// Example: 5 pages, duplex, 3 copies -> ceil(2.5) * 3 = 9
/// Returns `None` when the total does not fit in `Pages`.
pub fn total_pages(document_pages: Pages, copies: Pages, duplex: bool) -> Option<Pages> {
    let per_copy = if duplex {
        document_pages.checked_add(1)? / 2
    } else {
        document_pages
    };
    per_copy.checked_mul(copies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_simplex() {
        assert_eq!(total_pages(5, 1, false), Some(5));
        assert_eq!(total_pages(5, 3, false), Some(15));
        assert_eq!(total_pages(1, 1, false), Some(1));
    }

    #[test]
    fn test_total_pages_duplex_rounds_up_per_copy() {
        assert_eq!(total_pages(5, 3, true), Some(9));
        assert_eq!(total_pages(4, 3, true), Some(6));
        assert_eq!(total_pages(1, 2, true), Some(2));
    }

    #[test]
    fn test_total_pages_matches_ceiling_formula() {
        for pages in 1..40 {
            for copies in 1..6 {
                for duplex in [false, true] {
                    let factor = if duplex { 0.5 } else { 1.0 };
                    let expected = (pages as f64 * factor).ceil() as i64 * copies;
                    assert_eq!(total_pages(pages, copies, duplex), Some(expected));
                }
            }
        }
    }

    #[test]
    fn test_total_pages_overflow_is_none() {
        assert_eq!(total_pages(1 << 62, 4, false), None);
        assert_eq!(total_pages(Pages::MAX, 1, true), None);
        assert_eq!(total_pages(Pages::MAX, 2, false), None);
        assert_eq!(total_pages(Pages::MAX, 1, false), Some(Pages::MAX));
    }
}
