use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PageSize, Pages};

pub type PrinterId = Uuid;

/// Sheets left in a printer, one counter per page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaperStock {
    pub a1: Pages,
    pub a2: Pages,
    pub a3: Pages,
    pub a4: Pages,
}

impl PaperStock {
    pub fn new(a1: Pages, a2: Pages, a3: Pages, a4: Pages) -> Self {
        Self { a1, a2, a3, a4 }
    }

    /// The counter backing a page size. All per-size reads and writes go through here.
    pub fn counter_mut(&mut self, size: PageSize) -> &mut Pages {
        match size {
            PageSize::A1 => &mut self.a1,
            PageSize::A2 => &mut self.a2,
            PageSize::A3 => &mut self.a3,
            PageSize::A4 => &mut self.a4,
        }
    }

    pub fn available(&self, size: PageSize) -> Pages {
        let mut copy = *self;
        *copy.counter_mut(size)
    }

    pub fn debit(&mut self, size: PageSize, sheets: Pages) {
        *self.counter_mut(size) -= sheets;
    }

    /// Returns the new count, or `None` on overflow with the counter unchanged.
    pub fn credit(&mut self, size: PageSize, sheets: Pages) -> Option<Pages> {
        let counter = self.counter_mut(size);
        *counter = counter.checked_add(sheets)?;
        Some(*counter)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Printer {
    pub id: PrinterId,
    pub name: String,
    pub location: Option<String>,
    pub stock: PaperStock,
}

impl Printer {
    pub fn new(name: String, stock: PaperStock) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            location: None,
            stock,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn has_paper(&self, size: PageSize, sheets: Pages) -> bool {
        self.stock.available(size) >= sheets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_touches_only_matching_counter() {
        for size in PageSize::ALL {
            let mut stock = PaperStock::new(100, 200, 300, 400);
            let before = stock;
            stock.debit(size, 7);

            for other in PageSize::ALL {
                let expected = if other == size {
                    before.available(other) - 7
                } else {
                    before.available(other)
                };
                assert_eq!(stock.available(other), expected, "{} after debiting {}", other, size);
            }
        }
    }

    #[test]
    fn test_available_reads_each_counter() {
        let stock = PaperStock::new(1, 2, 3, 4);
        assert_eq!(stock.available(PageSize::A1), 1);
        assert_eq!(stock.available(PageSize::A2), 2);
        assert_eq!(stock.available(PageSize::A3), 3);
        assert_eq!(stock.available(PageSize::A4), 4);
    }

    #[test]
    fn test_has_paper_boundary() {
        let printer = Printer::new("H6-101".into(), PaperStock::new(0, 0, 5, 50));
        assert!(printer.has_paper(PageSize::A4, 50));
        assert!(!printer.has_paper(PageSize::A4, 51));
        assert!(!printer.has_paper(PageSize::A1, 1));
    }

    #[test]
    fn test_credit_adds_to_counter() {
        let mut stock = PaperStock::default();
        assert_eq!(stock.credit(PageSize::A2, 25), Some(25));
        assert_eq!(stock, PaperStock::new(0, 25, 0, 0));
    }

    #[test]
    fn test_credit_overflow_leaves_counter() {
        let mut stock = PaperStock::new(0, 0, Pages::MAX, 3);
        assert_eq!(stock.credit(PageSize::A3, 1), None);
        assert_eq!(stock, PaperStock::new(0, 0, Pages::MAX, 3));
    }
}
