use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PageSize, Pages, PrintJobRequest};

pub type StudentId = Uuid;

/// Print preferences remembered from the student's most recent job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrintSettings {
    pub duplex: bool,
    pub color: bool,
    pub page_size: PageSize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// Human-facing student number, unique across students
    pub code: String,
    /// Remaining page budget
    pub paper_quantity: Pages,
    pub last_settings: PrintSettings,
}

impl Student {
    pub fn new(name: String, code: String, paper_quantity: Pages) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            code,
            paper_quantity,
            last_settings: PrintSettings::default(),
        }
    }

    pub fn can_afford(&self, pages: Pages) -> bool {
        self.paper_quantity >= pages
    }

    /// Charge a validated job against the budget and remember its settings.
    /// Callers check `can_afford` first.
    pub fn charge(&mut self, request: &PrintJobRequest, pages: Pages) {
        self.paper_quantity -= pages;
        self.last_settings = PrintSettings {
            duplex: request.duplex,
            color: request.color,
            page_size: request.page_size,
        };
    }

    /// Returns the new balance, or `None` on overflow with the balance unchanged.
    pub fn add_paper(&mut self, pages: Pages) -> Option<Pages> {
        self.paper_quantity = self.paper_quantity.checked_add(pages)?;
        Some(self.paper_quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page_size: PageSize, duplex: bool, color: bool) -> PrintJobRequest {
        PrintJobRequest {
            student_id: Uuid::new_v4(),
            printer_id: Uuid::new_v4(),
            document_name: None,
            document_pages: 4,
            copies: 1,
            duplex,
            color,
            page_size,
        }
    }

    #[test]
    fn test_new_student_defaults() {
        let student = Student::new("An Nguyen".into(), "2212345".into(), 100);
        assert_eq!(student.paper_quantity, 100);
        assert_eq!(student.last_settings.page_size, PageSize::A4);
        assert!(!student.last_settings.duplex);
        assert!(!student.last_settings.color);
    }

    #[test]
    fn test_charge_debits_and_overwrites_settings() {
        let mut student = Student::new("An Nguyen".into(), "2212345".into(), 100);
        student.charge(&request(PageSize::A3, true, true), 30);

        assert_eq!(student.paper_quantity, 70);
        assert_eq!(
            student.last_settings,
            PrintSettings {
                duplex: true,
                color: true,
                page_size: PageSize::A3,
            }
        );
    }

    #[test]
    fn test_can_afford_boundary() {
        let student = Student::new("Binh".into(), "2200001".into(), 10);
        assert!(student.can_afford(10));
        assert!(!student.can_afford(11));
    }

    #[test]
    fn test_add_paper_overflow_leaves_balance() {
        let mut student = Student::new("Binh".into(), "2200001".into(), Pages::MAX - 1);
        assert_eq!(student.add_paper(1), Some(Pages::MAX));
        assert_eq!(student.add_paper(1), None);
        assert_eq!(student.paper_quantity, Pages::MAX);
    }
}
