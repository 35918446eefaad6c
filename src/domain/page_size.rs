use serde::{Deserialize, Serialize};

/// Paper size class. Each printer keeps a separate stock counter per size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PageSize {
    A1,
    A2,
    A3,
    #[default]
    A4,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [PageSize::A1, PageSize::A2, PageSize::A3, PageSize::A4];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageSize::A1 => "A1",
            PageSize::A2 => "A2",
            PageSize::A3 => "A3",
            PageSize::A4 => "A4",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A1" => Some(PageSize::A1),
            "A2" => Some(PageSize::A2),
            "A3" => Some(PageSize::A3),
            "A4" => Some(PageSize::A4),
            _ => None,
        }
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
