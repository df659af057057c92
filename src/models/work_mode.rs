use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkMode {
    Remote, // R
    Hybrid, // H
    OnSite, // O
}

impl WorkMode {
    pub const ALL: [WorkMode; 3] = [WorkMode::Remote, WorkMode::Hybrid, WorkMode::OnSite];

    pub fn code(&self) -> &str {
        match self {
            WorkMode::Remote => "R",
            WorkMode::Hybrid => "H",
            WorkMode::OnSite => "O",
        }
    }

    /// Text stored in the sheet's Mode column.
    pub fn label(&self) -> &'static str {
        match self {
            WorkMode::Remote => "Remote",
            WorkMode::Hybrid => "Hybrid",
            WorkMode::OnSite => "On-site",
        }
    }

    /// Accepts a one-letter code or the label, in any case.
    /// "onsite" and "on site" are accepted as well.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized: String = code
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | ' ' | '_'))
            .collect();

        match normalized.as_str() {
            "r" | "remote" => Some(WorkMode::Remote),
            "h" | "hybrid" => Some(WorkMode::Hybrid),
            "o" | "onsite" => Some(WorkMode::OnSite),
            _ => None,
        }
    }
}
