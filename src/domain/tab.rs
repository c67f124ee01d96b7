//! Dashboard tabs - the fixed key set of the fetch cache

/// One independently cached dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DashboardTab {
    Candidates,
    Assessments,
    Clients,
}

/// Table column: header text and relative width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub weight: u16,
}

const fn col(title: &'static str, weight: u16) -> Column {
    Column { title, weight }
}

const CANDIDATE_COLUMNS: [Column; 5] = [
    col("Name", 4),
    col("Email", 4),
    col("Score", 2),
    col("Status", 2),
    col("Applied On", 3),
];

const ASSESSMENT_COLUMNS: [Column; 6] = [
    col("Title", 5),
    col("Client", 3),
    col("Avg. Score", 2),
    col("Submissions", 2),
    col("Status", 2),
    col("Created At", 3),
];

const CLIENT_COLUMNS: [Column; 5] = [
    col("Client", 3),
    col("Account Manager", 3),
    col("Active Assessments", 2),
    col("Total Candidates", 2),
    col("Last Active", 3),
];

impl DashboardTab {
    pub const ALL: [DashboardTab; 3] = [
        DashboardTab::Candidates,
        DashboardTab::Assessments,
        DashboardTab::Clients,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            DashboardTab::Candidates => "Candidates",
            DashboardTab::Assessments => "Assessments",
            DashboardTab::Clients => "Clients",
        }
    }

    /// Lowercase noun used in status messages ("Loading candidates…")
    pub fn noun(&self) -> &'static str {
        match self {
            DashboardTab::Candidates => "candidates",
            DashboardTab::Assessments => "assessments",
            DashboardTab::Clients => "clients",
        }
    }

    /// Dataset file stem for file-backed producers
    pub fn dataset_name(&self) -> &'static str {
        self.noun()
    }

    pub fn shortcut(&self) -> char {
        match self {
            DashboardTab::Candidates => '1',
            DashboardTab::Assessments => '2',
            DashboardTab::Clients => '3',
        }
    }

    pub fn from_shortcut(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.shortcut() == c)
    }

    pub fn columns(&self) -> &'static [Column] {
        match self {
            DashboardTab::Candidates => &CANDIDATE_COLUMNS,
            DashboardTab::Assessments => &ASSESSMENT_COLUMNS,
            DashboardTab::Clients => &CLIENT_COLUMNS,
        }
    }

    pub fn next(&self) -> Self {
        let index = self.index();
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let index = self.index();
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|tab| tab == self).unwrap_or(0)
    }
}
