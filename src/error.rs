use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Fatal errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The base dataset could not be read; the dashboard cannot start.
    #[error("penguin dataset unavailable ({origin}): {reason}")]
    DataUnavailable { origin: String, reason: String },

    #[error("invalid configuration {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

// ---------------------------------------------------------------------------
// Non-fatal presentation warnings
// ---------------------------------------------------------------------------

/// Which presentation artifact a warning belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Table,
    Grid,
    SpeciesHistogram,
    Scatter,
    AttributeHistogram,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Table => "table",
            ArtifactKind::Grid => "grid",
            ArtifactKind::SpeciesHistogram => "species histogram",
            ArtifactKind::Scatter => "scatterplot",
            ArtifactKind::AttributeHistogram => "attribute histogram",
        };
        f.write_str(name)
    }
}

/// Raised alongside an empty artifact when the filtered view has no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{artifact} has no records to display")]
pub struct EmptyViewWarning {
    pub artifact: ArtifactKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let err = DashboardError::DataUnavailable {
            origin: "penguins.csv".into(),
            reason: "CSV missing 'species' column".into(),
        };
        assert_eq!(
            err.to_string(),
            "penguin dataset unavailable (penguins.csv): CSV missing 'species' column"
        );

        let warn = EmptyViewWarning { artifact: ArtifactKind::Scatter };
        assert_eq!(warn.to_string(), "scatterplot has no records to display");
    }
}
