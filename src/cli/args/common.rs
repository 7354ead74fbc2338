//! Common CLI types shared across commands

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - rounded tables and progress spinners
    #[default]
    Pretty,
    /// Table format - borderless rows for piping
    Table,
    /// JSON format - structured for scripts
    Json,
}
