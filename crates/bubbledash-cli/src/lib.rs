//! Shared CLI definitions for bubbledash.
//!
//! Used by the main application and by the build script (manpage) and
//! gen_docs binary (command-line-options markdown).

use clap::{CommandFactory, Parser, ValueEnum};

/// Table column to sort by on startup
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortColumn {
    /// Record name (lexicographic)
    Name,
    /// Revenue (numeric)
    Revenue,
    /// Population (numeric)
    Population,
}

impl SortColumn {
    /// Position of this column in the dashboard table.
    pub fn index(&self) -> usize {
        match self {
            Self::Name => 0,
            Self::Revenue => 1,
            Self::Population => 2,
        }
    }
}

/// Command-line arguments for bubbledash
#[derive(Clone, Parser, Debug, Default)]
#[command(
    name = "bubbledash",
    version,
    about = "Revenue vs population bubble dashboard in the terminal"
)]
pub struct Args {
    /// Initial text for the minimum revenue input. Non-numeric text counts as 0.
    #[arg(long = "min-revenue", value_name = "TEXT", allow_hyphen_values = true)]
    pub min_revenue: Option<String>,

    /// Initial text for the maximum revenue input. Non-numeric text counts as 0.
    #[arg(long = "max-revenue", value_name = "TEXT", allow_hyphen_values = true)]
    pub max_revenue: Option<String>,

    /// Sort the table by this column on startup
    #[arg(long = "sort", value_enum)]
    pub sort: Option<SortColumn>,

    /// Sort descending instead of ascending (requires --sort)
    #[arg(long = "descending", requires = "sort", action)]
    pub descending: bool,

    /// Print the filter, chart data and sorted table as JSON and exit
    #[arg(long = "json", action)]
    pub json: bool,

    /// Enable debug mode to show operational information
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Clear all cache data (including logs) and exit
    #[arg(long = "clear-cache", action)]
    pub clear_cache: bool,

    /// Generate default configuration file at ~/.config/bubbledash/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}

/// Escape `|` and newlines for use in markdown table cells.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Render command-line options as markdown.
///
/// Used by the gen_docs binary; output is written to stdout.
pub fn render_options_markdown() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from("# Command Line Options\n\n");

    out.push_str("## Usage\n\n```\n");
    let usage = cmd.render_usage();
    out.push_str(&usage.to_string());
    out.push_str("\n```\n\n");

    out.push_str("## Options\n\n");
    out.push_str("| Option | Description |\n");
    out.push_str("|--------|-------------|\n");

    for arg in cmd.get_arguments() {
        let id = arg.get_id().as_ref().to_string();
        if id == "help" || id == "version" {
            continue;
        }

        let mut parts = Vec::new();
        if let Some(s) = arg.get_short() {
            parts.push(format!("-{s}"));
        }
        if let Some(l) = arg.get_long() {
            parts.push(format!("--{l}"));
        }
        let op = parts.join(", ");
        let placeholder: String = if arg.get_action().takes_values() {
            arg.get_value_names()
                .map(|names| {
                    names
                        .iter()
                        .map(|n: &clap::builder::Str| format!("<{}>", n.as_ref() as &str))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_else(|| format!("<{}>", id.to_uppercase()))
        } else {
            String::new()
        };
        let option_str = if placeholder.is_empty() {
            op
        } else {
            format!("{op} {placeholder}")
        };

        let help = arg
            .get_help()
            .map(|h| escape_table_cell(&h.to_string()))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!("| `{option_str}` | {help} |\n"));
    }

    out
}
