//! Command-line front end. Each command mounts the dashboard, performs one
//! operation, and prints the outcome.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::FormField;

/// dashboard - manage your NERV interview profile and resume
#[derive(Debug, Parser)]
#[command(name = "dashboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the profile panel
    Show,

    /// Edit profile fields; unspecified fields keep their stored value
    Edit(EditArgs),

    /// Save a link to a hosted resume
    ResumeLink {
        /// Absolute URL, including http:// or https://
        url: String,
    },

    /// Upload a PDF resume (5 MB max)
    Upload {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Start an interview session
    Interview,

    /// Sign out and remove the local session
    Logout,
}

#[derive(Debug, Args, Default)]
pub struct EditArgs {
    #[arg(long)]
    pub display_name: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub experience: Option<String>,
    #[arg(long)]
    pub education: Option<String>,
    #[arg(long)]
    pub expected_salary: Option<String>,
    #[arg(long)]
    pub linkedin: Option<String>,
    #[arg(long)]
    pub portfolio: Option<String>,
    /// Comma-separated, e.g. "Rust, Go, SQL"
    #[arg(long)]
    pub skills: Option<String>,
}

impl EditArgs {
    /// The form edits requested on the command line.
    pub fn edits(&self) -> Vec<(FormField, &str)> {
        [
            (FormField::DisplayName, &self.display_name),
            (FormField::Location, &self.location),
            (FormField::Experience, &self.experience),
            (FormField::Education, &self.education),
            (FormField::ExpectedSalary, &self.expected_salary),
            (FormField::Linkedin, &self.linkedin),
            (FormField::Portfolio, &self.portfolio),
            (FormField::Skills, &self.skills),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}
