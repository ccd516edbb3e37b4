//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the handoff CLI.

use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Output style configuration
#[derive(Debug, Clone, Copy)]
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print a session banner: rule, title, rule
    pub fn banner(&self, title: &str) {
        let rule = "=".repeat(50);
        if self.colored {
            println!("{}", rule.dimmed());
            println!(
                "{} {}",
                title.bright_white().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
            println!("{}", rule.dimmed());
        } else {
            println!("{}", rule);
            println!("{} v{}", title, env!("CARGO_PKG_VERSION"));
            println!("{}", rule);
        }
    }

    /// Print a horizontal rule
    pub fn rule(&self, ch: char) {
        let rule = ch.to_string().repeat(50);
        if self.colored {
            println!("{}", rule.dimmed());
        } else {
            println!("{}", rule);
        }
    }

    /// Print the roster of agents, numbered
    pub fn agent_roster(&self, agents: &[(&str, &str)]) {
        println!("This system has {} agents:", agents.len());
        for (i, (name, role)) in agents.iter().enumerate() {
            if self.colored {
                println!("{}. {} - {}", i + 1, name.cyan().bold(), role);
            } else {
                println!("{}. {} - {}", i + 1, name, role);
            }
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("{}", message.blue());
        } else {
            println!("{}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("{}", message.red());
        } else {
            eprintln!("{}", message);
        }
    }

    /// Print the final answer of a run
    pub fn agent_response(&self, response: &str) {
        if self.colored {
            println!("\n{}", "Agent Response:".bright_green().bold());
        } else {
            println!("\nAgent Response:");
        }
        println!("{}", response);
    }

    /// Print a prompt without a newline and flush stdout
    pub fn prompt(&self, message: &str) {
        if self.colored {
            print!("\n{} ", message.bright_yellow().bold());
        } else {
            print!("\n{} ", message);
        }
        io::stdout().flush().ok();
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("{}", message.dimmed().italic());
        } else {
            println!("{}", message);
        }
    }

    /// Print a table header row
    pub fn table_header(&self, columns: &[&str]) {
        let header: String = columns
            .iter()
            .map(|c| format!("{:<26}", c))
            .collect::<Vec<_>>()
            .join(" ");
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(columns.len() * 27).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(columns.len() * 27));
        }
    }

    /// Print a table row
    pub fn table_row(&self, values: &[&str]) {
        let row: String = values
            .iter()
            .map(|v| format!("{:<26}", v))
            .collect::<Vec<_>>()
            .join(" ");
        println!("    {}", row);
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}
