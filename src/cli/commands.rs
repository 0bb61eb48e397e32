//! Terminal Commands Module
//!
//! Command definitions, alias table and the registry that resolves a typed
//! line to a canonical command plus its arguments.

use std::collections::BTreeSet;
use std::fmt;

use super::easter_eggs::DISCOVERABLE;

/// Available terminal commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CliCommand {
    Help,
    Clear,
    About,
    Projects,
    Skills,
    Experience,
    Education,
    Contact,
    Social,
    Github,
    Matrix,
    Download,
    Reload,
    Ascii,
    Exit,
    Fortune,
    TypingTest,
    Theme,
    History,
    ClearHistory,
}

impl CliCommand {
    /// Parse a canonical command name (aliases are resolved by the registry)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "help" => Some(Self::Help),
            "clear" => Some(Self::Clear),
            "about" => Some(Self::About),
            "projects" => Some(Self::Projects),
            "skills" => Some(Self::Skills),
            "experience" => Some(Self::Experience),
            "education" => Some(Self::Education),
            "contact" => Some(Self::Contact),
            "social" => Some(Self::Social),
            "github" => Some(Self::Github),
            "matrix" => Some(Self::Matrix),
            "download" => Some(Self::Download),
            "reload" => Some(Self::Reload),
            "ascii" => Some(Self::Ascii),
            "exit" => Some(Self::Exit),
            "fortune" => Some(Self::Fortune),
            "typingtest" => Some(Self::TypingTest),
            "theme" => Some(Self::Theme),
            "history" => Some(Self::History),
            "clear-history" => Some(Self::ClearHistory),
            _ => None,
        }
    }

    /// Canonical name as typed by the user
    pub fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Clear => "clear",
            Self::About => "about",
            Self::Projects => "projects",
            Self::Skills => "skills",
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Contact => "contact",
            Self::Social => "social",
            Self::Github => "github",
            Self::Matrix => "matrix",
            Self::Download => "download",
            Self::Reload => "reload",
            Self::Ascii => "ascii",
            Self::Exit => "exit",
            Self::Fortune => "fortune",
            Self::TypingTest => "typingtest",
            Self::Theme => "theme",
            Self::History => "history",
            Self::ClearHistory => "clear-history",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Help => "Show this help text",
            Self::Clear => "Clear terminal screen",
            Self::About => "Display information about me",
            Self::Projects => "List my projects",
            Self::Skills => "Show my technical skills",
            Self::Experience => "Show my work experience",
            Self::Education => "Show my education details",
            Self::Contact => "Display contact information",
            Self::Social => "Show social media links",
            Self::Github => "Display GitHub stats",
            Self::Matrix => "Toggle matrix effect background",
            Self::Download => "Download portfolio.json (-p) or resume (-r)",
            Self::Reload => "Reload portfolio data with AI",
            Self::Ascii => "Display ASCII art",
            Self::Exit => "Exit terminal",
            Self::Fortune => "Get a random fortune",
            Self::TypingTest => "Test your typing speed",
            Self::Theme => "View or change the terminal theme",
            Self::History => "View command history",
            Self::ClearHistory => "Clear command history",
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            Self::Download => "download [-p|-r]",
            Self::Theme => "theme [name]",
            Self::History => "history [search_term]",
            other => other.name(),
        }
    }

    pub fn category(&self) -> CommandCategory {
        match self {
            Self::About
            | Self::Projects
            | Self::Skills
            | Self::Experience
            | Self::Education
            | Self::Contact
            | Self::Social
            | Self::Github => CommandCategory::Information,
            Self::Matrix | Self::Download | Self::Reload | Self::Ascii => CommandCategory::Actions,
            Self::Fortune | Self::TypingTest => CommandCategory::Fun,
            Self::Help
            | Self::Clear
            | Self::Exit
            | Self::Theme
            | Self::History
            | Self::ClearHistory => CommandCategory::Terminal,
        }
    }

    pub fn all_commands() -> Vec<Self> {
        vec![
            Self::Help,
            Self::Clear,
            Self::About,
            Self::Projects,
            Self::Skills,
            Self::Experience,
            Self::Education,
            Self::Contact,
            Self::Social,
            Self::Github,
            Self::Matrix,
            Self::Download,
            Self::Reload,
            Self::Ascii,
            Self::Exit,
            Self::Fortune,
            Self::TypingTest,
            Self::Theme,
            Self::History,
            Self::ClearHistory,
        ]
    }

    pub fn by_category(category: CommandCategory) -> Vec<Self> {
        Self::all_commands()
            .into_iter()
            .filter(|cmd| cmd.category() == category)
            .collect()
    }
}

impl fmt::Display for CliCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Command categories for the help listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCategory {
    Terminal,
    Information,
    Actions,
    Fun,
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Terminal => "Terminal",
            Self::Information => "Information",
            Self::Actions => "Actions",
            Self::Fun => "Fun Commands",
        };
        write!(f, "{}", name)
    }
}

/// Alias → expansion. An expansion may carry fixed arguments (`dlp`).
const ALIASES: &[(&str, &str)] = &[
    ("h", "help"),
    ("?", "help"),
    ("c", "clear"),
    ("cls", "clear"),
    ("q", "exit"),
    ("quit", "exit"),
    ("a", "about"),
    ("me", "about"),
    ("bio", "about"),
    ("p", "projects"),
    ("proj", "projects"),
    ("s", "skills"),
    ("tech", "skills"),
    ("e", "experience"),
    ("exp", "experience"),
    ("work", "experience"),
    ("edu", "education"),
    ("school", "education"),
    ("con", "contact"),
    ("soc", "social"),
    ("links", "social"),
    ("g", "github"),
    ("git", "github"),
    ("stats", "github"),
    ("m", "matrix"),
    ("mtx", "matrix"),
    ("dl", "download"),
    ("d", "download"),
    ("dlp", "download -p"),
    ("dlr", "download -r"),
    ("r", "reload"),
    ("refresh", "reload"),
    ("art", "ascii"),
    ("logo", "ascii"),
    ("f", "fortune"),
    ("type", "typingtest"),
];

/// A typed line resolved to its canonical command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub command: CliCommand,
    pub args: Vec<String>,
}

impl ResolvedCommand {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }
}

/// Static registry of canonical commands and their aliases
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRegistry;

impl CommandRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a typed line; the first token is case-insensitive
    pub fn resolve(&self, line: &str) -> Option<ResolvedCommand> {
        let lowered = line.trim().to_lowercase();
        let mut parts = lowered.split_whitespace();
        let token = parts.next()?;
        let rest: Vec<String> = parts.map(str::to_string).collect();

        if let Some(command) = CliCommand::from_name(token) {
            return Some(ResolvedCommand {
                command,
                args: rest,
            });
        }

        let expansion = self.alias_expansion(token)?;
        let mut expanded = expansion.split_whitespace();
        let command = CliCommand::from_name(expanded.next()?)?;
        let args = expanded.map(str::to_string).chain(rest).collect();
        Some(ResolvedCommand { command, args })
    }

    pub fn alias_expansion(&self, alias: &str) -> Option<&'static str> {
        ALIASES
            .iter()
            .find(|(name, _)| *name == alias)
            .map(|(_, expansion)| *expansion)
    }

    /// Aliases that resolve to `command` (compound aliases included)
    pub fn aliases_for(&self, command: CliCommand) -> Vec<&'static str> {
        ALIASES
            .iter()
            .filter(|(_, expansion)| {
                expansion.split_whitespace().next() == Some(command.name())
            })
            .map(|(alias, _)| *alias)
            .collect()
    }

    pub fn all_aliases(&self) -> impl Iterator<Item = &'static str> {
        ALIASES.iter().map(|(alias, _)| *alias)
    }

    /// Canonical names used by the typo detector
    pub fn canonical_names(&self) -> Vec<&'static str> {
        CliCommand::all_commands().iter().map(|c| c.name()).collect()
    }

    /// Canonical names, aliases and discoverable easter eggs starting with
    /// `prefix`, sorted
    pub fn completions(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }
        let names: BTreeSet<&str> = self
            .canonical_names()
            .into_iter()
            .chain(self.all_aliases())
            .chain(DISCOVERABLE.iter().copied())
            .filter(|name| name.starts_with(&prefix))
            .collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// Formatted help listing grouped by category
    pub fn help_text(&self) -> String {
        let categories = [
            CommandCategory::Information,
            CommandCategory::Actions,
            CommandCategory::Fun,
            CommandCategory::Terminal,
        ];

        let mut lines = vec!["Available commands:".to_string()];
        for category in categories {
            lines.push(String::new());
            lines.push(format!("── {} ──", category));
            for cmd in CliCommand::by_category(category) {
                let aliases = self.aliases_for(cmd);
                let alias_text = if aliases.is_empty() {
                    String::new()
                } else {
                    format!("({})", aliases.join(", "))
                };
                lines.push(format!(
                    "  {:<22} {:<16} {}",
                    cmd.usage(),
                    alias_text,
                    cmd.description()
                ));
            }
        }
        lines.push(String::new());
        lines.push("Try typing 'coffee', 'rocket', 'cow', 'sudo', or '42' for surprises!".to_string());
        lines.join("\n")
    }
}
