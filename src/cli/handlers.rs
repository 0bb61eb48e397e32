//! Document-reading command handlers
//!
//! Each handler renders one section of the portfolio document into output
//! lines. A missing document or an empty section yields an explicit
//! "no data" line instead of an error.

use crate::portfolio::document::format_date;
use crate::portfolio::{Education, Experience, PortfolioDocument, Project, Skill};

use super::output::LineKind;

pub const NO_DOCUMENT: &str = "No portfolio data available.";

/// A line produced by a command, before it enters the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: LineKind,
    pub text: String,
}

impl OutputLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn response(text: impl Into<String>) -> Self {
        Self::new(LineKind::Response, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LineKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LineKind::Error, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(LineKind::Info, text)
    }
}

fn with_document(
    doc: Option<&PortfolioDocument>,
    render: impl FnOnce(&PortfolioDocument) -> OutputLine,
) -> Vec<OutputLine> {
    match doc {
        Some(doc) => vec![render(doc)],
        None => vec![OutputLine::error(NO_DOCUMENT)],
    }
}

/// Join the present lines, dropping absent ones
fn join_present(lines: impl IntoIterator<Item = Option<String>>) -> String {
    lines.into_iter().flatten().collect::<Vec<_>>().join("\n")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn about(doc: Option<&PortfolioDocument>) -> Vec<OutputLine> {
    with_document(doc, |doc| {
        let info = &doc.personal_info;
        OutputLine::response(format!(
            "Name: {}\nTitle: {}\n\n{}",
            info.name.as_deref().unwrap_or(""),
            info.title.as_deref().unwrap_or(""),
            info.summary.as_deref().unwrap_or("")
        ))
    })
}

pub fn projects(doc: Option<&PortfolioDocument>) -> Vec<OutputLine> {
    with_document(doc, |doc| {
        if doc.projects.is_empty() {
            return OutputLine::response("No projects found.");
        }
        let blocks: Vec<String> = doc.projects.iter().map(format_project).collect();
        OutputLine::response(blocks.join("\n---\n"))
    })
}

fn format_project(project: &Project) -> String {
    join_present([
        Some(format!(
            "Project: {}",
            non_empty(project.title.as_deref()).unwrap_or("Unnamed Project")
        )),
        non_empty(project.description.as_deref()).map(|d| format!("Description: {}", d)),
        (!project.technologies.is_empty())
            .then(|| format!("Technologies: {}", project.technologies.join(", "))),
        non_empty(project.github.as_deref()).map(|g| format!("GitHub: {}", g)),
        non_empty(project.demo.as_deref()).map(|d| format!("Demo: {}", d)),
    ])
}

pub fn skills(doc: Option<&PortfolioDocument>) -> Vec<OutputLine> {
    with_document(doc, |doc| {
        if doc.skills.is_empty() {
            return OutputLine::response("No skills data found.");
        }

        // Categories keep the order they first appear in.
        let mut groups: Vec<(&str, Vec<&Skill>)> = Vec::new();
        for skill in &doc.skills {
            let category = non_empty(skill.category.as_deref()).unwrap_or("Other");
            match groups.iter_mut().find(|(name, _)| *name == category) {
                Some((_, members)) => members.push(skill),
                None => groups.push((category, vec![skill])),
            }
        }

        let mut lines = Vec::new();
        for (category, members) in groups {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("== {} ==", category));
            for skill in members {
                lines.push(match skill.proficiency {
                    Some(p) => format!("{}: {}", skill.name, proficiency_bar(p)),
                    None => skill.name.clone(),
                });
            }
        }
        OutputLine::response(lines.join("\n"))
    })
}

/// Ten-cell bar, one filled cell per full ten percent
pub fn proficiency_bar(percent: u32) -> String {
    let percent = percent.min(100);
    let filled = (percent / 10) as usize;
    format!("[{}{}] {}%", "█".repeat(filled), " ".repeat(10 - filled), percent)
}

pub fn experience(doc: Option<&PortfolioDocument>) -> Vec<OutputLine> {
    with_document(doc, |doc| {
        if doc.experience.is_empty() {
            return OutputLine::response("No experience data found.");
        }
        let blocks: Vec<String> = doc.experience.iter().map(format_experience).collect();
        OutputLine::response(blocks.join("\n---\n"))
    })
}

fn format_experience(exp: &Experience) -> String {
    let role = match (non_empty(exp.title()), non_empty(exp.company.as_deref())) {
        (Some(title), Some(company)) => format!("Role: {} at {}", title, company),
        (Some(title), None) => format!("Role: {}", title),
        (None, Some(company)) => format!("Role: {}", company),
        (None, None) => "Role: Unknown".to_string(),
    };
    let achievements = exp.achievements();
    join_present([
        Some(role),
        exp.date_range()
            .map(|range| format!("Duration: {}", range)),
        non_empty(exp.description.as_deref()).map(|d| format!("Details: {}", d)),
        (!achievements.is_empty()).then(|| {
            let items: Vec<String> = achievements.iter().map(|a| format!("  - {}", a)).collect();
            format!("Achievements:\n{}", items.join("\n"))
        }),
    ])
}

pub fn education(doc: Option<&PortfolioDocument>) -> Vec<OutputLine> {
    with_document(doc, |doc| {
        if doc.education.is_empty() {
            return OutputLine::response("No education data found.");
        }
        let blocks: Vec<String> = doc.education.iter().map(format_education).collect();
        OutputLine::response(blocks.join("\n---\n"))
    })
}

fn format_education(edu: &Education) -> String {
    let degree = match (non_empty(edu.degree.as_deref()), non_empty(edu.field.as_deref())) {
        (Some(degree), Some(field)) => Some(format!("Degree: {} in {}", degree, field)),
        (Some(degree), None) => Some(format!("Degree: {}", degree)),
        (None, Some(field)) => Some(format!("Field: {}", field)),
        (None, None) => None,
    };
    join_present([
        degree,
        non_empty(edu.institution.as_deref()).map(|i| format!("Institution: {}", i)),
        edu.date_range().map(|range| format!("Duration: {}", range)),
        non_empty(edu.cgpa.as_deref()).map(|c| format!("CGPA: {}", c)),
        non_empty(edu.description.as_deref()).map(|d| format!("Details: {}", d)),
    ])
}

pub fn contact(doc: Option<&PortfolioDocument>) -> Vec<OutputLine> {
    with_document(doc, |doc| {
        let info = &doc.personal_info;
        let details = join_present([
            non_empty(info.email.as_deref()).map(|e| format!("Email: {}", e)),
            non_empty(info.phone.as_deref()).map(|p| format!("Phone: {}", p)),
            non_empty(info.location.as_deref()).map(|l| format!("Location: {}", l)),
        ]);
        if details.is_empty() {
            return OutputLine::response("No contact information available.");
        }
        OutputLine::response(format!(
            "{}\n\nYou can reach out via email or use the links in the 'social' command.",
            details
        ))
    })
}

pub fn social(doc: Option<&PortfolioDocument>) -> Vec<OutputLine> {
    with_document(doc, |doc| {
        let links = &doc.social_links;
        let text = join_present([
            non_empty(links.github.as_deref()).map(|u| format!("GitHub: {}", u)),
            non_empty(links.linkedin.as_deref()).map(|u| format!("LinkedIn: {}", u)),
            non_empty(links.twitter.as_deref()).map(|u| format!("Twitter: {}", u)),
            non_empty(links.website.as_deref()).map(|u| format!("Website: {}", u)),
        ]);
        if text.is_empty() {
            OutputLine::response("No social links available.")
        } else {
            OutputLine::response(text)
        }
    })
}

pub fn github(doc: Option<&PortfolioDocument>) -> Vec<OutputLine> {
    with_document(doc, |doc| {
        let Some(stats) = &doc.github_stats else {
            return OutputLine::response("No GitHub stats available.");
        };
        let stat = |value: Option<u64>| match value {
            Some(v) if v > 0 => v.to_string(),
            _ => "N/A".to_string(),
        };
        OutputLine::response(format!(
            "GitHub Stats for {}:\n\nTotal Repos: {}\nTotal Stars: {}\nTotal Forks: {}\nTotal Contributions: {}",
            doc.personal_info.name.as_deref().unwrap_or("me"),
            stat(stats.total_public_repos),
            stat(stats.total_stars),
            stat(stats.total_forks),
            stat(stats.total_commits)
        ))
    })
}

/// Date shown next to the welcome banner
pub fn last_updated(doc: Option<&PortfolioDocument>) -> Option<String> {
    doc.and_then(|d| d.last_updated)
        .map(|ts| format_date(&ts.to_rfc3339()))
}
