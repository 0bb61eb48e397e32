//! Portfolio document model.
//!
//! The document is an external JSON contract produced by the portfolio
//! processing API. Every section is optional on the wire; the loose shapes the
//! API has emitted over time (string skills, `role` instead of `title`,
//! `accomplishments` instead of `achievements`, `{"data": ...}` envelopes) are
//! accepted and normalized here so the terminal handlers only see one shape.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::cli::config::UserDefaults;
use crate::error::Result;

/// Normalized portfolio document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioDocument {
    pub personal_info: PersonalInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "deserialize_skills")]
    pub skills: Vec<Skill>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    pub social_links: SocialLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_stats: Option<GithubStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Sections the terminal does not read (insights, techStack, ...), kept so
    /// an exported document round-trips without losing them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    pub featured: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "level")]
    pub proficiency: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<String>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub accomplishments: Vec<String>,
}

impl Experience {
    /// Job title, falling back to `role`.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().or(self.role.as_deref())
    }

    /// Human readable date range.
    pub fn date_range(&self) -> Option<String> {
        date_range(
            self.dates.as_deref().or(self.duration.as_deref()),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )
    }

    /// Achievements, falling back to `accomplishments`.
    pub fn achievements(&self) -> &[String] {
        if self.achievements.is_empty() {
            &self.accomplishments
        } else {
            &self.achievements
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<String>,
}

impl Education {
    pub fn date_range(&self) -> Option<String> {
        date_range(
            self.dates.as_deref().or(self.duration.as_deref()),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GithubStats {
    pub total_public_repos: Option<u64>,
    pub total_stars: Option<u64>,
    pub total_forks: Option<u64>,
    pub total_commits: Option<u64>,
    pub featured_repos: Option<u64>,
}

impl GithubStats {
    pub fn zeroed() -> Self {
        Self {
            total_public_repos: Some(0),
            total_stars: Some(0),
            total_forks: Some(0),
            total_commits: Some(0),
            featured_repos: Some(0),
        }
    }
}

impl PortfolioDocument {
    /// Parse a document, unwrapping a `{"data": {...}}` API envelope.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let value = match value {
            Value::Object(mut map) if matches!(map.get("data"), Some(Value::Object(_))) => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        Ok(serde_json::from_value(value)?)
    }

    /// Fill sections missing from the document with the configured defaults.
    pub fn with_defaults(mut self, defaults: &UserDefaults) -> Self {
        let info = &mut self.personal_info;
        fill(&mut info.name, &defaults.name);
        fill(&mut info.title, &defaults.title);
        fill(&mut info.summary, &defaults.bio);
        fill(&mut info.email, &defaults.email);
        fill(&mut info.phone, &defaults.phone);
        fill(&mut info.location, &defaults.location);

        fill(&mut self.social_links.github, &defaults.github_url);
        fill(&mut self.social_links.linkedin, &defaults.linkedin_url);

        if self.github_stats.is_none() {
            self.github_stats = Some(GithubStats::zeroed());
        }
        self
    }

    /// Document built from defaults alone.
    pub fn from_defaults(defaults: &UserDefaults) -> Self {
        Self::default().with_defaults(defaults)
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn fill(slot: &mut Option<String>, default: &str) {
    let missing = slot.as_deref().map_or(true, |s| s.trim().is_empty());
    if missing && !default.is_empty() {
        *slot = Some(default.to_string());
    }
}

/// Format an ISO-ish date the way the terminal prints dates ("Jan 5, 2023").
/// Strings that do not parse are returned unchanged.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%b %-d, %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%b %-d, %Y").to_string();
    }
    raw.to_string()
}

fn date_range(dates: Option<&str>, start: Option<&str>, end: Option<&str>) -> Option<String> {
    if let Some(dates) = dates.filter(|d| !d.trim().is_empty()) {
        return Some(dates.to_string());
    }
    let start = start.filter(|s| !s.trim().is_empty())?;
    let end = end
        .filter(|e| !e.trim().is_empty())
        .map(format_date)
        .unwrap_or_else(|| "Present".to_string());
    Some(format!("{} - {}", format_date(start), end))
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSkill {
    Name(String),
    Detailed(Skill),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSkills {
    List(Vec<RawSkill>),
    ByCategory(BTreeMap<String, Vec<String>>),
}

fn deserialize_skills<'de, D>(deserializer: D) -> std::result::Result<Vec<Skill>, D::Error>
where
    D: Deserializer<'de>,
{
    let skills = match Option::<RawSkills>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawSkills::List(list)) => list
            .into_iter()
            .map(|raw| match raw {
                RawSkill::Name(name) => Skill {
                    name,
                    ..Skill::default()
                },
                RawSkill::Detailed(skill) => skill,
            })
            .collect(),
        Some(RawSkills::ByCategory(map)) => map
            .into_iter()
            .flat_map(|(category, names)| {
                names.into_iter().map(move |name| Skill {
                    name,
                    category: Some(category.clone()),
                    proficiency: None,
                })
            })
            .collect(),
    };
    Ok(skills)
}
