use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Triage state of a contact submission.
///
/// # Examples
///
/// ```
/// use catalyst_common::types::ContactStatus;
///
/// let status: ContactStatus = "replied".parse().unwrap();
/// assert_eq!(status, ContactStatus::Replied);
/// assert_eq!(ContactStatus::default().to_string(), "new");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Replied,
}

impl ContactStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Replied => "replied",
        }
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(ContactStatus::New),
            "read" => Ok(ContactStatus::Read),
            "replied" => Ok(ContactStatus::Replied),
            _ => Err(format!("unknown contact status: {s}")),
        }
    }
}

/// Tables that accept bulk imports, by their table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentTable {
    Services,
    CaseStudies,
    Testimonials,
    ProcessSteps,
    TechStack,
    BlogPosts,
    Careers,
    TeamMembers,
    ContactSubmissions,
    SiteSettings,
}

impl ContentTable {
    pub const ALL: [ContentTable; 10] = [
        ContentTable::Services,
        ContentTable::CaseStudies,
        ContentTable::Testimonials,
        ContentTable::ProcessSteps,
        ContentTable::TechStack,
        ContentTable::BlogPosts,
        ContentTable::Careers,
        ContentTable::TeamMembers,
        ContentTable::ContactSubmissions,
        ContentTable::SiteSettings,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            ContentTable::Services => "services",
            ContentTable::CaseStudies => "case_studies",
            ContentTable::Testimonials => "testimonials",
            ContentTable::ProcessSteps => "process_steps",
            ContentTable::TechStack => "tech_stack",
            ContentTable::BlogPosts => "blog_posts",
            ContentTable::Careers => "careers",
            ContentTable::TeamMembers => "team_members",
            ContentTable::ContactSubmissions => "contact_submissions",
            ContentTable::SiteSettings => "site_settings",
        }
    }
}

impl std::fmt::Display for ContentTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

impl std::str::FromStr for ContentTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.table_name() == s)
            .ok_or_else(|| format!("unknown table: {s}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
}

/// Name, email and message as typed into the public contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// URL slug derived from a title: lowercase ASCII alphanumerics joined by
/// single dashes.
///
/// ```
/// use catalyst_common::types::slugify;
///
/// assert_eq!(slugify("  Why AI Agents Win (in 2025)! "), "why-ai-agents-win-in-2025");
/// assert_eq!(slugify("---"), "");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_table_parses_every_table_name() {
        for table in ContentTable::ALL {
            assert_eq!(table.table_name().parse::<ContentTable>(), Ok(table));
        }
        assert!("users".parse::<ContentTable>().is_err());
    }

    #[test]
    fn contact_status_rejects_unknown_values() {
        assert!("archived".parse::<ContactStatus>().is_err());
        assert_eq!(" READ ".parse::<ContactStatus>(), Ok(ContactStatus::Read));
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Hello,   World"), "hello-world");
        assert_eq!(slugify("Café déjà vu"), "caf-d-j-vu");
    }
}
