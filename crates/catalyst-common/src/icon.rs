//! Named icons used by services, process steps and case studies.
//!
//! Rows store the icon as its display name (e.g. `"BarChart3"`). The name is
//! resolved to an [`Icon`] when the row is loaded, so handlers and templates
//! only ever see known variants. Unknown names resolve to [`Icon::Sparkles`].
//!
//! # Examples
//!
//! ```
//! use catalyst_common::icon::Icon;
//!
//! assert_eq!(Icon::from_name("BarChart3"), Icon::BarChart3);
//! assert_eq!(Icon::from_name("no-such-icon"), Icon::Sparkles);
//! assert_eq!(Icon::Workflow.as_str(), "Workflow");
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Icon {
    Zap,
    Target,
    BarChart3,
    Workflow,
    LineChart,
    Rocket,
    TrendingUp,
    FileText,
    DollarSign,
    Users,
    Bot,
    Brain,
    Globe,
    Shield,
    Mail,
    #[default]
    Sparkles,
}

impl Icon {
    pub const ALL: [Icon; 16] = [
        Icon::Zap,
        Icon::Target,
        Icon::BarChart3,
        Icon::Workflow,
        Icon::LineChart,
        Icon::Rocket,
        Icon::TrendingUp,
        Icon::FileText,
        Icon::DollarSign,
        Icon::Users,
        Icon::Bot,
        Icon::Brain,
        Icon::Globe,
        Icon::Shield,
        Icon::Mail,
        Icon::Sparkles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Icon::Zap => "Zap",
            Icon::Target => "Target",
            Icon::BarChart3 => "BarChart3",
            Icon::Workflow => "Workflow",
            Icon::LineChart => "LineChart",
            Icon::Rocket => "Rocket",
            Icon::TrendingUp => "TrendingUp",
            Icon::FileText => "FileText",
            Icon::DollarSign => "DollarSign",
            Icon::Users => "Users",
            Icon::Bot => "Bot",
            Icon::Brain => "Brain",
            Icon::Globe => "Globe",
            Icon::Shield => "Shield",
            Icon::Mail => "Mail",
            Icon::Sparkles => "Sparkles",
        }
    }

    /// Resolves a stored icon name. Matching ignores case and surrounding
    /// whitespace; anything unrecognised becomes the default icon.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|icon| icon.as_str().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Icon {
    fn from(name: String) -> Self {
        Icon::from_name(&name)
    }
}

impl From<&str> for Icon {
    fn from(name: &str) -> Self {
        Icon::from_name(name)
    }
}

impl From<Icon> for String {
    fn from(icon: Icon) -> Self {
        icon.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_resolves_from_its_own_name() {
        for icon in Icon::ALL {
            assert_eq!(Icon::from_name(icon.as_str()), icon);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Icon::from_name(" trendingup "), Icon::TrendingUp);
    }

    #[test]
    fn serde_uses_display_name() {
        let json = serde_json::to_string(&Icon::DollarSign).unwrap();
        assert_eq!(json, "\"DollarSign\"");
        let back: Icon = serde_json::from_str("\"Rocket\"").unwrap();
        assert_eq!(back, Icon::Rocket);
        let unknown: Icon = serde_json::from_str("\"Kangaroo\"").unwrap();
        assert_eq!(unknown, Icon::Sparkles);
    }
}
