//! Generation requests and audience selection.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("theme must not be empty")]
    EmptyTheme,

    #[error("at least one audience must be selected")]
    NoAudience,

    #[error("unknown audience '{0}'")]
    UnknownAudience(String),
}

/// Who the reflection is written for.
///
/// Serialized with the backend's literal values; the English names are
/// accepted as aliases when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Audience {
    #[serde(rename = "子供", alias = "child")]
    Child,
    #[serde(rename = "若者", alias = "youth")]
    Youth,
    #[serde(rename = "ビジネスパーソン", alias = "professional")]
    Professional,
    #[serde(rename = "高齢者", alias = "senior")]
    Senior,
    #[serde(rename = "指定なし", alias = "unspecified")]
    Unspecified,
}

impl Audience {
    pub const ALL: [Audience; 5] = [
        Audience::Child,
        Audience::Youth,
        Audience::Professional,
        Audience::Senior,
        Audience::Unspecified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Child => "child",
            Self::Youth => "youth",
            Self::Professional => "professional",
            Self::Senior => "senior",
            Self::Unspecified => "unspecified",
        }
    }

    /// Value the backend expects on the wire.
    pub fn wire_value(&self) -> &'static str {
        match self {
            Self::Child => "子供",
            Self::Youth => "若者",
            Self::Professional => "ビジネスパーソン",
            Self::Senior => "高齢者",
            Self::Unspecified => "指定なし",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audience {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Audience::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(needle) || a.wire_value() == needle)
            .ok_or_else(|| RequestError::UnknownAudience(needle.to_string()))
    }
}

/// Audience checkbox state kept by the view layer.
///
/// `Unspecified` is exclusive: selecting it clears every other audience,
/// and selecting any other audience clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudienceSelection {
    selected: BTreeSet<Audience>,
}

impl Default for AudienceSelection {
    fn default() -> Self {
        Self {
            selected: BTreeSet::from([Audience::Unspecified]),
        }
    }
}

impl AudienceSelection {
    /// A selection with nothing checked.
    pub fn empty() -> Self {
        Self {
            selected: BTreeSet::new(),
        }
    }

    pub fn select(&mut self, audience: Audience) {
        if audience == Audience::Unspecified {
            self.selected.clear();
        } else {
            self.selected.remove(&Audience::Unspecified);
        }
        self.selected.insert(audience);
    }

    pub fn deselect(&mut self, audience: Audience) {
        self.selected.remove(&audience);
    }

    /// Apply a checkbox change.
    pub fn toggle(&mut self, audience: Audience, checked: bool) {
        if checked {
            self.select(audience);
        } else {
            self.deselect(audience);
        }
    }

    pub fn contains(&self, audience: Audience) -> bool {
        self.selected.contains(&audience)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Audience> + '_ {
        self.selected.iter().copied()
    }
}

impl IntoIterator for AudienceSelection {
    type Item = Audience;
    type IntoIter = std::collections::btree_set::IntoIter<Audience>;

    fn into_iter(self) -> Self::IntoIter {
        self.selected.into_iter()
    }
}

/// A request for one reflection.
///
/// Immutable once built. Construction never fails; `validate` reports
/// whether the request may be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    theme: String,
    audiences: BTreeSet<Audience>,
}

impl GenerationRequest {
    pub fn new(theme: impl Into<String>, audiences: impl IntoIterator<Item = Audience>) -> Self {
        Self {
            theme: theme.into().trim().to_string(),
            audiences: audiences.into_iter().collect(),
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn audiences(&self) -> &BTreeSet<Audience> {
        &self.audiences
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.theme.is_empty() {
            return Err(RequestError::EmptyTheme);
        }
        if self.audiences.is_empty() {
            return Err(RequestError::NoAudience);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unspecified_is_exclusive() {
        let mut selection = AudienceSelection::default();
        assert!(selection.contains(Audience::Unspecified));

        selection.select(Audience::Youth);
        selection.select(Audience::Senior);
        assert!(!selection.contains(Audience::Unspecified));
        assert_eq!(
            selection.iter().collect::<Vec<_>>(),
            vec![Audience::Youth, Audience::Senior]
        );

        selection.toggle(Audience::Unspecified, true);
        assert_eq!(
            selection.iter().collect::<Vec<_>>(),
            vec![Audience::Unspecified]
        );
    }

    #[test]
    fn test_deselect_can_empty_the_selection() {
        let mut selection = AudienceSelection::default();
        selection.toggle(Audience::Unspecified, false);
        assert!(selection.is_empty());

        let request = GenerationRequest::new("gratitude", selection);
        assert_eq!(request.validate(), Err(RequestError::NoAudience));
    }

    #[test]
    fn test_request_validation() {
        let request = GenerationRequest::new("  gratitude  ", [Audience::Youth]);
        assert_eq!(request.theme(), "gratitude");
        assert!(request.validate().is_ok());

        let blank = GenerationRequest::new("   ", [Audience::Youth]);
        assert_eq!(blank.validate(), Err(RequestError::EmptyTheme));
    }

    #[test]
    fn test_request_wire_format() {
        let request = GenerationRequest::new("gratitude", [Audience::Senior, Audience::Youth]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "theme": "gratitude", "audiences": ["若者", "高齢者"] })
        );

        let parsed: Vec<Audience> = serde_json::from_str(r#"["child", "指定なし"]"#).unwrap();
        assert_eq!(parsed, vec![Audience::Child, Audience::Unspecified]);
    }

    #[test]
    fn test_audience_from_str() {
        assert_eq!("Youth".parse::<Audience>().unwrap(), Audience::Youth);
        assert_eq!("高齢者".parse::<Audience>().unwrap(), Audience::Senior);
        assert!(matches!(
            "martians".parse::<Audience>(),
            Err(RequestError::UnknownAudience(_))
        ));
    }
}
