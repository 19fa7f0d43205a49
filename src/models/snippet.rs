use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use regex::Regex;
use super::entity::{clean_ref, Entity};
use super::snippet_matched_rules::SnippetMatchedRules;

static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(" +").expect("static regex"));

/// Triage status of a snippet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    #[default]
    Unknown,
    Safe,
    Malicious,
    Vulnerable,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Unknown,
        Classification::Safe,
        Classification::Malicious,
        Classification::Vulnerable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Safe => "SAFE",
            Self::Malicious => "MALICIOUS",
            Self::Vulnerable => "VULNERABLE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Safe => "Safe",
            Self::Malicious => "Malicious",
            Self::Vulnerable => "Vulnerable",
        }
    }

    /// Manually submitted verdicts; rescans never override them.
    pub fn is_trusted(&self) -> bool {
        matches!(self, Self::Safe | Self::Malicious)
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown classification '{}' (expected one of UNKNOWN, SAFE, MALICIOUS, VULNERABLE)",
                    s
                )
            })
    }
}

/// A code snippet submitted for scanning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Assigned by the service from the content; see [`content_hash`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    /// Maintained by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_rules: Option<SnippetMatchedRules>,
}

impl Entity for Snippet {
    const NAME: &'static str = "snippet";
    const RESOURCE: &'static str = "snippets";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn reference(id: i64) -> Self {
        Self { id: Some(id), ..Default::default() }
    }

    fn clean(self) -> Self {
        Self {
            matched_rules: clean_ref(self.matched_rules),
            ..self
        }
    }
}

impl Snippet {
    /// A fresh snippet with the default classification.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            classification: Some(Classification::default()),
            ..Default::default()
        }
    }

    pub fn classification(&self) -> Classification {
        self.classification.unwrap_or_default()
    }

    /// True when the stored hash agrees with the content.
    pub fn hash_matches(&self) -> bool {
        match (&self.hash, &self.content) {
            (Some(hash), Some(content)) => hash.eq_ignore_ascii_case(&content_hash(content)),
            _ => false,
        }
    }
}

/// Fingerprint of snippet content: lowercase hex SHA-256 of the content with
/// surrounding whitespace trimmed and runs of spaces collapsed.
///
/// Trimming strips ASCII control characters and spaces (`<= ' '`) only, as
/// the service does; Unicode spaces such as U+00A0 are kept.
pub fn content_hash(content: &str) -> String {
    let trimmed = content.trim_matches(|c: char| c <= ' ');
    let normalized = SPACE_RUNS.replace_all(trimmed, " ");
    let digest = Sha256::digest(normalized.as_bytes());
    data_encoding::HEXLOWER.encode(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_default_is_unknown() {
        assert_eq!(Classification::default(), Classification::Unknown);
        assert_eq!(Snippet::default().classification(), Classification::Unknown);
    }

    #[test]
    fn test_classification_wire_format() {
        let json = serde_json::to_string(&Classification::Malicious).unwrap();
        assert_eq!(json, "\"MALICIOUS\"");
        let parsed: Classification = serde_json::from_str("\"VULNERABLE\"").unwrap();
        assert_eq!(parsed, Classification::Vulnerable);
    }

    #[test]
    fn test_classification_from_str_is_case_insensitive() {
        assert_eq!("safe".parse::<Classification>().unwrap(), Classification::Safe);
        assert!("benign".parse::<Classification>().is_err());
    }

    #[test]
    fn test_trusted_classifications() {
        assert!(Classification::Safe.is_trusted());
        assert!(Classification::Malicious.is_trusted());
        assert!(!Classification::Unknown.is_trusted());
        assert!(!Classification::Vulnerable.is_trusted());
    }

    #[test]
    fn test_content_hash_known_value() {
        // sha256("abc")
        assert_eq!(
            content_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_content_hash_normalizes_spaces() {
        let a = content_hash("  eval(atob(x));  ");
        let b = content_hash("eval(atob(x));");
        let c = content_hash("eval(atob(x));\n");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(content_hash("var  x   = 1"), content_hash("var x = 1"));
        // tabs are not collapsed
        assert_ne!(content_hash("var\t\tx"), content_hash("var\tx"));
    }

    #[test]
    fn test_content_hash_fixed_digests() {
        // sha256("a b")
        assert_eq!(
            content_hash("  a  b  "),
            "c8687a08aa5d6ed2044328fa6a697ab8e96dc34291e8c2034ae8c38e6fcc6d65"
        );
        // sha256("eval(x)")
        let eval = "43aec61ea49223f19b47822e8ea1f3ee301bc5c1568989bbbb8ad86635c9379f";
        assert_eq!(content_hash("\u{1}eval(x)\u{1f}"), eval);
        assert_eq!(content_hash("\r\n\teval(x)\0"), eval);
    }

    #[test]
    fn test_content_hash_keeps_unicode_spaces() {
        // sha256("\u{a0}eval(x)")
        assert_eq!(
            content_hash("\u{a0}eval(x)"),
            "c9bc1632c5c0281d920ef65f6be73a81338c74d5b7a9a05f01d610d11e5a0242"
        );
        assert_ne!(content_hash("eval(x)\u{3000}"), content_hash("eval(x)"));
    }

    #[test]
    fn test_hash_matches() {
        let mut snippet = Snippet::new("alert(1)");
        assert!(!snippet.hash_matches());
        snippet.hash = Some(content_hash("alert(1)"));
        assert!(snippet.hash_matches());
    }

    #[test]
    fn test_snippet_wire_format() {
        let body = r#"{"id":5,"hash":"ab","content":"x","url":null,"classification":"SAFE","scanCount":3,"matchedRules":{"id":2}}"#;
        let snippet: Snippet = serde_json::from_str(body).unwrap();
        assert_eq!(snippet.scan_count, Some(3));
        assert_eq!(snippet.matched_rules.as_ref().and_then(|m| m.id), Some(2));
        let json = serde_json::to_value(&snippet).unwrap();
        assert_eq!(json["scanCount"], 3);
        assert!(json.get("url").is_none());
    }
}
