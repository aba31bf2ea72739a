//! Server distributions ("forks") supported by MCM.
//!
//! Every installation record carries the fork that created it, and the
//! update path dispatches on it to pick the matching resolver. The registry
//! keeps the tag exactly as written; [`ForkTag`] interprets it with the same
//! parser the command line uses, so a tag this build does not know survives
//! a rewrite untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::McmError;

/// A Minecraft server distribution with its own metadata scheme.
///
/// The serialized form is the lowercase distribution name (`"vanilla"`,
/// `"paper"`, `"forge"`), which is also what older registries contain.
/// Parsing ignores case and accepts `papermc` and the scheme names
/// (`direct-release`, `build-numbered`, `scraped-index`) as aliases.
///
/// # Examples
///
/// ```rust
/// use mcm_cli::core::Fork;
///
/// let fork: Fork = "paper".parse().unwrap();
/// assert_eq!(fork, Fork::Paper);
/// assert_eq!(fork.to_string(), "paper");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Fork {
    /// Mojang's own server jar, resolved through the launcher version manifest.
    Vanilla,

    /// PaperMC, where each version publishes a list of numbered builds.
    Paper,

    /// Minecraft Forge, which only publishes HTML index pages.
    Forge,
}

impl Fork {
    /// All forks this build can resolve, in display order.
    pub const ALL: [Fork; 3] = [Fork::Vanilla, Fork::Paper, Fork::Forge];

    /// The tag written into the registry for this fork.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Fork::Vanilla => "vanilla",
            Fork::Paper => "paper",
            Fork::Forge => "forge",
        }
    }
}

impl fmt::Display for Fork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Fork {
    type Err = McmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vanilla" | "direct-release" => Ok(Fork::Vanilla),
            "paper" | "papermc" | "build-numbered" => Ok(Fork::Paper),
            "forge" | "scraped-index" => Ok(Fork::Forge),
            _ => Err(McmError::InvalidFork {
                fork: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Fork {
    type Error = McmError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

impl From<Fork> for String {
    fn from(fork: Fork) -> Self {
        fork.as_str().to_string()
    }
}

/// The fork tag as stored in a registry record.
///
/// Holds the tag verbatim and serializes it back unchanged, so rewriting the
/// registry never alters records it was not asked to touch. [`ForkTag::known`]
/// interprets it with [`Fork`]'s parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForkTag(String);

impl ForkTag {
    /// Returns the fork when it is one this build can resolve.
    #[must_use]
    pub fn known(&self) -> Option<Fork> {
        self.0.parse().ok()
    }

    /// The tag exactly as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Fork> for ForkTag {
    fn from(fork: Fork) -> Self {
        ForkTag(fork.as_str().to_string())
    }
}

impl fmt::Display for ForkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fork_parse_accepts_aliases() {
        assert_eq!("Vanilla".parse::<Fork>().unwrap(), Fork::Vanilla);
        assert_eq!("direct-release".parse::<Fork>().unwrap(), Fork::Vanilla);
        assert_eq!("build-numbered".parse::<Fork>().unwrap(), Fork::Paper);
        assert_eq!("scraped-index".parse::<Fork>().unwrap(), Fork::Forge);
        assert!("spigot".parse::<Fork>().is_err());
    }

    #[test]
    fn test_fork_serde_uses_lowercase_name() {
        assert_eq!(serde_json::to_string(&Fork::Paper).unwrap(), "\"paper\"");
        let parsed: Fork = serde_json::from_str("\"build-numbered\"").unwrap();
        assert_eq!(parsed, Fork::Paper);
        assert!(serde_json::from_str::<Fork>("\"spigot\"").is_err());
    }

    #[test]
    fn test_serde_and_from_str_agree() {
        for tag in ["vanilla", "Paper", "PAPERMC", "direct-release", "Forge", "fabric", ""] {
            let from_str = tag.parse::<Fork>().ok();
            let from_json = serde_json::from_value::<Fork>(serde_json::json!(tag)).ok();
            assert_eq!(from_str, from_json, "tag {tag:?}");

            let stored: ForkTag = serde_json::from_value(serde_json::json!(tag)).unwrap();
            assert_eq!(stored.known(), from_str, "tag {tag:?}");
        }
    }

    #[test]
    fn test_fork_tag_preserves_unknown_values() {
        let tag: ForkTag = serde_json::from_str("\"fabric\"").unwrap();
        assert_eq!(tag.as_str(), "fabric");
        assert_eq!(tag.known(), None);
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"fabric\"");
    }

    #[test]
    fn test_fork_tag_keeps_alias_spelling() {
        let tag: ForkTag = serde_json::from_str("\"Paper\"").unwrap();
        assert_eq!(tag.known(), Some(Fork::Paper));
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"Paper\"");

        let tag: ForkTag = serde_json::from_str("\"direct-release\"").unwrap();
        assert_eq!(tag.known(), Some(Fork::Vanilla));
        assert_eq!(tag.to_string(), "direct-release");
    }

    #[test]
    fn test_fork_tag_from_fork_is_canonical() {
        assert_eq!(ForkTag::from(Fork::Forge).as_str(), "forge");
        assert_eq!(ForkTag::from(Fork::Forge).known(), Some(Fork::Forge));
    }
}
