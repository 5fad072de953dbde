//! Fenced block families protected from the markup engine.

use std::fmt;

/// A family of fenced blocks that is swapped out before conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFamily {
    /// ```` ```mermaid ```` blocks, rendered client-side.
    Diagram,
    /// ```` ```rtl ```` and ```` ```ltr ```` blocks, converted separately and
    /// wrapped in a direction container.
    Direction,
}

impl BlockFamily {
    /// Marker that every token of this family starts with.
    #[must_use]
    pub fn token_prefix(self) -> &'static str {
        match self {
            Self::Diagram => "%%WIKI_MERMAID_BLOCK_",
            Self::Direction => "%%WIKI_DIRECTION_BLOCK_",
        }
    }

    /// Placeholder token for the `index`-th block of this family.
    #[must_use]
    pub fn token(self, index: usize) -> String {
        format!("{}{index}{TOKEN_SUFFIX}", self.token_prefix())
    }

    /// Whether a fence language belongs to this family.
    #[must_use]
    pub fn accepts(self, language: &str) -> bool {
        match self {
            Self::Diagram => language.eq_ignore_ascii_case("mermaid"),
            Self::Direction => TextDirection::from_language(language).is_some(),
        }
    }
}

impl fmt::Display for BlockFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Diagram => "diagram",
            Self::Direction => "direction",
        })
    }
}

/// Closing marker shared by all tokens.
pub(crate) const TOKEN_SUFFIX: &str = "%%";

/// Writing direction of a directional block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Rtl,
    Ltr,
}

impl TextDirection {
    /// Parse a fence language (`rtl`/`ltr`, any case).
    #[must_use]
    pub fn from_language(language: &str) -> Option<Self> {
        if language.eq_ignore_ascii_case("rtl") {
            Some(Self::Rtl)
        } else if language.eq_ignore_ascii_case("ltr") {
            Some(Self::Ltr)
        } else {
            None
        }
    }

    /// Value of the HTML `dir` attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rtl => "rtl",
            Self::Ltr => "ltr",
        }
    }
}
