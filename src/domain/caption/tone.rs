// SPDX-License-Identifier: MPL-2.0
//! Caption tones.

use std::fmt;
use std::str::FromStr;

/// Tone requested for generated captions.
///
/// The set is closed: it selects the prompt variant on the generation side
/// and validates incoming requests on the service side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Funny,
    Sarcastic,
    Wholesome,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Funny, Tone::Sarcastic, Tone::Wholesome];

    /// Wire name used in requests.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Funny => "funny",
            Tone::Sarcastic => "sarcastic",
            Tone::Wholesome => "wholesome",
        }
    }

    /// Instruction that steers the generator toward this tone.
    #[must_use]
    pub fn instruction(self) -> &'static str {
        match self {
            Tone::Funny => {
                "Generate witty, humorous captions that would make people laugh. \
                 Use wordplay, puns, or absurd observations."
            }
            Tone::Sarcastic => {
                "Generate sarcastic, ironic captions with a dry wit. \
                 Use exaggeration and mock seriousness."
            }
            Tone::Wholesome => {
                "Generate heartwarming, positive captions that spread joy. \
                 Be uplifting and kind."
            }
        }
    }

    /// Display name shown by the tone selector.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Tone::Funny => "Funny",
            Tone::Sarcastic => "Sarcastic",
            Tone::Wholesome => "Wholesome",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Tone::Funny => "😂",
            Tone::Sarcastic => "😏",
            Tone::Wholesome => "🥰",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Tone::Funny => "Witty and humorous",
            Tone::Sarcastic => "Dry wit and irony",
            Tone::Wholesome => "Heartwarming and positive",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tone name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTone(pub String);

impl fmt::Display for UnknownTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tone: {}", self.0)
    }
}

impl std::error::Error for UnknownTone {}

impl FromStr for Tone {
    type Err = UnknownTone;

    /// Parses a wire name. Matching is exact: `"Funny"` is not a tone.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str() == s)
            .ok_or_else(|| UnknownTone(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for tone in Tone::ALL {
            assert_eq!(tone.as_str().parse::<Tone>(), Ok(tone));
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "angry".parse::<Tone>(),
            Err(UnknownTone("angry".to_string()))
        );
        assert!("Funny".parse::<Tone>().is_err());
        assert!("".parse::<Tone>().is_err());
    }

    #[test]
    fn selector_strings_match_each_tone() {
        let selector: Vec<_> = Tone::ALL
            .into_iter()
            .map(|tone| (tone.label(), tone.icon(), tone.description()))
            .collect();
        assert_eq!(
            selector,
            [
                ("Funny", "😂", "Witty and humorous"),
                ("Sarcastic", "😏", "Dry wit and irony"),
                ("Wholesome", "🥰", "Heartwarming and positive"),
            ]
        );
    }

    #[test]
    fn default_tone_is_funny() {
        assert_eq!(Tone::default(), Tone::Funny);
    }

    #[test]
    fn each_tone_has_distinct_instruction() {
        assert_ne!(Tone::Funny.instruction(), Tone::Sarcastic.instruction());
        assert_ne!(Tone::Sarcastic.instruction(), Tone::Wholesome.instruction());
        assert!(Tone::Wholesome.instruction().contains("heartwarming"));
    }
}
