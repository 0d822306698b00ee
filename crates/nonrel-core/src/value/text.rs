use std::borrow::Cow;

///
/// TextMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextMode {
    Cs, // case-sensitive
    Ci, // case-insensitive
}

impl TextMode {
    /// Fold input for comparison under this mode.
    #[must_use]
    pub fn fold(self, input: &str) -> Cow<'_, str> {
        match self {
            Self::Cs => Cow::Borrowed(input),
            Self::Ci => Cow::Owned(casefold(input)),
        }
    }
}

/// Lower-case text for case-insensitive lookups.
///
/// ASCII input takes the ASCII fast path; anything else uses Unicode
/// lowercasing (not full case folding, so `ß` stays `ß`).
#[must_use]
pub fn casefold(input: &str) -> String {
    if input.is_ascii() {
        return input.to_ascii_lowercase();
    }

    input.to_lowercase()
}
