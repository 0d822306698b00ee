use derive_more::Display;

///
/// Lookup
///
/// Operator table shared by the decoder and the in-memory evaluator.
/// Names match the host ORM's lookup vocabulary.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Lookup {
    #[display("exact")]
    Exact,
    #[display("iexact")]
    IExact,
    #[display("contains")]
    Contains,
    #[display("icontains")]
    IContains,
    #[display("startswith")]
    StartsWith,
    #[display("istartswith")]
    IStartsWith,
    #[display("endswith")]
    EndsWith,
    #[display("iendswith")]
    IEndsWith,
    #[display("lt")]
    Lt,
    #[display("lte")]
    Lte,
    #[display("gt")]
    Gt,
    #[display("gte")]
    Gte,
    #[display("in")]
    In,
    #[display("range")]
    Range,
    #[display("year")]
    Year,
    #[display("month")]
    Month,
    #[display("day")]
    Day,
    #[display("isnull")]
    IsNull,
    #[display("regex")]
    Regex,
    #[display("iregex")]
    IRegex,
    #[display("search")]
    Search,
}

impl Lookup {
    pub const ALL: [Self; 21] = [
        Self::Exact,
        Self::IExact,
        Self::Contains,
        Self::IContains,
        Self::StartsWith,
        Self::IStartsWith,
        Self::EndsWith,
        Self::IEndsWith,
        Self::Lt,
        Self::Lte,
        Self::Gt,
        Self::Gte,
        Self::In,
        Self::Range,
        Self::Year,
        Self::Month,
        Self::Day,
        Self::IsNull,
        Self::Regex,
        Self::IRegex,
        Self::Search,
    ];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lookup| lookup.as_str() == name)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::IExact => "iexact",
            Self::Contains => "contains",
            Self::IContains => "icontains",
            Self::StartsWith => "startswith",
            Self::IStartsWith => "istartswith",
            Self::EndsWith => "endswith",
            Self::IEndsWith => "iendswith",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::In => "in",
            Self::Range => "range",
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::IsNull => "isnull",
            Self::Regex => "regex",
            Self::IRegex => "iregex",
            Self::Search => "search",
        }
    }

    /// Lookups whose argument is legitimately a list of values.
    #[must_use]
    pub const fn takes_list(self) -> bool {
        matches!(self, Self::In | Self::Range | Self::Year)
    }

    /// Lookups whose argument is not a value of the field's own kind.
    #[must_use]
    pub const fn skips_conversion(self) -> bool {
        matches!(self, Self::IsNull | Self::Month | Self::Day)
    }

    /// Lookups the in-memory evaluator refuses.
    #[must_use]
    pub const fn is_emulated(self) -> bool {
        !matches!(self, Self::Regex | Self::IRegex | Self::Search)
    }

    /// Wildcard decoration the host adds around pattern arguments.
    #[must_use]
    pub const fn wildcards(self) -> Wildcards {
        match self {
            Self::StartsWith | Self::IStartsWith => Wildcards::Trailing,
            Self::EndsWith | Self::IEndsWith => Wildcards::Leading,
            Self::Contains | Self::IContains => Wildcards::Both,
            _ => Wildcards::None,
        }
    }
}

///
/// Wildcards
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Wildcards {
    None,
    Leading,
    Trailing,
    Both,
}

impl Wildcards {
    pub const MARKER: char = '%';

    /// Strip one host-added marker from each decorated end.
    #[must_use]
    pub fn strip(self, pattern: &str) -> String {
        let mut out = pattern;
        if matches!(self, Self::Leading | Self::Both) {
            out = out.strip_prefix(Self::MARKER).unwrap_or(out);
        }
        if matches!(self, Self::Trailing | Self::Both) {
            out = out.strip_suffix(Self::MARKER).unwrap_or(out);
        }

        out.to_string()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_the_table() {
        for lookup in Lookup::ALL {
            assert_eq!(Lookup::from_name(lookup.as_str()), Some(lookup));
            assert_eq!(lookup.to_string(), lookup.as_str());
        }
        assert_eq!(Lookup::from_name("soundex"), None);
    }

    #[test]
    fn wildcard_stripping_matches_lookup_shape() {
        assert_eq!(Lookup::StartsWith.wildcards().strip("ab%"), "ab");
        assert_eq!(Lookup::IEndsWith.wildcards().strip("%ab"), "ab");
        assert_eq!(Lookup::Contains.wildcards().strip("%ab%"), "ab");
        assert_eq!(Lookup::Exact.wildcards().strip("%ab%"), "%ab%");
    }

    #[test]
    fn undecorated_patterns_are_unchanged() {
        assert_eq!(Lookup::StartsWith.wildcards().strip("ab"), "ab");
        assert_eq!(Lookup::Contains.wildcards().strip("a%b"), "a%b");
    }
}
