use unicode_normalization::UnicodeNormalization as _;
use unicode_normalization::char::canonical_combining_class;

/// Filesystem-safe token derived from a human-readable name.
///
/// Accents are stripped via NFKD decomposition, spaces become
/// underscores, and anything that is not Unicode-alphanumeric, an
/// underscore, or a hyphen is dropped. Non-Latin scripts pass through
/// unchanged.
#[must_use]
pub fn slugify(text: &str) -> String {
    let slug: String = text
        .nfkd()
        .filter(|c| canonical_combining_class(*c) == 0)
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    slug.trim_matches('_').to_owned()
}
