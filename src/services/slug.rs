//! URL-safe identifiers for shareable event links.

use std::collections::HashSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const MAX_SLUG_LEN: usize = 50;

/// Longest counter suffix [`dedupe_slug`] can append: `-` plus a `u32`.
const MAX_SUFFIX_LEN: usize = 11;

/// Derive a lowercase, hyphen-separated slug from a free-form title.
///
/// Accents are folded to their base letter, whitespace runs become a single
/// hyphen, anything outside `[a-z0-9_-]` is dropped and the result is capped
/// at [`MAX_SLUG_LEN`] characters. Returns an empty string when nothing usable
/// is left, which callers must treat as "no slug".
pub fn generate_slug(title: &str) -> String {
    let folded = title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    let hyphenated = folded.split_whitespace().collect::<Vec<_>>().join("-");

    let mut slug = String::with_capacity(hyphenated.len());
    for c in hyphenated.chars() {
        match c {
            'a'..='z' | '0'..='9' | '_' => slug.push(c),
            '-' if !slug.ends_with('-') => slug.push('-'),
            _ => {}
        }
    }

    // Only ASCII remains, so byte truncation is char truncation.
    slug.truncate(MAX_SLUG_LEN);
    slug.trim_matches('-').to_string()
}

/// Pick the first of `base`, `base-2`, `base-3`, ... not present in `taken`.
///
/// Long bases are shortened to make room for the counter, so a candidate does
/// not always start with `base`. Every candidate does start with
/// [`slug_family_prefix`]`(base)`, which is what `taken` must be drawn from.
pub fn dedupe_slug(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }

    for n in 2..=u32::MAX {
        let candidate = format!("{}-{}", stem_for(base, n), n);
        if !taken.contains(&candidate) {
            return candidate;
        }
    }
    unreachable!("more than u32::MAX events share the slug '{}'", base)
}

/// The longest prefix shared by `base` and every candidate [`dedupe_slug`]
/// may produce for it.
pub fn slug_family_prefix(base: &str) -> &str {
    let room = MAX_SLUG_LEN - MAX_SUFFIX_LEN;
    base[..base.len().min(room)].trim_end_matches('-')
}

fn stem_for(base: &str, n: u32) -> &str {
    let room = MAX_SLUG_LEN - 1 - n.to_string().len();
    base[..base.len().min(room)].trim_end_matches('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_slug_shaped(slug: &str) -> bool {
        slug.len() <= MAX_SLUG_LEN
            && slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
            && !slug.starts_with('-')
            && !slug.ends_with('-')
            && !slug.contains("--")
    }

    #[test]
    fn test_tournament_title() {
        assert_eq!(
            generate_slug("Torneo Inter Puerto Rico 2024!"),
            "torneo-inter-puerto-rico-2024"
        );
    }

    #[test]
    fn test_accents_and_padding() {
        assert_eq!(generate_slug("  Café   Final  "), "cafe-final");
        assert_eq!(generate_slug("Señor Niño Über"), "senor-nino-uber");
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert_eq!(generate_slug(""), "");
        assert_eq!(generate_slug("   "), "");
        assert_eq!(generate_slug("!!! ??? ..."), "");
    }

    #[test]
    fn test_hyphen_runs_collapse() {
        assert_eq!(generate_slug("Semi - Final"), "semi-final");
        assert_eq!(generate_slug("a-!-b"), "a-b");
        assert_eq!(generate_slug("--edge case--"), "edge-case");
    }

    #[test]
    fn test_underscore_is_kept() {
        assert_eq!(generate_slug("U_18 Cup"), "u_18-cup");
    }

    #[test]
    fn test_truncated_to_max_len() {
        let title = "word ".repeat(40);
        let slug = generate_slug(&title);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
        assert!(slug.starts_with("word-word"));
    }

    #[test]
    fn test_output_shape_and_idempotence() {
        let long_word = "a".repeat(120);
        let many_hyphens = "x - y - z - ".repeat(10);
        let samples = [
            "Torneo Inter Puerto Rico 2024!",
            "  Café   Final  ",
            "ÀÉÎÕÜ çà et là",
            "Liga  de\tVerano\n2025",
            "日本語 title",
            "___",
            long_word.as_str(),
            many_hyphens.as_str(),
            "Pre-Season: Kick-off (Home)",
        ];

        for sample in samples {
            let slug = generate_slug(sample);
            assert!(is_slug_shaped(&slug), "bad slug {:?} from {:?}", slug, sample);
            assert_eq!(generate_slug(&slug), slug, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_dedupe_free_slug_unchanged() {
        let taken = HashSet::new();
        assert_eq!(dedupe_slug("final", &taken), "final");
    }

    #[test]
    fn test_dedupe_appends_counter() {
        let taken: HashSet<String> = ["final", "final-2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(dedupe_slug("final", &taken), "final-3");
    }

    #[test]
    fn test_dedupe_stays_within_max_len() {
        let base = "a".repeat(MAX_SLUG_LEN);
        let mut taken: HashSet<String> = [base.clone()].into_iter().collect();

        let second = dedupe_slug(&base, &taken);
        assert_eq!(second.len(), MAX_SLUG_LEN);
        assert!(second.ends_with("-2"));
        taken.insert(second.clone());

        let third = dedupe_slug(&base, &taken);
        assert_eq!(third.len(), MAX_SLUG_LEN);
        assert!(third.ends_with("-3"));
        assert_ne!(third, second);
    }

    #[test]
    fn test_dedupe_long_base_keeps_counting() {
        let base = generate_slug("Campeonato Nacional de Baloncesto Juvenil Puerto Rico 2024");
        assert_eq!(base.len(), MAX_SLUG_LEN);

        let mut taken: HashSet<String> = HashSet::new();
        for _ in 0..12 {
            let slug = dedupe_slug(&base, &taken);
            assert!(is_slug_shaped(&slug), "bad slug {:?}", slug);
            assert!(taken.insert(slug), "dedupe returned a taken slug");
        }
        assert!(taken.contains("campeonato-nacional-de-baloncesto-juvenil-puert-12"));
    }

    #[test]
    fn test_family_prefix_covers_every_candidate() {
        let long = generate_slug("Campeonato Nacional de Baloncesto Juvenil Puerto Rico 2024");
        for base in ["final", long.as_str()] {
            let prefix = slug_family_prefix(base);
            assert!(base.starts_with(prefix));
            for n in [2, 9, 10, 99, 1_000, u32::MAX] {
                let candidate = format!("{}-{}", stem_for(base, n), n);
                assert!(candidate.len() <= MAX_SLUG_LEN);
                assert!(
                    candidate.starts_with(prefix),
                    "{:?} does not start with {:?}",
                    candidate,
                    prefix
                );
            }
        }
    }
}
