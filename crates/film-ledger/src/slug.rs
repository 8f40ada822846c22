//! Film title → URL path token for the budget site.
//!
//! The budget site files titles with their leading article moved to the end
//! ("Matrix, The") and punctuation flattened to hyphens. The rules are
//! best-effort: characters outside the rule set pass through unchanged.

/// Characters rewritten to a hyphen.
const HYPHENATED: [char; 7] = [' ', ':', ',', '?', '/', '(', ')'];

/// Characters dropped entirely.
const REMOVED: [char; 3] = ['.', '\'', '!'];

/// A leading article recognised by the swap rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Article {
    The,
    A,
}

impl Article {
    fn prefix(self) -> &'static str {
        match self {
            Article::The => "The ",
            Article::A => "A ",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Article::The => ", The",
            Article::A => ", A",
        }
    }
}

/// Split a case-sensitive leading "The " or "A " off a trimmed title.
pub fn split_leading_article(title: &str) -> (Option<Article>, &str) {
    for article in [Article::The, Article::A] {
        if let Some(rest) = title.strip_prefix(article.prefix()) {
            return (Some(article), rest);
        }
    }
    (None, title)
}

/// Build the URL path token for a film title.
///
/// The article suffix is attached after punctuation is flattened, so the
/// only comma or space in the output is the one the swap introduced.
pub fn title_slug(title: &str) -> String {
    let (article, rest) = split_leading_article(title.trim());

    let mut slug = String::with_capacity(rest.len() + 8);
    for ch in rest.replace('&', "and").chars() {
        if HYPHENATED.contains(&ch) {
            slug.push('-');
        } else if !REMOVED.contains(&ch) {
            slug.push(ch);
        }
    }

    if let Some(article) = article {
        slug.push_str(article.suffix());
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_swap() {
        assert_eq!(title_slug("The Matrix"), "Matrix, The");
        assert_eq!(title_slug("A Beautiful Mind"), "Beautiful-Mind, A");
        assert_eq!(title_slug("  The Artist "), "Artist, The");
    }

    #[test]
    fn test_article_is_case_sensitive_and_needs_space() {
        assert_eq!(title_slug("the matrix"), "the-matrix");
        assert_eq!(title_slug("Theory of Everything"), "Theory-of-Everything");
        assert_eq!(title_slug("Amour"), "Amour");
        assert_eq!(split_leading_article("A"), (None, "A"));
    }

    #[test]
    fn test_only_one_article_is_swapped() {
        assert_eq!(title_slug("The A Team"), "A-Team, The");
    }

    #[test]
    fn test_punctuation_rules() {
        assert_eq!(title_slug("Mr. & Mrs. Smith"), "Mr-and-Mrs-Smith");
        assert_eq!(
            title_slug("Crouching Tiger, Hidden Dragon"),
            "Crouching-Tiger--Hidden-Dragon"
        );
        assert_eq!(
            title_slug("Birdman or (The Unexpected Virtue of Ignorance)"),
            "Birdman-or--The-Unexpected-Virtue-of-Ignorance-"
        );
        assert_eq!(title_slug("Who's Afraid?!"), "Whos-Afraid-");
        assert_eq!(title_slug("Fahrenheit 9/11"), "Fahrenheit-9-11");
    }

    #[test]
    fn test_swap_survives_colon_titles() {
        assert_eq!(
            title_slug("The Lord of the Rings: The Return of the King"),
            "Lord-of-the-Rings--The-Return-of-the-King, The"
        );
    }

    #[test]
    fn test_output_has_no_forbidden_characters() {
        let titles = [
            "Spider-Man: Into the Spider-Verse",
            "Amélie",
            "Once Upon a Time... in Hollywood",
            "Everything Everywhere All at Once",
            "Ford v Ferrari",
            "Precious: Based on the Novel 'Push' by Sapphire",
            "A Man Called Ove",
            "The Shape of Water",
        ];
        for title in titles {
            let slug = title_slug(title);
            let body = slug
                .strip_suffix(", The")
                .or_else(|| slug.strip_suffix(", A"))
                .unwrap_or(&slug);
            for forbidden in ['.', '\'', '!', ':', ',', '?', '/', '(', ')', ' '] {
                assert!(
                    !body.contains(forbidden),
                    "{title:?} -> {slug:?} contains {forbidden:?}"
                );
            }
        }
    }

    #[test]
    fn test_swapped_titles_never_start_with_article() {
        for title in ["The Favourite", "A Star Is Born", "The Irishman"] {
            let slug = title_slug(title);
            assert!(!slug.starts_with("The "));
            assert!(!slug.starts_with("A "));
            assert!(slug.ends_with(", The") || slug.ends_with(", A"));
        }
    }
}
