//! Fuzzy search over item, category and store names.
//!
//! Matching is done with [nucleo_matcher], which finds the query as a case-insensitive
//! subsequence of a field. Queries that do not match as a subsequence are given a second chance
//! with a word-by-word edit distance so that small typos (e.g., "bannana") still find the item.
//! Edit-distance matches always rank below subsequence matches.

use std::cmp::Reverse;

use nucleo_matcher::{
    Config, Matcher, Utf32Str,
    pattern::{AtomKind, CaseMatching, Normalization, Pattern},
};

use crate::item::Item;

/// How well a query matched a field. Greater is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchQuality {
    /// Every query word is within a few edits of a word in the field.
    /// Holds the number of edits saved relative to the allowed maximum.
    Typo(u32),
    /// The query is a subsequence of the field. Holds the nucleo score.
    Subsequence(u32),
}

/// Return the items matching `query` in any of their name, category name or store names, best
/// match first.
///
/// An empty (or all whitespace) query matches every item and returns `items` in their original
/// order without running the matcher. Items that match equally well keep their input order.
pub fn search<'a, I>(items: I, query: &str) -> Vec<&'a Item>
where
    I: IntoIterator<Item = &'a Item>,
{
    let query = query.trim();

    if query.is_empty() {
        return items.into_iter().collect();
    }

    let mut matcher = ItemMatcher::new(query);
    let mut ranked: Vec<(MatchQuality, &'a Item)> = items
        .into_iter()
        .filter_map(|item| matcher.score(item).map(|quality| (quality, item)))
        .collect();

    // `sort_by_key` is stable, which keeps ties in input order.
    ranked.sort_by_key(|(quality, _)| Reverse(*quality));

    ranked.into_iter().map(|(_, item)| item).collect()
}

/// Scores items against a single query, reusing buffers across calls.
struct ItemMatcher {
    pattern: Pattern,
    matcher: Matcher,
    buf: Vec<char>,
    query_words: Vec<Vec<char>>,
}

impl ItemMatcher {
    fn new(query: &str) -> Self {
        Self {
            // Fuzzy atoms only: `!`, `^` and `$` in a query are ordinary characters.
            pattern: Pattern::new(
                query,
                CaseMatching::Ignore,
                Normalization::Smart,
                AtomKind::Fuzzy,
            ),
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::with_capacity(64),
            query_words: split_words(query),
        }
    }

    fn score(&mut self, item: &Item) -> Option<MatchQuality> {
        let mut best = self.score_field(item.name.as_ref());

        for field in std::iter::once(item.category_name())
            .chain(item.stores.iter().map(|store| store.name.as_ref()))
        {
            best = best.max(self.score_field(field));
        }

        best
    }

    fn score_field(&mut self, haystack: &str) -> Option<MatchQuality> {
        self.buf.clear();
        let utf32 = Utf32Str::new(haystack, &mut self.buf);

        if let Some(score) = self.pattern.score(utf32, &mut self.matcher) {
            return Some(MatchQuality::Subsequence(score));
        }

        typo_score(&self.query_words, &split_words(haystack)).map(MatchQuality::Typo)
    }
}

/// Lowercase `text` and split it into words of alphanumeric characters.
fn split_words(text: &str) -> Vec<Vec<char>> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase().chars().collect())
        .collect()
}

/// The number of edits a query word of `len` characters may be away from a field word.
fn allowed_edits(len: usize) -> usize {
    match len {
        0..=3 => 0,
        4..=7 => 1,
        _ => 2,
    }
}

/// Match every query word against its closest field word.
///
/// Returns the total edits left unused, or `None` if some query word is too far from every
/// field word. Short query words must match exactly.
fn typo_score(query_words: &[Vec<char>], field_words: &[Vec<char>]) -> Option<u32> {
    if query_words.is_empty() || field_words.is_empty() {
        return None;
    }

    let mut spare = 0;

    for query_word in query_words {
        let allowed = allowed_edits(query_word.len());
        let closest = field_words
            .iter()
            .map(|field_word| edit_distance(query_word, field_word))
            .min()?;

        if closest > allowed {
            return None;
        }

        spare += (allowed - closest) as u32;
    }

    Some(spare)
}

/// Optimal string alignment distance: insertions, deletions, substitutions and transpositions of
/// adjacent characters all cost one edit.
fn edit_distance(a: &[char], b: &[char]) -> usize {
    let mut previous_previous: Vec<usize> = vec![0; b.len() + 1];
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current: Vec<usize> = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        current[0] = i;

        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            current[j] = (previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(previous[j - 1] + cost);

            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                current[j] = current[j].min(previous_previous[j - 2] + 1);
            }
        }

        std::mem::swap(&mut previous_previous, &mut previous);
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod search_tests {
    use crate::{
        item::Item,
        test_utils::{item, store},
    };

    use super::{edit_distance, search};

    fn example_items() -> Vec<Item> {
        vec![
            item(1, "Milk", "food", vec![store(1, "Grocery")]),
            item(2, "Apples", "food", vec![store(2, "Big Box")]),
            item(3, "Mop", "cleaning", vec![store(1, "Grocery")]),
            item(4, "Bananas", "food", vec![]),
        ]
    }

    fn ids(items: &[&Item]) -> Vec<i64> {
        items.iter().map(|item| item.id).collect()
    }

    #[test]
    fn empty_query_returns_items_unchanged() {
        let items = example_items();

        let results = search(&items, "");

        assert_eq!(ids(&results), [1, 2, 3, 4]);
    }

    #[test]
    fn whitespace_query_returns_items_unchanged() {
        let items = example_items();

        assert_eq!(ids(&search(&items, "  \t")), [1, 2, 3, 4]);
    }

    #[test]
    fn matches_item_name_case_insensitively() {
        let items = example_items();

        assert_eq!(ids(&search(&items, "MILK")), [1]);
    }

    #[test]
    fn matches_subsequence() {
        let items = example_items();

        assert_eq!(ids(&search(&items, "apls")), [2]);
    }

    #[test]
    fn matches_category_name() {
        let items = example_items();

        assert_eq!(ids(&search(&items, "cleaning")), [3]);
    }

    #[test]
    fn matches_store_names() {
        let items = example_items();

        assert_eq!(ids(&search(&items, "grocery")), [1, 3]);
        assert_eq!(ids(&search(&items, "big box")), [2]);
    }

    #[test]
    fn tolerates_typos() {
        let items = example_items();

        assert_eq!(ids(&search(&items, "bannanas")), [4]);
        assert_eq!(ids(&search(&items, "aplpes")), [2]);
    }

    #[test]
    fn no_match_returns_empty() {
        let items = example_items();

        assert!(search(&items, "xylophone").is_empty());
    }

    #[test]
    fn empty_input_returns_empty() {
        let items: Vec<Item> = Vec::new();

        assert!(search(&items, "milk").is_empty());
    }

    #[test]
    fn better_matches_rank_first() {
        let items = vec![
            item(1, "Toilet paper", "household", vec![]),
            item(2, "Paper towels", "household", vec![]),
        ];

        let results = search(&items, "paper towels");

        assert_eq!(ids(&results), [2]);

        let results = search(&items, "paper");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn subsequence_matches_outrank_typo_matches() {
        let items = vec![
            item(1, "Flour", "food", vec![]),
            item(2, "Floor cleaner", "cleaning", vec![]),
        ];

        let results = search(&items, "floor");

        assert_eq!(ids(&results), [2, 1]);
    }

    #[test]
    fn special_characters_do_not_negate_or_anchor() {
        let items = vec![
            item(1, "Milk", "dairy", vec![]),
            item(2, "Mop", "cleaning", vec![]),
            item(3, "Dog food", "pets", vec![]),
            item(4, "Floor mop", "cleaning", vec![]),
        ];

        assert_eq!(ids(&search(&items, "!milk")), [1]);
        assert_eq!(ids(&search(&items, "^mop")), [2, 4]);
        assert_eq!(ids(&search(&items, "mop$")), [2, 4]);
    }

    #[test]
    fn edit_distance_counts_each_kind_of_edit() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();

        assert_eq!(edit_distance(&chars("milk"), &chars("milk")), 0);
        assert_eq!(edit_distance(&chars("milk"), &chars("mlk")), 1);
        assert_eq!(edit_distance(&chars("milk"), &chars("silk")), 1);
        assert_eq!(edit_distance(&chars("milk"), &chars("mikl")), 1);
        assert_eq!(edit_distance(&chars(""), &chars("abc")), 3);
    }
}
