use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use tracing::debug;

use super::super::ViewModel;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Highest scoring name for the query; ties go to the shorter name, then the earlier one.
pub(in crate::app) fn best_match<'a>(
    names: impl IntoIterator<Item = &'a str>,
    query: &str,
) -> Option<usize> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    let matcher = SkimMatcherV2::default();
    names
        .into_iter()
        .enumerate()
        .filter_map(|(index, name)| {
            fuzzy_match_score(&matcher, name, query).map(|score| (index, score, name.len()))
        })
        .min_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)).then(a.0.cmp(&b.0)))
        .map(|(index, _, _)| index)
}

impl ViewModel {
    pub(in crate::app) fn search_candidate(&self) -> Option<usize> {
        best_match(
            self.scene.entities().iter().map(|entity| entity.name()),
            &self.search,
        )
    }

    pub(in crate::app) fn select_search_match(&mut self) -> bool {
        let Some(index) = self.search_candidate() else {
            debug!(query = %self.search, "search matched nothing");
            return false;
        };
        self.scene.select(index);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 5] = ["Finland", "Fiji", "France", "Chad", "Central African Republic"];

    #[test]
    fn exact_name_wins() {
        assert_eq!(best_match(NAMES, "Chad"), Some(3));
        assert_eq!(best_match(NAMES, "finland"), Some(0));
    }

    #[test]
    fn fuzzy_abbreviation_matches() {
        assert_eq!(best_match(NAMES, "CAR"), Some(4));
        assert_eq!(best_match(NAMES, "Fran"), Some(2));
    }

    #[test]
    fn empty_or_unknown_query_matches_nothing() {
        assert_eq!(best_match(NAMES, "   "), None);
        assert_eq!(best_match(NAMES, "zzzz"), None);
    }
}
