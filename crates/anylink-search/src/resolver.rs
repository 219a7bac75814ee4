//! Name → object resolution.
//!
//! Two independent strategies:
//! - [`ExactNameResolver`] backs link extraction. A reference only resolves
//!   to an object whose name equals the token, ignoring case.
//! - [`FuzzyTypeResolver`] backs the interactive type picker. It ranks
//!   object types by similarity to free-form input.

use anylink_core::entities::{SearchQuery, SearchResult};
use anylink_rpc::ClientCommands;

use crate::error::SearchError;
use crate::facade::SearchFacade;

/// Exact, case-insensitive name resolution.
pub struct ExactNameResolver<'a, C: ?Sized> {
    facade: &'a SearchFacade<C>,
}

impl<'a, C: ClientCommands + ?Sized> ExactNameResolver<'a, C> {
    #[must_use]
    pub const fn new(facade: &'a SearchFacade<C>) -> Self {
        Self { facade }
    }

    /// Search for `name` and return the first result whose name equals it
    /// case-insensitively. When several match, the remote's order decides.
    ///
    /// `Ok(None)` means no such object; it is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Rpc`] if the search call fails.
    pub async fn resolve(&self, name: &str) -> Result<Option<SearchResult>, SearchError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let needle = name.to_lowercase();
        let found = self
            .facade
            .search(&SearchQuery::plain(name))
            .await?
            .into_iter()
            .find(|candidate| candidate.name.to_lowercase() == needle);

        match &found {
            Some(target) => tracing::debug!(name, target = %target.object_id, "resolved reference"),
            None => tracing::debug!(name, "no object with this exact name"),
        }
        Ok(found)
    }
}

/// An object type offered by the type picker.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TypeCandidate {
    /// Position in the listing, selectable by number.
    pub index: usize,
    pub object_id: String,
    pub name: String,
    pub unique_key: String,
    pub space_id: Option<String>,
}

impl TypeCandidate {
    /// `"<index>: <name>"`, as shown in the picker.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}: {}", self.index, self.name)
    }
}

/// Fuzzy object-type selection.
pub struct FuzzyTypeResolver<'a, C: ?Sized> {
    facade: &'a SearchFacade<C>,
}

impl<'a, C: ClientCommands + ?Sized> FuzzyTypeResolver<'a, C> {
    #[must_use]
    pub const fn new(facade: &'a SearchFacade<C>) -> Self {
        Self { facade }
    }

    /// Every object type that carries a unique key, in remote order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Rpc`] if the listing call fails.
    pub async fn candidates(&self) -> Result<Vec<TypeCandidate>, SearchError> {
        let results = self.facade.search(&SearchQuery::all()).await?;
        let candidates: Vec<TypeCandidate> = results
            .iter()
            .filter(|result| result.is_object_type())
            .filter_map(|result| {
                let unique_key = result.unique_key().filter(|key| !key.is_empty())?;
                Some((result, unique_key.to_string()))
            })
            .enumerate()
            .map(|(index, (result, unique_key))| TypeCandidate {
                index,
                object_id: result.object_id.clone(),
                name: result.name.clone(),
                unique_key,
                space_id: result.space_id.clone(),
            })
            .collect();

        tracing::debug!(types = candidates.len(), "listed object types");
        Ok(candidates)
    }
}

/// The candidate whose unique key is `unique_key`, e.g. the stored default
/// type.
#[must_use]
pub fn find_by_unique_key<'c>(
    candidates: &'c [TypeCandidate],
    unique_key: &str,
) -> Option<&'c TypeCandidate> {
    candidates
        .iter()
        .find(|candidate| candidate.unique_key == unique_key)
}

/// Pick the candidate best matching `input`.
///
/// A bare number selects by index. Anything else is ranked by `rapidfuzz`
/// ratio against each candidate's name and label; the earlier candidate wins
/// a tie.
///
/// # Errors
///
/// Returns [`SearchError::InvalidQuery`] for blank input, and when a number
/// is out of range.
pub fn pick<'c>(
    candidates: &'c [TypeCandidate],
    input: &str,
) -> Result<Option<&'c TypeCandidate>, SearchError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SearchError::InvalidQuery("type selection is empty".into()));
    }

    if let Ok(index) = input.parse::<usize>() {
        return candidates
            .iter()
            .find(|candidate| candidate.index == index)
            .map(Some)
            .ok_or_else(|| {
                SearchError::InvalidQuery(format!(
                    "no type numbered {index} (choose 0..{})",
                    candidates.len()
                ))
            });
    }

    let needle = input.to_lowercase();
    let mut best: Option<(&TypeCandidate, f64)> = None;
    for candidate in candidates {
        let score = similarity(&needle, &candidate.name.to_lowercase())
            .max(similarity(&needle, &candidate.label().to_lowercase()));
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }

    if let Some((candidate, score)) = best {
        tracing::debug!(input, chosen = %candidate.name, score, "fuzzy type match");
    }
    Ok(best.map(|(candidate, _)| candidate))
}

fn similarity(a: &str, b: &str) -> f64 {
    rapidfuzz::fuzz::ratio(a.chars(), b.chars())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anylink_core::entities::SessionToken;
    use anylink_rpc::test_support::{FakeClient, object, object_type};
    use anylink_rpc::{RetryConfig, Session};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn facade(client: FakeClient) -> SearchFacade<FakeClient> {
        let client = Arc::new(client.with_session("k1", "t1"));
        SearchFacade::new(Session::new(client, SessionToken::new("t1")), RetryConfig::none())
    }

    #[tokio::test]
    async fn exact_match_ignores_case_and_skips_prefix_matches() {
        let facade = facade(
            FakeClient::new()
                .with_object(object("obj-foobar", "Foobar", "space-a", &[]))
                .with_object(object("obj-foo", "FOO", "space-a", &[])),
        );
        let resolver = ExactNameResolver::new(&facade);

        let found = resolver.resolve("foo").await.unwrap().unwrap();
        assert_eq!(found.object_id, "obj-foo");
    }

    #[tokio::test]
    async fn no_exact_match_is_none_not_error() {
        let facade = facade(
            FakeClient::new().with_object(object("obj-foobar", "Foobar", "space-a", &[])),
        );
        let resolver = ExactNameResolver::new(&facade);

        assert!(resolver.resolve("Foo").await.unwrap().is_none());
        assert!(resolver.resolve("Missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn first_of_several_exact_matches_wins() {
        let facade = facade(FakeClient::new().with_search_response(
            "Alpha",
            vec![
                object("obj-1", "alpha", "space-a", &[]),
                object("obj-2", "Alpha", "space-b", &[]),
            ],
        ));
        let resolver = ExactNameResolver::new(&facade);

        let found = resolver.resolve("Alpha").await.unwrap().unwrap();
        assert_eq!(found.object_id, "obj-1");
    }

    #[tokio::test]
    async fn blank_name_resolves_to_none_without_a_call() {
        let client = Arc::new(FakeClient::new().with_session("k1", "t1"));
        let facade = SearchFacade::new(
            Session::new(Arc::clone(&client), SessionToken::new("t1")),
            RetryConfig::none(),
        );

        assert!(ExactNameResolver::new(&facade).resolve("   ").await.unwrap().is_none());
        assert!(client.calls().is_empty());
    }

    fn types_facade() -> SearchFacade<FakeClient> {
        facade(
            FakeClient::new()
                .with_object(object_type("type-page", "Page", "ot-page"))
                .with_object(object("obj-1", "Meeting notes", "space-a", &[]))
                .with_object(object_type("type-note", "Note", "ot-note"))
                .with_object(object_type("type-task", "Task", "ot-task")),
        )
    }

    #[tokio::test]
    async fn candidates_only_include_object_types() {
        let facade = types_facade();
        let candidates = FuzzyTypeResolver::new(&facade).candidates().await.unwrap();

        let labels: Vec<String> = candidates.iter().map(TypeCandidate::label).collect();
        assert_eq!(labels, vec!["0: Page", "1: Note", "2: Task"]);
        assert_eq!(candidates[1].unique_key, "ot-note");
    }

    #[tokio::test]
    async fn find_by_unique_key_returns_matching_type() {
        let facade = types_facade();
        let candidates = FuzzyTypeResolver::new(&facade).candidates().await.unwrap();

        let found = find_by_unique_key(&candidates, "ot-task").unwrap();
        assert_eq!(found.name, "Task");
        assert!(find_by_unique_key(&candidates, "ot-missing").is_none());
    }

    fn candidate(index: usize, name: &str) -> TypeCandidate {
        TypeCandidate {
            index,
            object_id: format!("type-{index}"),
            name: name.into(),
            unique_key: format!("ot-{}", name.to_lowercase()),
            space_id: None,
        }
    }

    #[rstest]
    #[case("page", "Page")]
    #[case("Not", "Note")]
    #[case("tsk", "Task")]
    #[case("1", "Note")]
    fn pick_selects_best_candidate(#[case] input: &str, #[case] expected: &str) {
        let candidates = vec![candidate(0, "Page"), candidate(1, "Note"), candidate(2, "Task")];
        assert_eq!(pick(&candidates, input).unwrap().map(|c| c.name.as_str()), Some(expected));
    }

    #[test]
    fn pick_rejects_blank_and_out_of_range_input() {
        let candidates = vec![candidate(0, "Page")];
        assert!(matches!(pick(&candidates, "  "), Err(SearchError::InvalidQuery(_))));
        assert!(matches!(pick(&candidates, "7"), Err(SearchError::InvalidQuery(_))));
    }

    #[test]
    fn pick_on_empty_listing_is_none() {
        assert!(pick(&[], "page").unwrap().is_none());
    }
}
