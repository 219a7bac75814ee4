use std::collections::BTreeMap;

use anylink_config::AnylinkConfig;
use anylink_core::entities::{SearchQuery, SearchResult};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::{Tabular, cell, output};
use crate::progress::Progress;

#[derive(Debug, Serialize, PartialEq, Eq)]
struct SpaceRow {
    space_id: Option<String>,
    objects: usize,
    object_types: usize,
}

#[derive(Serialize)]
struct SpacesResponse {
    spaces: Vec<SpaceRow>,
}

impl Tabular for SpacesResponse {
    fn headers(&self) -> Vec<&'static str> {
        vec!["space_id", "objects", "object_types"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.spaces
            .iter()
            .map(|row| {
                vec![
                    cell(row.space_id.as_deref()),
                    row.objects.to_string(),
                    row.object_types.to_string(),
                ]
            })
            .collect()
    }
}

/// Handle `anylink spaces`.
pub async fn handle(config: &AnylinkConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let ctx = AppContext::connect(config).await?;
    let facade = ctx.facade(ctx.session().await?);

    let spinner = Progress::spinner("listing objects");
    let results = facade.search(&SearchQuery::all()).await;
    spinner.finish_clear();

    output(
        &SpacesResponse {
            spaces: summarize(&results?),
        },
        flags.format,
    )
}

fn summarize(results: &[SearchResult]) -> Vec<SpaceRow> {
    let mut counts: BTreeMap<Option<&str>, (usize, usize)> = BTreeMap::new();
    for result in results {
        let entry = counts.entry(result.space_id.as_deref()).or_default();
        entry.0 += 1;
        if result.is_object_type() {
            entry.1 += 1;
        }
    }
    counts
        .into_iter()
        .map(|(space_id, (objects, object_types))| SpaceRow {
            space_id: space_id.map(str::to_string),
            objects,
            object_types,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn result(id: &str, space: Option<&str>, layout: f64) -> SearchResult {
        let mut fields = BTreeMap::from([("layout".to_string(), serde_json::json!(layout))]);
        if let Some(space) = space {
            fields.insert("spaceId".to_string(), serde_json::json!(space));
        }
        SearchResult::from_details(id, fields, Vec::new())
    }

    #[test]
    fn counts_objects_and_types_per_space() {
        let rows = summarize(&[
            result("a", Some("space-b"), 0.0),
            result("b", Some("space-a"), 4.0),
            result("c", Some("space-b"), 4.0),
            result("d", Some("space-b"), 9.0),
            result("e", None, 0.0),
        ]);

        assert_eq!(
            rows,
            vec![
                SpaceRow {
                    space_id: None,
                    objects: 1,
                    object_types: 0,
                },
                SpaceRow {
                    space_id: Some("space-a".into()),
                    objects: 1,
                    object_types: 1,
                },
                SpaceRow {
                    space_id: Some("space-b".into()),
                    objects: 3,
                    object_types: 1,
                },
            ]
        );
    }
}
