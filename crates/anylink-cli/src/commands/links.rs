use std::path::Path;

use anyhow::Context;
use anylink_config::AnylinkConfig;
use anylink_search::{LinkGraphExtractor, LinkReport};
use chrono::Utc;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::LinksArgs;
use crate::context::AppContext;
use crate::output::{Tabular, cell, output};
use crate::progress::Progress;

impl Tabular for LinkReport<'_> {
    fn headers(&self) -> Vec<&'static str> {
        vec!["space", "source", "target", "kind", "evidence"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.spaces
            .iter()
            .flat_map(|space| {
                space.objects.iter().flat_map(move |object| {
                    object.edges.iter().map(move |edge| {
                        vec![
                            cell(space.space_id),
                            object.name.clone(),
                            edge.target_name.clone(),
                            edge.kind.to_string(),
                            edge.evidence.replace('\n', " "),
                        ]
                    })
                })
            })
            .collect()
    }
}

/// Handle `anylink links`.
pub async fn handle(
    args: &LinksArgs,
    config: &AnylinkConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let ctx = AppContext::connect(config).await?;
    let facade = ctx.facade(ctx.session().await?);
    let extractor = LinkGraphExtractor::new(&facade, config.search.concurrency);

    let spinner = Progress::spinner("extracting links");
    let graph = match extractor.extract().await {
        Ok(graph) => {
            spinner.finish_clear();
            graph
        }
        Err(error) => {
            spinner.finish_err("link extraction failed");
            return Err(error.into());
        }
    };

    let report = graph.report(Utc::now());
    if let Some(path) = &args.out {
        write_report(path, &report)?;
    }
    output(&report, flags.format)
}

fn write_report(path: &Path, report: &LinkReport<'_>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("failed to write link report to {}", path.display()))?;
    tracing::info!(path = %path.display(), "link report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use anylink_core::entities::SearchResult;
    use anylink_core::enums::ReferenceKind;
    use anylink_search::LinkGraph;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn object(id: &str, name: &str, space: &str) -> SearchResult {
        SearchResult::from_details(
            id,
            [
                ("name".to_string(), json!(name)),
                ("spaceId".to_string(), json!(space)),
            ]
            .into_iter()
            .collect(),
            Vec::new(),
        )
    }

    fn graph() -> LinkGraph {
        let mut graph = LinkGraph::new();
        let alpha = object("obj-a", "Alpha", "space-a");
        graph.record(&object("obj-1", "Daily", "space-a"), &alpha, "See\n[[Alpha]]", ReferenceKind::Bracket);
        graph.record(&object("obj-2", "Log", "space-b"), &alpha, "#Alpha", ReferenceKind::Hashtag);
        graph
    }

    #[test]
    fn table_rows_flatten_edges_per_space() {
        let graph = graph();
        let rows = graph.report(Utc::now()).rows();
        assert_eq!(
            rows,
            vec![
                vec!["space-a", "Daily", "Alpha", "bracket", "See [[Alpha]]"],
                vec!["space-b", "Log", "Alpha", "hashtag", "#Alpha"],
            ]
        );
    }

    #[test]
    fn report_file_is_pretty_json() {
        let dir = tempfile::TempDir::new().expect("tmp dir");
        let path = dir.path().join("links.json");

        let graph = graph();
        write_report(&path, &graph.report(Utc::now())).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["objects_with_links"], 2);
        assert_eq!(written["spaces"][1]["objects"][0]["name"], "Log");
    }
}
