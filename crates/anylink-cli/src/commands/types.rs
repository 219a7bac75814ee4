use std::io::Write as _;

use anylink_auth::credential_store::TYPE_ID;
use anylink_config::AnylinkConfig;
use anylink_search::resolver::{self, FuzzyTypeResolver, TypeCandidate};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{TypesCommands, TypesPickArgs};
use crate::context::{AppContext, read_stdin_line};
use crate::output::{Tabular, cell, output};
use crate::ui;

#[derive(Serialize)]
struct TypeRow {
    #[serde(flatten)]
    candidate: TypeCandidate,
    default: bool,
}

#[derive(Serialize)]
struct TypesListResponse {
    types: Vec<TypeRow>,
}

impl Tabular for TypesListResponse {
    fn headers(&self) -> Vec<&'static str> {
        vec!["#", "name", "unique_key", "default"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.types
            .iter()
            .map(|row| {
                vec![
                    row.candidate.index.to_string(),
                    row.candidate.name.clone(),
                    row.candidate.unique_key.clone(),
                    row.default.to_string(),
                ]
            })
            .collect()
    }
}

#[derive(Serialize)]
struct TypePickResponse {
    name: String,
    unique_key: String,
    space_id: Option<String>,
    env_file: String,
}

impl Tabular for TypePickResponse {
    fn headers(&self) -> Vec<&'static str> {
        vec!["name", "unique_key", "space_id", "env_file"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.name.clone(),
            self.unique_key.clone(),
            cell(self.space_id.as_deref()),
            self.env_file.clone(),
        ]]
    }
}

/// Handle `anylink types <subcommand>`.
pub async fn handle(
    action: &TypesCommands,
    config: &AnylinkConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let ctx = AppContext::connect(config).await?;
    let facade = ctx.facade(ctx.session().await?);
    let candidates = FuzzyTypeResolver::new(&facade).candidates().await?;

    match action {
        TypesCommands::List => {
            let stored = ctx.store().load()?.default_type_key;
            let default = stored
                .as_deref()
                .and_then(|key| resolver::find_by_unique_key(&candidates, key))
                .map(|candidate| candidate.index);
            let types = candidates
                .into_iter()
                .map(|candidate| TypeRow {
                    default: default == Some(candidate.index),
                    candidate,
                })
                .collect();
            output(&TypesListResponse { types }, flags.format)
        }
        TypesCommands::Pick(args) => pick(args, &ctx, &candidates, flags).await,
    }
}

async fn pick(
    args: &TypesPickArgs,
    ctx: &AppContext,
    candidates: &[TypeCandidate],
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if candidates.is_empty() {
        anyhow::bail!("the application reported no object types");
    }

    let input = match &args.query {
        Some(query) => query.clone(),
        None => prompt(candidates).await?,
    };
    let chosen = resolver::pick(candidates, &input)?
        .ok_or_else(|| anyhow::anyhow!("no object type matches '{input}'"))?;

    let store = ctx.store();
    store.append(TYPE_ID, &chosen.unique_key)?;
    tracing::info!(unique_key = %chosen.unique_key, "default object type stored");

    output(
        &TypePickResponse {
            name: chosen.name.clone(),
            unique_key: chosen.unique_key.clone(),
            space_id: chosen.space_id.clone(),
            env_file: store.path().display().to_string(),
        },
        flags.format,
    )
}

async fn prompt(candidates: &[TypeCandidate]) -> anyhow::Result<String> {
    if !ui::prefs().interactive {
        anyhow::bail!("no type given; pass a number or name: `anylink types pick <QUERY>`");
    }

    let mut stderr = std::io::stderr();
    for candidate in candidates {
        writeln!(stderr, "  {}", candidate.label())?;
    }
    write!(stderr, "Select a type: ")?;
    stderr.flush()?;

    let line = read_stdin_line().await?.unwrap_or_default();
    Ok(line.trim().to_string())
}
