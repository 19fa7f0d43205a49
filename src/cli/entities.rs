use serde::Serialize;
use tracing::info;

use crate::errors::AdminError;
use crate::forms::{RuleForm, SnippetForm};
use crate::models::{content_hash, Engine, Entity, Rule, Snippet, Vulnerability};
use crate::store::EntitySlice;
use super::commands::{
    ContentArgs, EngineCommand, EngineFields, ListArgs, MatchedRulesCommand, RuleCommand, RuleFields,
    SnippetCommand, SnippetFields, VulnerabilityCommand,
};
use super::context::AppContext;
use super::render::{render_hash_check, Tabular};

async fn list<T: Entity + Tabular>(ctx: &AppContext, slice: &EntitySlice<T>, args: &ListArgs) -> Result<(), AdminError> {
    let query = ctx.query(args);
    let page = ctx
        .output
        .with_spinner(format!("Fetching {}", T::RESOURCE), slice.get_entities(&query))
        .await?;
    ctx.output.page(&page, &query)
}

async fn get<T: Entity + Tabular>(ctx: &AppContext, slice: &EntitySlice<T>, id: i64) -> Result<(), AdminError> {
    let entity = ctx
        .output
        .with_spinner(format!("Fetching {} {}", T::NAME, id), slice.get_entity(id))
        .await?;
    ctx.output.entity(&entity)
}

async fn delete<T: Entity>(ctx: &AppContext, slice: &EntitySlice<T>, id: i64) -> Result<(), AdminError> {
    ctx.output
        .with_spinner(format!("Deleting {} {}", T::NAME, id), slice.delete_entity(id))
        .await?;
    ctx.output.success(&format!("Deleted {} {}", T::NAME, id));
    Ok(())
}

async fn patch<T: Entity + Tabular>(ctx: &AppContext, slice: &EntitySlice<T>, entity: T) -> Result<(), AdminError> {
    let saved = ctx
        .output
        .with_spinner(format!("Updating {}", T::NAME), slice.partial_update_entity(&entity))
        .await?;
    ctx.output.saved("Updated", &saved)
}

fn nothing_to_change(entity: &str) -> AdminError {
    AdminError::Validation(format!("no {} fields given", entity))
}

/// Inline text, or the contents of a file when a path was given instead.
async fn read_text(inline: Option<String>, file: Option<String>) -> Result<Option<String>, AdminError> {
    match (inline, file) {
        (Some(text), _) => Ok(Some(text)),
        (None, Some(path)) => Ok(Some(tokio::fs::read_to_string(&path).await?)),
        (None, None) => Ok(None),
    }
}

pub async fn handle_engine(ctx: &AppContext, action: EngineCommand) -> Result<(), AdminError> {
    let slice = &ctx.store.engine;
    match action {
        EngineCommand::List(args) => list(ctx, slice, &args).await,
        EngineCommand::Get(arg) => get(ctx, slice, arg.id).await,
        EngineCommand::Create(fields) => {
            let mut form = ctx.store.open_engine_editor(None).await?;
            if let Some(name) = fields.name {
                form.name = name;
            }
            let saved = ctx.output.with_spinner("Creating engine", ctx.store.save_engine(form, true)).await?;
            ctx.output.saved("Created", &saved)
        }
        EngineCommand::Update { id, fields } => {
            let mut form = ctx.output.with_spinner("Loading engine", ctx.store.open_engine_editor(Some(id))).await?;
            if let Some(name) = fields.name {
                form.name = name;
            }
            let saved = ctx.output.with_spinner("Updating engine", ctx.store.save_engine(form, false)).await?;
            ctx.output.saved("Updated", &saved)
        }
        EngineCommand::Patch { id, fields } => patch(ctx, slice, engine_patch(id, fields)?).await,
        EngineCommand::Delete(arg) => delete(ctx, slice, arg.id).await,
    }
}

fn engine_patch(id: i64, fields: EngineFields) -> Result<Engine, AdminError> {
    if fields.name.is_none() {
        return Err(nothing_to_change("engine"));
    }
    Ok(Engine { id: Some(id), name: fields.name })
}

pub async fn handle_vulnerability(ctx: &AppContext, action: VulnerabilityCommand) -> Result<(), AdminError> {
    let slice = &ctx.store.vulnerability;
    match action {
        VulnerabilityCommand::List(args) => list(ctx, slice, &args).await,
        VulnerabilityCommand::Get(arg) => get(ctx, slice, arg.id).await,
        VulnerabilityCommand::Create => {
            slice.reset().await;
            let saved = ctx
                .output
                .with_spinner("Creating vulnerability", slice.create_entity(&Vulnerability::default()))
                .await?;
            ctx.output.saved("Created", &saved)
        }
        VulnerabilityCommand::Delete(arg) => delete(ctx, slice, arg.id).await,
    }
}

pub async fn handle_rule(ctx: &AppContext, action: RuleCommand) -> Result<(), AdminError> {
    let slice = &ctx.store.rule;
    match action {
        RuleCommand::List(args) => list(ctx, slice, &args).await,
        RuleCommand::Get(arg) => get(ctx, slice, arg.id).await,
        RuleCommand::Create(fields) => {
            let form = ctx.output.with_spinner("Loading related records", ctx.store.open_rule_editor(None)).await?;
            let form = merge_rule(form, fields).await?;
            let saved = ctx.output.with_spinner("Creating rule", ctx.store.save_rule(form, true)).await?;
            ctx.output.saved("Created", &saved)
        }
        RuleCommand::Update { id, fields } => {
            let form = ctx.output.with_spinner("Loading rule", ctx.store.open_rule_editor(Some(id))).await?;
            let form = merge_rule(form, fields).await?;
            let saved = ctx.output.with_spinner("Updating rule", ctx.store.save_rule(form, false)).await?;
            ctx.output.saved("Updated", &saved)
        }
        RuleCommand::Patch { id, fields } => patch(ctx, slice, rule_patch(id, fields).await?).await,
        RuleCommand::Delete(arg) => delete(ctx, slice, arg.id).await,
    }
}

async fn merge_rule(mut form: RuleForm, fields: RuleFields) -> Result<RuleForm, AdminError> {
    if let Some(name) = fields.name {
        form.name = name;
    }
    if let Some(raw) = read_text(fields.raw, fields.raw_file).await? {
        form.raw = raw;
    }
    if let Some(engine) = fields.engine {
        form.engine = engine;
    }
    if let Some(vulnerability) = fields.vulnerability {
        form.vulnerability = vulnerability;
    }
    if let Some(ids) = fields.matched_rules {
        form.snippet_matched_rules = ids;
    }
    Ok(form)
}

/// PATCH only carries the rule's own columns; references go through update.
async fn rule_patch(id: i64, fields: RuleFields) -> Result<Rule, AdminError> {
    if fields.engine.is_some() || fields.vulnerability.is_some() || fields.matched_rules.is_some() {
        return Err(AdminError::Validation(
            "patch changes name and raw only; use update to change references".into(),
        ));
    }
    let raw = read_text(fields.raw, fields.raw_file).await?;
    if fields.name.is_none() && raw.is_none() {
        return Err(nothing_to_change("rule"));
    }
    Ok(Rule { id: Some(id), name: fields.name, raw, ..Default::default() })
}

pub async fn handle_snippet(ctx: &AppContext, action: SnippetCommand) -> Result<(), AdminError> {
    let slice = &ctx.store.snippet;
    match action {
        SnippetCommand::List(args) => list(ctx, slice, &args).await,
        SnippetCommand::Get(arg) => get(ctx, slice, arg.id).await,
        SnippetCommand::Create(fields) => {
            let form = ctx.output.with_spinner("Loading related records", ctx.store.open_snippet_editor(None)).await?;
            let form = merge_snippet(form, fields).await?;
            let saved = ctx.output.with_spinner("Creating snippet", ctx.store.save_snippet(form, true)).await?;
            ctx.output.saved("Created", &saved)
        }
        SnippetCommand::Update { id, fields } => {
            let form = ctx.output.with_spinner("Loading snippet", ctx.store.open_snippet_editor(Some(id))).await?;
            let form = merge_snippet(form, fields).await?;
            let saved = ctx.output.with_spinner("Updating snippet", ctx.store.save_snippet(form, false)).await?;
            ctx.output.saved("Updated", &saved)
        }
        SnippetCommand::Patch { id, fields } => patch(ctx, slice, snippet_patch(id, fields).await?).await,
        SnippetCommand::Delete(arg) => delete(ctx, slice, arg.id).await,
        SnippetCommand::Hash(args) => hash(ctx, args).await,
        SnippetCommand::Verify(arg) => verify(ctx, arg.id).await,
    }
}

async fn merge_snippet(mut form: SnippetForm, fields: SnippetFields) -> Result<SnippetForm, AdminError> {
    if let Some(content) = read_text(fields.content.content, fields.content.content_file).await? {
        form.content = content;
    }
    if let Some(url) = fields.url {
        form.url = url;
    }
    if let Some(classification) = fields.classification {
        form.classification = classification;
    }
    if let Some(matched_rules) = fields.matched_rules {
        form.matched_rules = matched_rules;
    }
    Ok(form)
}

async fn snippet_patch(id: i64, fields: SnippetFields) -> Result<Snippet, AdminError> {
    if fields.matched_rules.is_some() {
        return Err(AdminError::Validation(
            "patch cannot change matched rules; use update instead".into(),
        ));
    }
    let content = read_text(fields.content.content, fields.content.content_file).await?;
    if content.is_none() && fields.url.is_none() && fields.classification.is_none() {
        return Err(nothing_to_change("snippet"));
    }
    Ok(Snippet {
        id: Some(id),
        content,
        url: fields.url,
        classification: fields.classification,
        ..Default::default()
    })
}

#[derive(Serialize)]
struct HashReport {
    hash: String,
}

async fn hash(ctx: &AppContext, args: ContentArgs) -> Result<(), AdminError> {
    let content = read_text(args.content, args.content_file)
        .await?
        .ok_or_else(|| AdminError::Validation("--content or --content-file is required".into()))?;
    let hash = content_hash(&content);
    if ctx.output.json {
        println!("{}", super::render::render_json(&HashReport { hash })?);
    } else {
        println!("{}", hash);
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyReport {
    id: i64,
    stored: Option<String>,
    computed: String,
    matches: bool,
}

async fn verify(ctx: &AppContext, id: i64) -> Result<(), AdminError> {
    let snippet = ctx
        .output
        .with_spinner(format!("Fetching snippet {}", id), ctx.store.snippet.get_entity(id))
        .await?;
    let report = VerifyReport {
        id,
        computed: content_hash(snippet.content.as_deref().unwrap_or_default()),
        matches: snippet.hash_matches(),
        stored: snippet.hash,
    };
    info!(snippet = id, matches = report.matches, "Verified snippet hash");
    if ctx.output.json {
        println!("{}", super::render::render_json(&report)?);
    } else {
        println!(
            "{}",
            render_hash_check(id, report.stored.as_deref(), &report.computed, report.matches)
        );
    }
    if report.matches {
        Ok(())
    } else {
        Err(AdminError::Validation(format!(
            "snippet {} hash {} does not match its content ({})",
            id,
            report.stored.as_deref().unwrap_or("<none>"),
            report.computed
        )))
    }
}

pub async fn handle_matched_rules(ctx: &AppContext, action: MatchedRulesCommand) -> Result<(), AdminError> {
    let slice = &ctx.store.snippet_matched_rules;
    match action {
        MatchedRulesCommand::List(args) => list(ctx, slice, &args).await,
        MatchedRulesCommand::Get(arg) => get(ctx, slice, arg.id).await,
    }
}
