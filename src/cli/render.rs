use std::future::Future;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::client::pagination::item_range;
use crate::client::{Page, QueryParams};
use crate::errors::AdminError;
use crate::models::{Engine, Entity, Rule, Snippet, SnippetMatchedRules, Vulnerability};
use crate::store::EntityState;

const MAX_CELL_WIDTH: usize = 48;

/// A record that can be shown as one table row.
pub trait Tabular {
    const COLUMNS: &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

fn opt_id(id: Option<i64>) -> String {
    id.map(|i| i.to_string()).unwrap_or_default()
}

fn join_ids<T: Entity>(refs: Option<&Vec<T>>) -> String {
    refs.map(|r| {
        r.iter()
            .filter_map(|e| e.id())
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(",")
    })
    .unwrap_or_default()
}

impl Tabular for Engine {
    const COLUMNS: &'static [&'static str] = &["ID", "Name"];

    fn row(&self) -> Vec<String> {
        vec![opt_id(self.id), self.name.clone().unwrap_or_default()]
    }
}

impl Tabular for Vulnerability {
    const COLUMNS: &'static [&'static str] = &["ID"];

    fn row(&self) -> Vec<String> {
        vec![opt_id(self.id)]
    }
}

impl Tabular for Rule {
    const COLUMNS: &'static [&'static str] = &["ID", "Name", "Raw", "Engine", "Vulnerability", "Matched rules"];

    fn row(&self) -> Vec<String> {
        vec![
            opt_id(self.id),
            self.name.clone().unwrap_or_default(),
            self.raw.clone().unwrap_or_default(),
            self.engine
                .as_ref()
                .map(|e| e.name.clone().unwrap_or_else(|| opt_id(e.id)))
                .unwrap_or_default(),
            opt_id(self.vulnerability.as_ref().and_then(|v| v.id)),
            join_ids(self.snippet_matched_rules.as_ref()),
        ]
    }
}

impl Tabular for Snippet {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Hash", "Content", "Url", "Classification", "Scan count", "Matched rules"];

    fn row(&self) -> Vec<String> {
        vec![
            opt_id(self.id),
            self.hash.clone().unwrap_or_default(),
            self.content.clone().unwrap_or_default(),
            self.url.clone().unwrap_or_default(),
            self.classification().label().to_string(),
            self.scan_count.map(|c| c.to_string()).unwrap_or_default(),
            opt_id(self.matched_rules.as_ref().and_then(|m| m.id)),
        ]
    }
}

impl Tabular for SnippetMatchedRules {
    const COLUMNS: &'static [&'static str] = &["ID", "Rules", "Snippets"];

    fn row(&self) -> Vec<String> {
        vec![
            opt_id(self.id),
            self.rule_names().join(", "),
            join_ids(self.snippets.as_ref()),
        ]
    }
}

/// Single-line cell text, cut to the column limit.
fn cell(value: &str) -> String {
    let flat = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > MAX_CELL_WIDTH {
        let cut: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", cut)
    } else {
        flat
    }
}

pub fn render_table<T: Tabular>(items: &[T]) -> String {
    if items.is_empty() {
        return format!("\n  {}\n", style("No records found").dim());
    }

    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| item.row().iter().map(|v| cell(v)).collect())
        .collect();
    let mut widths: Vec<usize> = T::COLUMNS.iter().map(|c| c.len()).collect();
    for row in &rows {
        for (i, value) in row.iter().enumerate() {
            widths[i] = widths[i].max(value.chars().count());
        }
    }

    let mut out = String::from("\n");
    let header: Vec<String> = T::COLUMNS
        .iter()
        .zip(&widths)
        .map(|(c, w)| style(format!("{:<w$}", c, w = *w)).white().bold().to_string())
        .collect();
    out.push_str(&format!("  {}\n", header.join("  ")));
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&format!("  {}\n", style(rule.join("  ")).dim()));
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<w$}", v, w = *w))
            .collect();
        out.push_str(&format!("  {}\n", line.join("  ").trim_end()));
    }
    out
}

/// Table plus the "Showing a - b of n items" footer.
pub fn render_page<T: Tabular>(page: &Page<T>, query: &QueryParams) -> String {
    let mut out = render_table(&page.items);
    let size = query.size.unwrap_or(page.items.len().max(1) as u32);
    let (first, last) = item_range(query.page.unwrap_or(0), size, page.total_items);
    out.push_str(&format!(
        "\n  {}\n",
        style(format!("Showing {} - {} of {} items", first, last, page.total_items)).dim()
    ));
    if let Some(next) = page.links.next() {
        out.push_str(&format!("  {}\n", style(format!("Next page: --page {}", next)).dim()));
    }
    out
}

pub fn render_detail<T: Entity + Tabular>(entity: &T) -> String {
    let mut out = format!("\n  {}\n\n", style(T::NAME).cyan().bold());
    let width = T::COLUMNS.iter().map(|c| c.len()).max().unwrap_or(0) + 1;
    for (column, value) in T::COLUMNS.iter().zip(entity.row()) {
        out.push_str(&format!(
            "  {} {}\n",
            style(format!("{:<w$}", format!("{}:", column), w = width)).dim(),
            value
        ));
    }
    out
}

/// Status flags of one slice, as the shell's `state` command shows them.
pub fn render_state<T: Entity>(state: &EntityState<T>) -> String {
    let flag = |on: bool| {
        if on {
            style("yes").green().to_string()
        } else {
            style("no").dim().to_string()
        }
    };
    let error = match &state.error_message {
        Some(msg) => style(msg.as_str()).red().to_string(),
        None => style("none").dim().to_string(),
    };
    let entity = state
        .entity
        .id()
        .map(|id| format!("{} {}", T::NAME, id))
        .unwrap_or_else(|| "none".into());
    format!(
        "\n  {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n",
        style(T::NAME).cyan().bold(),
        style("Loading:       ").dim(),
        flag(state.loading),
        style("Updating:      ").dim(),
        flag(state.updating),
        style("Update success:").dim(),
        flag(state.update_success),
        style("Entities:      ").dim(),
        state.entities.len(),
        style("Total items:   ").dim(),
        state.total_items,
        style("Entity:        ").dim(),
        entity,
        style("Error:         ").dim(),
        error,
    )
}

/// Outcome of checking a stored snippet hash against its content.
pub fn render_hash_check(id: i64, stored: Option<&str>, computed: &str, matches: bool) -> String {
    if matches {
        return render_success(&format!("snippet {} hash matches its content", id));
    }
    format!(
        "{}
  {} {}
  {} {}",
        render_error(&format!("snippet {} hash does not match its content", id)),
        style("Stored:  ").dim(),
        stored.unwrap_or("<none>"),
        style("Computed:").dim(),
        computed,
    )
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AdminError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_error(msg: &str) -> String {
    format!("{} {}", style("✗").red(), style(msg).red())
}

pub fn render_success(msg: &str) -> String {
    format!("{} {}", style("✓").green(), msg)
}

pub fn render_info(msg: &str) -> String {
    format!("{}", style(msg).dim())
}

/// Where command results go: styled tables or raw JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn page<T: Tabular + Serialize>(&self, page: &Page<T>, query: &QueryParams) -> Result<(), AdminError> {
        if self.json {
            println!("{}", render_json(&page.items)?);
        } else {
            print!("{}", render_page(page, query));
        }
        Ok(())
    }

    pub fn entity<T: Entity + Tabular>(&self, entity: &T) -> Result<(), AdminError> {
        if self.json {
            println!("{}", render_json(entity)?);
        } else {
            print!("{}", render_detail(entity));
        }
        Ok(())
    }

    /// A saved record: its detail view after a confirmation line.
    pub fn saved<T: Entity + Tabular>(&self, verb: &str, entity: &T) -> Result<(), AdminError> {
        if !self.json && !self.quiet {
            let id = entity.id().map(|i| i.to_string()).unwrap_or_default();
            println!("{}", render_success(&format!("{} {} {}", verb, T::NAME, id)));
        }
        self.entity(entity)
    }

    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{}", render_success(msg));
    }

    pub fn info(&self, msg: &str) {
        if self.json || self.quiet {
            return;
        }
        println!("{}", render_info(msg));
    }

    /// Await `request` behind a spinner on stderr. Hidden in quiet/JSON mode.
    pub async fn with_spinner<F, R>(&self, msg: impl Into<String>, request: F) -> R
    where
        F: Future<Output = R>,
    {
        if self.json || self.quiet {
            return request.await;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
            spinner.set_style(spinner_style);
        }
        spinner.set_message(msg.into());
        spinner.enable_steady_tick(Duration::from_millis(120));
        let result = request.await;
        spinner.finish_and_clear();
        result
    }
}
