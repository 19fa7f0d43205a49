use clap::{Parser, Subcommand};
use console::style;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};

use crate::errors::AdminError;
use crate::models::Entity;
use crate::store::EntitySlice;
use super::commands::{Commands, GlobalArgs, SliceName};
use super::context::AppContext;
use super::render::{render_error, render_info, render_json, render_state};

/// One line typed at the shell prompt.
#[derive(Parser)]
#[command(name = "snipptor-admin", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    #[command(flatten)]
    Admin(Commands),
    /// Show one slice's loading/updating/error status
    State {
        #[arg(value_enum)]
        slice: SliceName,
    },
    /// Reset every slice to its initial state
    Reset,
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

/// Interactive loop. Every line runs against the same store, so state
/// left by one command is visible to the next.
pub async fn run(ctx: &AppContext, global: &GlobalArgs) -> Result<(), AdminError> {
    let config = Config::builder().auto_add_history(true).build();
    let mut editor = DefaultEditor::with_config(config)
        .map_err(|e| AdminError::Internal(format!("Failed to initialize shell: {}", e)))?;

    if !ctx.output.quiet {
        println!(
            "{} {}\n{}",
            style("snipptor-admin").cyan().bold(),
            style(ctx.config.base_url()).dim(),
            render_info("Type 'help' for commands, 'exit' to leave."),
        );
    }

    loop {
        let readline = {
            // rustyline blocks the thread it runs on
            let result = tokio::task::spawn_blocking(move || {
                let prompt = format!("{} ", style("snipptor>").cyan().bold());
                let line = editor.readline(&prompt);
                (editor, line)
            })
            .await
            .map_err(|e| AdminError::Internal(format!("Readline task failed: {}", e)))?;

            editor = result.0;
            result.1
        };

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if execute(ctx, global, trimmed).await {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(err) => {
                println!("{}", render_error(&format!("Input error: {}", err)));
                break;
            }
        }
    }

    println!("{}", render_info("Goodbye."));
    Ok(())
}

/// Run one line. Returns true when the shell should exit.
async fn execute(ctx: &AppContext, global: &GlobalArgs, line: &str) -> bool {
    let words = match split_words(line) {
        Ok(words) => words,
        Err(msg) => {
            println!("{}", render_error(&msg));
            return false;
        }
    };
    let parsed = match ShellLine::try_parse_from(words) {
        Ok(parsed) => parsed,
        Err(e) => {
            // help output comes through here too
            let _ = e.print();
            return false;
        }
    };

    let result = match parsed.command {
        ShellCommand::Exit => return true,
        ShellCommand::Reset => {
            ctx.store.reset_all().await;
            ctx.output.info("All slices reset.");
            Ok(())
        }
        ShellCommand::State { slice } => match slice {
            SliceName::Engine => show_state(ctx, &ctx.store.engine).await,
            SliceName::Vulnerability => show_state(ctx, &ctx.store.vulnerability).await,
            SliceName::Rule => show_state(ctx, &ctx.store.rule).await,
            SliceName::Snippet => show_state(ctx, &ctx.store.snippet).await,
            SliceName::MatchedRules => show_state(ctx, &ctx.store.snippet_matched_rules).await,
        },
        ShellCommand::Admin(command) => super::dispatch(ctx, global, command).await,
    };

    if let Err(e) = result {
        println!("{}", render_error(&e.to_string()));
    }
    false
}

async fn show_state<T: Entity>(ctx: &AppContext, slice: &EntitySlice<T>) -> Result<(), AdminError> {
    let state = slice.snapshot().await;
    if ctx.output.json {
        println!("{}", render_json(&state)?);
    } else {
        print!("{}", render_state(&state));
    }
    Ok(())
}

/// Split a line into words. Single and double quotes group words; a
/// backslash escapes the next character outside single quotes.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    in_word = true;
                }
                None => return Err("trailing backslash".into()),
            },
            (Some(_), c) => current.push(c),
            (None, '"') | (None, '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".into());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
