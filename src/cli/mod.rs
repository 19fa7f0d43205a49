pub mod commands;
pub mod context;
pub mod entities;
pub mod render;
pub mod settings;
pub mod shell;

pub use commands::{Cli, Commands, GlobalArgs};
pub use context::AppContext;

use crate::errors::AdminError;

/// Run one command against an open context. The shell itself is started
/// by the binary, never from here.
pub async fn dispatch(ctx: &AppContext, global: &GlobalArgs, command: Commands) -> Result<(), AdminError> {
    match command {
        Commands::Engine { action } => entities::handle_engine(ctx, action).await,
        Commands::Vulnerability { action } => entities::handle_vulnerability(ctx, action).await,
        Commands::Rule { action } => entities::handle_rule(ctx, action).await,
        Commands::Snippet { action } => entities::handle_snippet(ctx, action).await,
        Commands::MatchedRules { action } => entities::handle_matched_rules(ctx, action).await,
        Commands::Config { action } => settings::handle_config(global, ctx.output, action).await,
        Commands::Shell => Err(AdminError::Validation("already in the shell".into())),
    }
}
