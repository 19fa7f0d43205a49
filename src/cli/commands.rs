use clap::{Args, Parser, Subcommand, ValueEnum};
use crate::models::Classification;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Parser)]
#[command(
    name = "snipptor-admin",
    version,
    long_version = LONG_VERSION,
    about = "Administration client for the Snipptor snippet scanning service"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Clone, Default)]
pub struct GlobalArgs {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Service base URL (overrides config and SNIPPTOR_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides config and SNIPPTOR_API_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Manage scanning engines
    Engine {
        #[command(subcommand)]
        action: EngineCommand,
    },
    /// Manage vulnerabilities
    Vulnerability {
        #[command(subcommand)]
        action: VulnerabilityCommand,
    },
    /// Manage detection rules
    Rule {
        #[command(subcommand)]
        action: RuleCommand,
    },
    /// Manage snippets
    Snippet {
        #[command(subcommand)]
        action: SnippetCommand,
    },
    /// Browse which rules matched which snippets (read-only)
    #[command(name = "matched-rules")]
    MatchedRules {
        #[command(subcommand)]
        action: MatchedRulesCommand,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
    /// Interactive shell sharing one store across commands
    Shell,
}

#[derive(Args, Clone, Debug, Default)]
pub struct ListArgs {
    /// Zero-based page number
    #[arg(long, default_value = "0")]
    pub page: u32,

    /// Page size (defaults to pagination.items_per_page)
    #[arg(long)]
    pub size: Option<u32>,

    /// Sort as field,direction (defaults to pagination.sort)
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct IdArg {
    /// Record id
    pub id: i64,
}

#[derive(Subcommand, Clone)]
pub enum EngineCommand {
    /// List engines
    List(ListArgs),
    /// Show one engine
    Get(IdArg),
    /// Create an engine
    Create(EngineFields),
    /// Replace an engine's fields
    Update {
        id: i64,
        #[command(flatten)]
        fields: EngineFields,
    },
    /// Change only the given fields
    Patch {
        id: i64,
        #[command(flatten)]
        fields: EngineFields,
    },
    /// Delete an engine
    Delete(IdArg),
}

#[derive(Args, Clone, Debug, Default)]
pub struct EngineFields {
    /// Engine name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Subcommand, Clone)]
pub enum VulnerabilityCommand {
    /// List vulnerabilities
    List(ListArgs),
    /// Show one vulnerability
    Get(IdArg),
    /// Create a vulnerability
    Create,
    /// Delete a vulnerability
    Delete(IdArg),
}

#[derive(Subcommand, Clone)]
pub enum RuleCommand {
    /// List rules
    List(ListArgs),
    /// Show one rule
    Get(IdArg),
    /// Create a rule
    Create(RuleFields),
    /// Edit a rule; unspecified fields keep their current values
    Update {
        id: i64,
        #[command(flatten)]
        fields: RuleFields,
    },
    /// Change only name and/or raw
    Patch {
        id: i64,
        #[command(flatten)]
        fields: RuleFields,
    },
    /// Delete a rule
    Delete(IdArg),
}

#[derive(Args, Clone, Debug, Default)]
pub struct RuleFields {
    /// Rule name
    #[arg(long)]
    pub name: Option<String>,

    /// Rule source text
    #[arg(long, conflicts_with = "raw_file")]
    pub raw: Option<String>,

    /// Read rule source from a file
    #[arg(long)]
    pub raw_file: Option<String>,

    /// Engine id ("" clears it)
    #[arg(long)]
    pub engine: Option<String>,

    /// Vulnerability id ("" clears it)
    #[arg(long)]
    pub vulnerability: Option<String>,

    /// Comma-separated snippet-matched-rules ids
    #[arg(long, value_delimiter = ',')]
    pub matched_rules: Option<Vec<String>>,
}

#[derive(Subcommand, Clone)]
pub enum SnippetCommand {
    /// List snippets
    List(ListArgs),
    /// Show one snippet
    Get(IdArg),
    /// Create a snippet
    Create(SnippetFields),
    /// Edit a snippet; unspecified fields keep their current values
    Update {
        id: i64,
        #[command(flatten)]
        fields: SnippetFields,
    },
    /// Change only the given scalar fields
    Patch {
        id: i64,
        #[command(flatten)]
        fields: SnippetFields,
    },
    /// Delete a snippet
    Delete(IdArg),
    /// Compute the content hash the service assigns
    Hash(ContentArgs),
    /// Check a stored snippet's hash against its content
    Verify(IdArg),
}

#[derive(Args, Clone, Debug, Default)]
pub struct ContentArgs {
    /// Snippet content
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,

    /// Read snippet content from a file
    #[arg(long)]
    pub content_file: Option<String>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct SnippetFields {
    #[command(flatten)]
    pub content: ContentArgs,

    /// Where the snippet was found
    #[arg(long)]
    pub url: Option<String>,

    /// UNKNOWN, SAFE, MALICIOUS or VULNERABLE
    #[arg(long)]
    pub classification: Option<Classification>,

    /// Snippet-matched-rules id ("" clears it)
    #[arg(long)]
    pub matched_rules: Option<String>,
}

#[derive(Subcommand, Clone)]
pub enum MatchedRulesCommand {
    /// List matches
    List(ListArgs),
    /// Show one match record
    Get(IdArg),
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommand {
    /// Validate a configuration file
    Validate {
        /// Config file to validate
        path: String,
    },
    /// Print the effective configuration
    Show,
}

/// Slice names accepted by the shell's `state` command.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliceName {
    Engine,
    Vulnerability,
    Rule,
    Snippet,
    MatchedRules,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rule_update() {
        let cli = Cli::try_parse_from([
            "snipptor-admin", "rule", "update", "4", "--engine", "2", "--matched-rules", "1,3", "--json",
        ])
        .unwrap();
        assert!(cli.global.json);
        match cli.command {
            Commands::Rule { action: RuleCommand::Update { id, fields } } => {
                assert_eq!(id, 4);
                assert_eq!(fields.engine.as_deref(), Some("2"));
                assert_eq!(fields.matched_rules, Some(vec!["1".to_string(), "3".to_string()]));
            }
            _ => panic!("expected rule update"),
        }
    }

    #[test]
    fn test_parse_snippet_classification() {
        let cli = Cli::try_parse_from([
            "snipptor-admin", "snippet", "create", "--content", "x", "--classification", "malicious",
        ])
        .unwrap();
        match cli.command {
            Commands::Snippet { action: SnippetCommand::Create(fields) } => {
                assert_eq!(fields.classification, Some(Classification::Malicious));
            }
            _ => panic!("expected snippet create"),
        }
    }

    #[test]
    fn test_matched_rules_has_no_delete() {
        assert!(Cli::try_parse_from(["snipptor-admin", "matched-rules", "delete", "1"]).is_err());
    }

    #[test]
    fn test_list_defaults() {
        let cli = Cli::try_parse_from(["snipptor-admin", "engine", "list"]).unwrap();
        match cli.command {
            Commands::Engine { action: EngineCommand::List(args) } => {
                assert_eq!(args.page, 0);
                assert!(args.size.is_none());
                assert!(args.sort.is_none());
            }
            _ => panic!("expected engine list"),
        }
    }
}
