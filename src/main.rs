use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use okta_lookup::config::Config;
use okta_lookup::datasource::filter::{
    AppFilterInput, CompoundOperator, SearchClause, UserFilterInput,
};
use okta_lookup::datasource::{email_template, read_app_oauth, read_users, AppOauthArgs, UsersArgs};
use okta_lookup::okta::models::EmailTemplate;
use okta_lookup::okta::OktaClient;
use okta_lookup::format_okta_error;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Look up Okta applications, users and email templates
#[derive(Parser, Debug)]
#[command(name = "okta-lookup", version, about, long_about = None)]
struct Args {
    /// Okta org subdomain, e.g. dev-123456
    #[arg(long, global = true)]
    org_name: Option<String>,

    /// Okta domain appended to the org name
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Full org URL, overrides --org-name and --base-url
    #[arg(long, global = true)]
    org_url: Option<String>,

    /// Okta API token
    #[arg(long, global = true, env = "OKTA_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Log level for debugging (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "json")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read an OAuth application by ID, label or label prefix
    AppOauth(AppOauthCommand),
    /// Read users by group membership or search
    Users(UsersCommand),
    /// Manage custom email templates
    #[command(subcommand)]
    EmailTemplate(EmailTemplateCommand),
    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(clap::Args, Debug)]
struct AppOauthCommand {
    /// Application ID
    #[arg(long, conflicts_with_all = ["label", "label_prefix"])]
    id: Option<String>,

    /// Exact application label
    #[arg(long, conflicts_with_all = ["id", "label_prefix"])]
    label: Option<String>,

    /// Application label prefix
    #[arg(long, conflicts_with_all = ["id", "label"])]
    label_prefix: Option<String>,

    /// Search only ACTIVE applications
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    active_only: bool,

    /// Do not list assigned user IDs
    #[arg(long)]
    skip_users: bool,

    /// Do not list assigned group IDs
    #[arg(long)]
    skip_groups: bool,
}

#[derive(clap::Args, Debug)]
struct UsersCommand {
    /// Find users based on group membership using the id of the group
    #[arg(long, conflicts_with_all = ["search", "search_expression"])]
    group_id: Option<String>,

    /// Search clause, `name=value` or `name:comparison:value` (repeatable)
    #[arg(long)]
    search: Vec<SearchClause>,

    /// Raw search expression (repeatable)
    #[arg(long)]
    search_expression: Vec<String>,

    /// Operator used when joining multiple search clauses
    #[arg(long, default_value = "and")]
    compound_search_operator: CompoundOperator,

    /// Search only ACTIVE users
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    active_only: bool,

    /// Fetch group memberships for each user
    #[arg(long)]
    include_groups: bool,

    /// Fetch admin roles for each user
    #[arg(long)]
    include_roles: bool,

    /// Delay the read by N seconds to allow for eventual consistency
    #[arg(long)]
    delay_read_seconds: Option<String>,
}

#[derive(Subcommand, Debug)]
enum EmailTemplateCommand {
    /// Read a template
    Get { id: String },
    /// Create a template from a JSON file
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Replace a template with the contents of a JSON file
    Update {
        id: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a template
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Save --org-name, --base-url and --org-url to the config file
    Init,
    /// Print the effective configuration (credentials omitted)
    Show,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> Option<&'static str> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some("error"),
            LogLevel::Warn => Some("warn"),
            LogLevel::Info => Some("info"),
            LogLevel::Debug => Some("debug"),
            LogLevel::Trace => Some("trace"),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = match std::env::var("RUST_LOG").ok().filter(|v| !v.is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(level.directive()?),
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("okta-lookup started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("okta-lookup").join("okta-lookup.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".okta-lookup").join("okta-lookup.log");
    }
    PathBuf::from("okta-lookup.log")
}

/// Config file and environment, overridden by command-line flags
fn effective_config(args: &Args) -> Config {
    let mut config = Config::load();
    if let Some(org_name) = &args.org_name {
        config.org_name = Some(org_name.clone());
    }
    if let Some(base_url) = &args.base_url {
        config.base_url = Some(base_url.clone());
    }
    if let Some(org_url) = &args.org_url {
        config.org_url = Some(org_url.clone());
    }
    if let Some(api_token) = &args.api_token {
        config.api_token = Some(api_token.clone());
    }
    config
}

fn connect(config: &Config) -> Result<OktaClient> {
    let org_url = config.effective_org_url()?;
    let client = OktaClient::new(org_url, &config.authorization()?)?;
    tracing::info!("Using Okta org: {}", client.org_url());
    Ok(client)
}

fn emit<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", text.trim_end());
    Ok(())
}

fn read_template_file(path: &Path) -> Result<EmailTemplate> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template file {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse template file {:?}", path))
}

async fn run(args: &Args) -> Result<()> {
    let config = effective_config(args);

    match &args.command {
        Command::AppOauth(cmd) => {
            let client = connect(&config)?;
            let read_args = AppOauthArgs {
                filters: AppFilterInput {
                    id: cmd.id.clone(),
                    label: cmd.label.clone(),
                    label_prefix: cmd.label_prefix.clone(),
                    active_only: cmd.active_only,
                },
                skip_users: cmd.skip_users,
                skip_groups: cmd.skip_groups,
            };
            emit(&read_app_oauth(&client, &read_args).await?, args.output)
        }
        Command::Users(cmd) => {
            let client = connect(&config)?;
            let mut search = cmd.search.clone();
            search.extend(
                cmd.search_expression
                    .iter()
                    .cloned()
                    .map(SearchClause::Expression),
            );
            let read_args = UsersArgs {
                filters: UserFilterInput {
                    group_id: cmd.group_id.clone(),
                    search,
                    operator: cmd.compound_search_operator,
                    active_only: cmd.active_only,
                },
                include_groups: cmd.include_groups,
                include_roles: cmd.include_roles,
                delay_read_seconds: cmd.delay_read_seconds.clone(),
            };
            emit(&read_users(&client, &read_args).await?, args.output)
        }
        Command::EmailTemplate(cmd) => {
            let client = connect(&config)?;
            match cmd {
                EmailTemplateCommand::Get { id } => emit(
                    &email_template::read_email_template(&client, id).await?,
                    args.output,
                ),
                EmailTemplateCommand::Create { file } => {
                    let template = read_template_file(file)?;
                    emit(
                        &email_template::create_email_template(&client, &template).await?,
                        args.output,
                    )
                }
                EmailTemplateCommand::Update { id, file } => {
                    let template = read_template_file(file)?;
                    emit(
                        &email_template::update_email_template(&client, id, &template).await?,
                        args.output,
                    )
                }
                EmailTemplateCommand::Delete { id } => {
                    email_template::delete_email_template(&client, id).await?;
                    Ok(())
                }
            }
        }
        Command::Config(ConfigCommand::Init) => {
            config.save()?;
            if let Some(path) = Config::config_path() {
                eprintln!("Saved configuration to {}", path.display());
            }
            Ok(())
        }
        Command::Config(ConfigCommand::Show) => {
            let shown = Config {
                api_token: None,
                access_token: None,
                ..config
            };
            emit(&shown, args.output)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            match err.downcast_ref::<okta_lookup::Error>() {
                Some(okta_err) => eprintln!("Error: {}", format_okta_error(okta_err)),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}
