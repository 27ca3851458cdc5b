use std::sync::Arc;

use anyhow::Context as _;
use coachdesk_client::{
    default_token_path, FileTokenStore, Gateway, GatewayConfig, ResourceId, Services,
    SessionHandler,
};
use coachdesk_query::hooks::Hooks;

use super::args::*;
use super::helpers::Output;
use crate::exit_codes::SUCCESS;

pub mod auth;
pub mod exercises;
pub mod meal_demos;
pub mod plans;
pub mod policies;
pub mod reviews;
pub mod users;

/// Everything a command needs: the config, the raw services for auth and
/// the cached hooks for resources.
pub struct Context {
    pub config: GatewayConfig,
    pub services: Services,
    pub hooks: Hooks,
    pub output: Output,
}

/// Load the config file, or the environment when no file is given.
///
/// Does not validate: `coachdesk config` must be able to show a broken file.
pub fn load_config(global: &GlobalArgs) -> anyhow::Result<GatewayConfig> {
    match &global.config {
        Some(path) => GatewayConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(GatewayConfig::from_env()),
    }
}

fn show_config(config: &GatewayConfig) -> anyhow::Result<i32> {
    print!("{}", serde_yaml::to_string(config)?);
    if let Err(e) = config.validate() {
        eprintln!("warning: {e}");
    }
    Ok(SUCCESS)
}

impl Context {
    pub async fn build(config: GatewayConfig, global: &GlobalArgs) -> anyhow::Result<Self> {
        let token_path = match &config.token_path {
            Some(path) => path.clone(),
            None => default_token_path()?,
        };
        let tokens = FileTokenStore::open(token_path).await?;

        let gateway = Gateway::new(config.clone(), Arc::new(tokens), Arc::new(ConsoleSession))
            .context("failed to create gateway")?;
        let services = Services::new(gateway);
        let hooks = Hooks::new(services.clone());

        Ok(Self {
            config,
            services,
            hooks,
            output: Output { json: global.json },
        })
    }
}

/// Tells the operator to log in again after a 401.
#[derive(Debug)]
struct ConsoleSession;

impl SessionHandler for ConsoleSession {
    fn on_unauthorized(&self, login_route: &str) {
        eprintln!(
            "session expired; run `coachdesk login` (web console: {})",
            login_route
        );
    }
}

pub(crate) fn resource_id(resource: &'static str, raw: &str) -> anyhow::Result<ResourceId> {
    Ok(ResourceId::new(resource, raw)?)
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let config = load_config(&cli.global)?;
    if matches!(cli.cmd, Command::Config) {
        return show_config(&config);
    }

    let ctx = Context::build(config, &cli.global).await?;
    match cli.cmd {
        Command::Config => show_config(&ctx.config),
        Command::Login(args) => auth::login(&ctx, args).await,
        Command::Logout => auth::logout(&ctx).await,
        Command::Users(cmd) => users::run(&ctx, cmd).await,
        Command::Plans(cmd) => plans::run(&ctx, cmd).await,
        Command::Exercises(cmd) => exercises::run(&ctx, cmd).await,
        Command::MealDemos(cmd) => meal_demos::run(&ctx, cmd).await,
        Command::Policies(cmd) => policies::run(&ctx, cmd).await,
        Command::Reviews(cmd) => reviews::run(&ctx, cmd).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn write_config(dir: &tempfile::TempDir, yaml: &str) -> std::path::PathBuf {
        let path = dir.path().join("coachdesk.yaml");
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[tokio::test]
    async fn test_config_command_shows_invalid_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let token_path = dir.path().join("auth_token");
        let yaml = format!(
            "api_url: ftp://files.example.test\ntoken_path: {}\n",
            token_path.display()
        );
        let path = write_config(&dir, &yaml);
        let path = path.to_str().unwrap();

        let cli = Cli::try_parse_from(["coachdesk", "--config", path, "config"]).unwrap();
        assert_eq!(dispatch(cli).await.unwrap(), SUCCESS);

        let cli = Cli::try_parse_from(["coachdesk", "--config", path, "logout"]).unwrap();
        let err = dispatch(cli).await.unwrap_err();
        assert!(format!("{err:#}").contains("api_url must use http or https"));
    }

    #[test]
    fn test_load_config_reads_file_without_validating() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "fitness_url: not a url\ntimeout_secs: 0\n");
        let global = GlobalArgs {
            config: Some(path),
            json: false,
        };

        let config = load_config(&global).unwrap();
        assert_eq!(config.fitness_url, "not a url");
        assert_eq!(config.timeout_secs, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_missing_file_is_error() {
        let global = GlobalArgs {
            config: Some("/nonexistent/coachdesk.yaml".into()),
            json: false,
        };
        assert!(load_config(&global).is_err());
    }
}
