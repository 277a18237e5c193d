use clap::{Args, Parser, Subcommand};
use coverline_automation::automation::entities::{
    DeploymentEnvironment, DynamicEntityDispatcher, EntityProvider, EntityProviderConfig,
    EntitySnapshot, EntityType, InMemoryEntityStore, LabelledFormDataPrettifier,
    SerialisationSettings, SerialisedEntityFactory,
};
use coverline_automation::config::AppConfig;
use coverline_automation::error::AppError;
use coverline_automation::telemetry;
use serde_json::Value;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "Coverline Automation",
    about = "Resolve automation entity references from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve an entity provider block against a JSON store snapshot
    Resolve(ResolveArgs),
    /// List the supported entity types and their locator parameters
    EntityTypes,
}

#[derive(Args, Debug)]
struct ResolveArgs {
    /// Snapshot of the entity store (JSON)
    #[arg(long)]
    store: PathBuf,
    /// Entity provider configuration, e.g. {"claimEntity": {"claimReference": "NKHSA"}}
    #[arg(long)]
    provider: PathBuf,
    /// Tenant the automation runs for (defaults to APP_TENANT_ID)
    #[arg(long)]
    tenant: Option<Uuid>,
    /// Ambient deployment environment (defaults to APP_DEPLOYMENT_ENVIRONMENT)
    #[arg(long, value_parser = parse_environment)]
    environment: Option<DeploymentEnvironment>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Resolve(args) => run_resolve(args).await,
        Command::EntityTypes => {
            for line in entity_type_listing() {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn parse_environment(raw: &str) -> Result<DeploymentEnvironment, String> {
    DeploymentEnvironment::parse(raw).ok_or_else(|| {
        format!("unknown environment '{raw}' (expected development, staging or production)")
    })
}

async fn run_resolve(args: ResolveArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match resolve_entity(&config, &args).await {
        Ok(entity) => {
            println!("{}", serde_json::to_string_pretty(&entity)?);
            Ok(())
        }
        Err(AppError::Resolution(err)) => {
            eprintln!("{}", serde_json::to_string_pretty(&err.error_data())?);
            Err(AppError::Resolution(err))
        }
        Err(err) => Err(err),
    }
}

async fn resolve_entity(config: &AppConfig, args: &ResolveArgs) -> Result<Value, AppError> {
    let context = config
        .automation
        .context(args.tenant, args.environment)?;

    let snapshot = EntitySnapshot::from_reader(BufReader::new(File::open(&args.store)?))?;
    let store = Arc::new(InMemoryEntityStore::from_snapshot(snapshot));
    info!(records = store.len(), store = %args.store.display(), "entity store loaded");

    let factory = Arc::new(SerialisedEntityFactory::new(
        SerialisationSettings::from(&config.serialisation),
        Arc::new(LabelledFormDataPrettifier),
    )?);

    let dispatcher = DynamicEntityDispatcher::builder()
        .register_all(store.clone(), store, factory)
        .build();
    let provider = EntityProvider::new(Arc::new(dispatcher));

    let provider_config = EntityProviderConfig::parse(&fs::read_to_string(&args.provider)?)?;
    let entity = provider.resolve(&provider_config, &context).await?;
    Ok(serde_json::to_value(&entity)?)
}

fn entity_type_listing() -> Vec<String> {
    EntityType::all()
        .into_iter()
        .map(|entity_type| {
            let parameters = entity_type
                .locator_keys()
                .iter()
                .map(|key| key.parameter)
                .collect::<Vec<_>>()
                .join(", ");
            let scope = if entity_type.is_environment_scoped() {
                "environment scoped"
            } else {
                "shared across environments"
            };
            format!("{}Entity: {} ({})", entity_type.tag(), parameters, scope)
        })
        .collect()
}
