use std::path::PathBuf;
use std::time::Duration;

use autonet::guard::{Decision, RouteGuard};
use autonet::plate::{self, PlateFormat};
use autonet::poll::{self, PollHandle};
use autonet::resources::{Machine, Notification, Resource, ResourceClient, ResourceList, Task, Vehicle, WorkerLocation};
use autonet::types::{Credentials, OAuthCompletion, Registration, Role};
use autonet::{ApiError, AuthGateway, ClientConfig, FileStorage};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("--data must be a JSON object")]
    NotAnObject,
    #[error("not signed in")]
    NotSignedIn,
    #[error("not a valid Spanish license plate: {0}")]
    InvalidPlate(String),
    #[error("could not listen for ctrl-c: {0}")]
    Signal(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "autonet-cli", about = "AutoNet fleet management client")]
struct Cli {
    /// Overrides `AUTONET_API_URL`.
    #[arg(long)]
    api_url: Option<String>,

    #[arg(long, env = "AUTONET_SESSION_DIR", default_value = ".autonet")]
    session_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "AUTONET_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register(RegisterArgs),
    Logout,
    Whoami {
        /// Re-fetch the profile from the backend.
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },
    Heartbeat,
    #[command(subcommand)]
    Oauth(OauthCommand),
    /// Adopt a token delivered on the OAuth callback URL.
    ExchangeToken {
        token: String,
    },
    /// Check whether a navigation would render or redirect.
    Route {
        target: String,
    },
    Plate {
        value: String,
    },
    Vehicles(ResourceCommand),
    Machinery(ResourceCommand),
    Tasks(ResourceCommand),
    Notifications(ResourceCommand),
    Locations(ResourceCommand),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "AUTONET_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long, value_parser = parse_role)]
    role: Role,
    /// Name of a new organization.
    #[arg(long)]
    organization: Option<String>,
    /// Existing organization to join.
    #[arg(long)]
    organization_id: Option<i64>,
}

#[derive(Subcommand, Debug)]
enum OauthCommand {
    /// Print the Google sign-in URL.
    Url,
    /// Show the name/email the backend knows for a temp token.
    Prefill { temp_token: String },
    /// Finish a Google sign-up by choosing role and organization.
    Complete {
        temp_token: String,
        #[arg(long, value_parser = parse_role)]
        role: Role,
        #[arg(long)]
        organization: Option<String>,
        #[arg(long)]
        organization_id: Option<i64>,
    },
}

#[derive(Args, Debug)]
struct ResourceCommand {
    #[command(subcommand)]
    command: ResourceSubcommand,
}

#[derive(Subcommand, Debug)]
enum ResourceSubcommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Get {
        id: i64,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: i64,
    },
    /// Re-fetch periodically until ctrl-c.
    Watch {
        #[arg(long)]
        search: Option<String>,
        /// Defaults to `AUTONET_POLL_INTERVAL_SECS`.
        #[arg(long)]
        interval_secs: Option<u64>,
        /// Also send a heartbeat this often.
        #[arg(long)]
        heartbeat_secs: Option<u64>,
    },
}

type Gateway = AuthGateway<FileStorage>;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_string();
    }
    let gateway = AuthGateway::new(config, FileStorage::new(&cli.session_dir))?;

    match cli.command {
        Command::Login { email, password } => {
            let body = gateway.login(&Credentials { email, password }).await?;
            print_signed_in(&body);
            Ok(())
        }
        Command::Register(args) => run_register(&gateway, args).await,
        Command::Logout => {
            gateway.logout().await;
            eprintln!("signed out");
            Ok(())
        }
        Command::Whoami { refresh } => {
            let user = if refresh {
                gateway.fetch_current_user().await?
            } else {
                gateway.session().ok_or(CliError::NotSignedIn)?.user
            };
            print_json(&user)
        }
        Command::Heartbeat => {
            gateway.heartbeat().await;
            Ok(())
        }
        Command::Oauth(command) => run_oauth(&gateway, command).await,
        Command::ExchangeToken { token } => {
            let user = gateway.exchange_url_token(&token).await?;
            print_json(&user)
        }
        Command::Route { target } => {
            let guard = RouteGuard::new(gateway.store().clone());
            println!("{}", describe_decision(guard.navigate(&target)));
            Ok(())
        }
        Command::Plate { value } => {
            let format = plate::validate_plate(&value).ok_or_else(|| CliError::InvalidPlate(value.clone()))?;
            println!("{} ({})", plate::normalize_plate(&value), describe_plate(format));
            Ok(())
        }
        Command::Vehicles(cmd) => run_resource::<Vehicle>(&gateway, cmd).await,
        Command::Machinery(cmd) => run_resource::<Machine>(&gateway, cmd).await,
        Command::Tasks(cmd) => run_resource::<Task>(&gateway, cmd).await,
        Command::Notifications(cmd) => run_resource::<Notification>(&gateway, cmd).await,
        Command::Locations(cmd) => run_resource::<WorkerLocation>(&gateway, cmd).await,
    }
}

async fn run_register(gateway: &Gateway, args: RegisterArgs) -> Result<(), CliError> {
    let fields = Registration {
        name: args.name,
        email: args.email,
        password_confirmation: args.password.clone(),
        password: args.password,
        role: args.role,
        organization: args.organization,
        organization_id: args.organization_id,
    };
    let body = gateway.register(&fields).await?;
    print_signed_in(&body);
    Ok(())
}

async fn run_oauth(gateway: &Gateway, command: OauthCommand) -> Result<(), CliError> {
    match command {
        OauthCommand::Url => {
            println!("{}", gateway.oauth_redirect_url());
            Ok(())
        }
        OauthCommand::Prefill { temp_token } => {
            match gateway.fetch_oauth_registration_data(&temp_token).await {
                Some(data) => {
                    println!("name:  {}", data.name.as_deref().unwrap_or("-"));
                    println!("email: {}", data.email.as_deref().unwrap_or("-"));
                }
                None => eprintln!("no pre-fill data available"),
            }
            Ok(())
        }
        OauthCommand::Complete {
            temp_token,
            role,
            organization,
            organization_id,
        } => {
            let fields = OAuthCompletion { temp_token, role, organization, organization_id };
            let body = gateway.complete_oauth_registration(&fields).await?;
            print_signed_in(&body);
            Ok(())
        }
    }
}

async fn run_resource<T>(gateway: &Gateway, cmd: ResourceCommand) -> Result<(), CliError>
where
    T: Resource + Serialize,
{
    let client = ResourceClient::<T, FileStorage>::from_gateway(gateway);
    match cmd.command {
        ResourceSubcommand::List { search } => {
            let mut view = ResourceList::new();
            view.replace(client.list().await?);
            if let Some(search) = search {
                view.set_query(search);
            }
            print_json(&view.filtered())
        }
        ResourceSubcommand::Get { id } => print_json(&client.get(id).await?),
        ResourceSubcommand::Create { data } => {
            let fields = parse_fields(&data)?;
            print_json(&client.create(&fields).await?)
        }
        ResourceSubcommand::Update { id, data } => {
            let fields = parse_fields(&data)?;
            print_json(&client.update(id, &fields).await?)
        }
        ResourceSubcommand::Delete { id } => {
            client.delete(id).await?;
            eprintln!("{} {id} deleted", T::LABEL);
            Ok(())
        }
        ResourceSubcommand::Watch {
            search,
            interval_secs,
            heartbeat_secs,
        } => {
            let period = interval_secs.map_or(gateway.config().poll_interval, |secs| Duration::from_secs(secs.max(1)));
            let _heartbeat = heartbeat_secs.map(|secs| spawn_heartbeat(gateway.clone(), Duration::from_secs(secs.max(1))));
            watch(client, search, period).await
        }
    }
}

async fn watch<T>(client: ResourceClient<T, FileStorage>, search: Option<String>, period: Duration) -> Result<(), CliError>
where
    T: Resource + Serialize,
{
    let mut handle = poll::spawn_poller(period, move || {
        let client = client.clone();
        async move { client.list().await }
    });

    let mut view = ResourceList::new();
    if let Some(search) = search {
        view.set_query(search);
    }
    info!(resource = T::LABEL, ?period, "watching; ctrl-c to stop");

    loop {
        tokio::select! {
            next = handle.changed() => {
                let Some(items) = next else { break };
                view.replace(items);
                let shown = view.filtered();
                eprintln!("{} of {} {} record(s)", shown.len(), view.items().len(), T::LABEL);
                print_json(&shown)?;
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
        }
    }
    handle.cancel();
    Ok(())
}

fn spawn_heartbeat(gateway: Gateway, period: Duration) -> PollHandle<()> {
    poll::spawn_poller(period, move || {
        let gateway = gateway.clone();
        async move {
            gateway.heartbeat().await;
            Ok(())
        }
    })
}

fn parse_role(raw: &str) -> Result<Role, String> {
    raw.parse()
}

fn parse_fields(data: &str) -> Result<Value, CliError> {
    let value = serde_json::from_str::<Value>(data)?;
    if value.is_object() { Ok(value) } else { Err(CliError::NotAnObject) }
}

fn describe_decision(decision: Decision) -> String {
    match decision {
        Decision::Allow => "allow".to_owned(),
        Decision::Redirect(path) => format!("redirect {path}"),
    }
}

fn describe_plate(format: PlateFormat) -> &'static str {
    match format {
        PlateFormat::Current => "current series",
        PlateFormat::Provincial => "provincial series",
        PlateFormat::Special => "special vehicle",
        PlateFormat::Trailer => "trailer",
    }
}

fn print_signed_in(body: &Value) {
    let name = body
        .pointer("/user/name")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let role = body
        .pointer("/user/role")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let home = role.parse::<Role>().map_or("/", Role::home_path);
    eprintln!("signed in as {name} ({role}); home: {home}");
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
