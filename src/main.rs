use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use cnpg_dashboard::rest_api::{self, AppState};
use cnpg_dashboard::status::{self, ClusterRef, KubeSource};
use cnpg_dashboard::{
    telemetry, DashboardConfig, Error, DEFAULT_LISTEN_ADDR, DEFAULT_PROXY_URL,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Emit logs as JSON
    #[arg(long, global = true, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the REST API server
    Serve(ServeArgs),
    /// Print the status document of one database and exit
    Status(StatusArgs),
    /// Show version information
    Version,
}

#[derive(clap::Args, Debug)]
struct ProxyArgs {
    /// Kubernetes API proxy endpoint
    #[arg(long, env = "KUBERNETES_PROXY_URL", default_value = DEFAULT_PROXY_URL)]
    proxy_url: String,
}

#[derive(Parser, Debug)]
struct ServeArgs {
    #[command(flatten)]
    proxy: ProxyArgs,

    /// Address the REST API listens on
    #[arg(long, env = "DASHBOARD_LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    listen: SocketAddr,
}

impl ServeArgs {
    fn into_config(self) -> DashboardConfig {
        DashboardConfig {
            proxy_url: self.proxy.proxy_url,
            listen_addr: self.listen,
        }
    }
}

#[derive(Parser, Debug)]
struct StatusArgs {
    #[command(flatten)]
    proxy: ProxyArgs,

    /// Namespace of the cluster
    namespace: String,

    /// Name of the cluster
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    match args.command {
        Commands::Version => {
            println!("CNPG Dashboard v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Status(status_args) => {
            telemetry::init_tracing(args.log_json);
            run_status(status_args).await
        }
        Commands::Serve(serve_args) => {
            telemetry::init_tracing(args.log_json);
            run_serve(serve_args.into_config()).await
        }
    }
}

async fn run_status(args: StatusArgs) -> Result<(), Error> {
    let source = KubeSource::from_proxy_url(&args.proxy.proxy_url)?;
    let target = ClusterRef::new(args.namespace, args.name);

    let doc = status::database_status(&source, &target).await?;
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

async fn run_serve(config: DashboardConfig) -> Result<(), Error> {
    info!(
        "Starting CNPG Dashboard v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.proxy_url
    );

    let source = KubeSource::from_proxy_url(&config.proxy_url)?;
    let state = Arc::new(AppState::new(Arc::new(source)));

    rest_api::run_server(state, config.listen_addr).await
}
