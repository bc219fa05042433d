use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use shotty_aws::{AwsProvider, AwsProviderConfig};
use shotty_core::{InstanceFilter, WaitConfig, credentials::ProfileFiles};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands {
    pub mod instances;
    pub mod snapshots;
    pub mod volumes;
}

#[derive(Parser, Debug)]
#[command(name = "shotty")]
#[command(about = "Shotty manages EC2 instances, volumes and snapshots", long_about = None)]
#[command(version)]
struct Cli {
    /// AWS credential profile to use
    #[arg(long, global = true, env = "SHOTTY_PROFILE", default_value = "shotty")]
    profile: String,

    /// AWS region (defaults to the profile's region)
    #[arg(long, global = true)]
    region: Option<String>,

    /// Seconds to wait for an instance to stop or start
    #[arg(long, global = true, default_value_t = 600)]
    wait_timeout: u64,

    /// Seconds between instance state checks while waiting
    #[arg(
        long,
        global = true,
        default_value_t = 15,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    poll_interval: u64,

    /// Log provider calls to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Commands for snapshots
    Snapshots {
        #[command(subcommand)]
        command: SnapshotsCommand,
    },
    /// Commands for volumes
    Volumes {
        #[command(subcommand)]
        command: VolumesCommand,
    },
    /// Commands for instances
    Instances {
        #[command(subcommand)]
        command: InstancesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SnapshotsCommand {
    /// List EC2 snapshots
    List {
        #[command(flatten)]
        target: TargetArgs,

        /// List all snapshots, not just up to the most recent completed one
        #[arg(long = "all")]
        list_all: bool,
    },
}

#[derive(Subcommand, Debug)]
enum VolumesCommand {
    /// List EC2 volumes
    List(TargetArgs),
}

#[derive(Subcommand, Debug)]
enum InstancesCommand {
    /// List EC2 instances
    List(TargetArgs),
    /// Stop EC2 instances
    Stop(MutateArgs),
    /// Start EC2 instances
    Start(MutateArgs),
    /// Create snapshots of volumes attached to EC2 instances
    Snapshot(MutateArgs),
    /// Reboot EC2 instances (stop, wait, start, wait)
    Reboot(MutateArgs),
}

#[derive(Args, Debug, Clone)]
struct TargetArgs {
    /// Only instances for project (tag Project:<name>)
    #[arg(long)]
    project: Option<String>,

    /// Target a specific EC2 instance by id
    #[arg(long = "instance")]
    instance_id: Option<String>,
}

impl From<TargetArgs> for InstanceFilter {
    fn from(args: TargetArgs) -> Self {
        InstanceFilter::new(args.project, args.instance_id)
    }
}

#[derive(Args, Debug, Clone)]
struct MutateArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Act on every instance when --project is not set
    #[arg(long)]
    force: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    ProfileFiles::locate().ensure_profile(&cli.profile)?;
    debug!(profile = %cli.profile, region = ?cli.region, "building provider");
    let aws = AwsProvider::new(&AwsProviderConfig {
        profile: cli.profile.clone(),
        region: cli.region.clone(),
    })
    .await;

    let wait = WaitConfig {
        poll_interval: Duration::from_secs(cli.poll_interval),
        timeout: Duration::from_secs(cli.wait_timeout),
    };

    match cli.command {
        Commands::Snapshots {
            command: SnapshotsCommand::List { target, list_all },
        } => commands::snapshots::list(&aws, &target.into(), list_all).await?,
        Commands::Volumes {
            command: VolumesCommand::List(target),
        } => commands::volumes::list(&aws, &target.into()).await?,
        Commands::Instances { command } => match command {
            InstancesCommand::List(target) => {
                commands::instances::list(&aws, &target.into()).await?
            }
            InstancesCommand::Stop(args) => {
                commands::instances::stop(&aws, &args.target.into(), args.force).await?
            }
            InstancesCommand::Start(args) => {
                commands::instances::start(&aws, &args.target.into(), args.force).await?
            }
            InstancesCommand::Snapshot(args) => {
                commands::instances::snapshot(&aws, &args.target.into(), args.force, &wait).await?
            }
            InstancesCommand::Reboot(args) => {
                commands::instances::reboot(&aws, &args.target.into(), args.force, &wait).await?
            }
        },
    }
    Ok(())
}
