// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `redstor` — manage RAID storage volumes on Redfish out-of-band
//! controllers from the command line.
//!
//! The binary is a thin surface over `redstor-volumes`: it parses the
//! operation, runs discovery and task execution, and prints the result as
//! JSON. Failures are printed as `{"failed": true, "unreachable": ...,
//! "msg": ...}` so callers can tell a host that is down from a request the
//! controller rejected.

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use redstor_core::bmc::BmcCredentials;
use redstor_core::http::ReqwestClient;
use redstor_core::http::ReqwestClientParams;
use redstor_volumes::params::EncryptionType;
use redstor_volumes::params::InitializeType;
use redstor_volumes::params::Operation;
use redstor_volumes::params::RaidType;
use redstor_volumes::params::TaskOptions;
use redstor_volumes::params::VolumeSpec;
use redstor_volumes::params::VolumeTask;
use redstor_volumes::params::VolumeType;
use redstor_volumes::schema::ApplyTime;
use redstor_volumes::Error;
use redstor_volumes::OperationResult;
use redstor_volumes::VolumeManager;
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "redstor")]
#[command(about = "Manage RAID storage volumes on Redfish out-of-band controllers", version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(flatten)]
    task: TaskArgs,

    /// Dry run: report the intended effect, perform no write.
    #[arg(long)]
    check: bool,

    /// Enable debug logging (RUST_LOG overrides).
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Redfish endpoint, e.g. https://192.168.0.120
    #[arg(long)]
    endpoint: Url,

    /// Username for HTTP basic authentication.
    #[arg(long)]
    username: String,

    /// Password, read from the environment to keep it off the process
    /// list.
    #[arg(long, env = "REDSTOR_PASSWORD", hide_env_values = true)]
    password: String,

    /// Accept self-signed controller certificates.
    #[arg(long)]
    accept_invalid_certs: bool,
}

#[derive(Args)]
struct TaskArgs {
    /// Reboot the host when the change applies on reset. Without this an
    /// on-reset change stays pending until the next out-of-band reboot.
    #[arg(long)]
    reboot_server: bool,

    /// Escalate to a forced reset when the graceful reboot fails or times
    /// out.
    #[arg(long)]
    force_reboot: bool,

    /// Wait for the submitted task to finish (pass false to
    /// fire-and-forget).
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, num_args = 1)]
    job_wait: bool,

    /// Seconds to wait for the task before giving up.
    #[arg(long, default_value_t = 1200)]
    job_wait_timeout: i64,
}

#[derive(Subcommand)]
enum Command {
    /// Create a volume, or modify one addressed by --volume-id.
    Create(CreateArgs),
    /// Delete a volume.
    Delete {
        #[arg(long)]
        volume_id: Option<String>,
    },
    /// Start initialization of a volume.
    Initialize {
        #[arg(long)]
        volume_id: Option<String>,
        #[arg(long, default_value = "Fast")]
        initialize_type: InitializeType,
    },
}

#[derive(Args)]
struct CreateArgs {
    /// Volume name.
    #[arg(long)]
    name: Option<String>,

    /// Controller to create the volume under.
    #[arg(long)]
    controller_id: Option<String>,

    /// Existing volume to modify instead of creating.
    #[arg(long)]
    volume_id: Option<String>,

    /// Drive ids backing the volume (repeat or comma-separate).
    #[arg(long, value_delimiter = ',')]
    drives: Vec<String>,

    /// RAID level (RAID0, RAID1, RAID5, RAID6, RAID10, RAID50, RAID60).
    #[arg(long)]
    raid_type: Option<RaidType>,

    /// Legacy volume type; implies a RAID level when --raid-type is not
    /// given.
    #[arg(long)]
    volume_type: Option<VolumeType>,

    #[arg(long)]
    block_size_bytes: Option<u64>,

    #[arg(long)]
    capacity_bytes: Option<u64>,

    #[arg(long)]
    optimum_io_size_bytes: Option<u64>,

    #[arg(long, num_args = 1)]
    encrypted: Option<bool>,

    /// Encryption capability (NativeDriveEncryption, ControllerAssisted,
    /// SoftwareAssisted).
    #[arg(long)]
    encryption_types: Option<EncryptionType>,

    /// Requested apply time (Immediate or OnReset); validated against what
    /// the controller supports.
    #[arg(long)]
    apply_time: Option<ApplyTime>,

    /// Vendor extension object merged into the payload, as JSON.
    #[arg(long)]
    oem: Option<String>,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "redstor=debug"
    } else {
        "redstor=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_operation(command: Command) -> Result<Operation, String> {
    match command {
        Command::Create(args) => {
            let oem = match args.oem {
                Some(raw) => serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&raw)
                    .map_err(|err| format!("--oem is not a JSON object: {err}"))?,
                None => serde_json::Map::new(),
            };
            Ok(Operation::Present(VolumeSpec {
                name: args.name,
                raid_type: args.raid_type,
                volume_type: args.volume_type,
                controller_id: args.controller_id,
                volume_id: args.volume_id,
                drives: args.drives,
                block_size_bytes: args.block_size_bytes,
                capacity_bytes: args.capacity_bytes,
                optimum_io_size_bytes: args.optimum_io_size_bytes,
                encrypted: args.encrypted,
                encryption_types: args.encryption_types,
                apply_time: args.apply_time,
                oem,
            }))
        }
        Command::Delete { volume_id } => Ok(Operation::Delete { volume_id }),
        Command::Initialize {
            volume_id,
            initialize_type,
        } => Ok(Operation::Initialize {
            volume_id,
            initialize_type,
        }),
    }
}

async fn run(cli: Cli) -> Result<OperationResult, Error<ReqwestClient>> {
    let operation = build_operation(cli.command).map_err(Error::InvalidInput)?;

    let credentials = BmcCredentials::new(cli.connection.username, cli.connection.password);
    let params =
        ReqwestClientParams::new().accept_invalid_certs(cli.connection.accept_invalid_certs);
    let client = ReqwestClient::with_params(cli.connection.endpoint, credentials, params)
        .map_err(|err| Error::Client(err.into()))?;

    let manager = VolumeManager::new(Arc::new(client));
    let ctx = manager.discover().await?;
    tracing::debug!(system = %ctx.system(), "discovered target system");

    let task = VolumeTask {
        operation,
        options: TaskOptions {
            reboot_server: cli.task.reboot_server,
            force_reboot: cli.task.force_reboot,
            job_wait: cli.task.job_wait,
            job_wait_timeout: cli.task.job_wait_timeout,
        },
        check_mode: cli.check,
    };
    manager.execute(&ctx, &task).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(result) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&result).expect("result serializes")
            );
        }
        Err(err) => {
            let unreachable = err.is_unreachable();
            let report = json!({
                "failed": true,
                "unreachable": unreachable,
                "msg": err.to_string(),
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&report).expect("report serializes")
            );
            std::process::exit(1);
        }
    }
}
