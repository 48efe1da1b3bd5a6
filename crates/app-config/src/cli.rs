use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};

use crate::{common, relay, server, task};

/// Relays video metadata and downloads from yt-dlp over HTTP,
/// falling back through several strategies when one gets blocked.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[clap(name = "tube-relay", disable_help_flag = true)]
pub struct CliArgs {
    /// Print help
    #[clap(action = ArgAction::Help, long)]
    help: Option<bool>,

    #[command(flatten)]
    pub dependency_path: common::ProgramPathConfig,

    #[command(flatten)]
    pub endpoint: common::EndpointConfig,

    #[command(flatten)]
    pub run: common::RunConfig,

    #[command(flatten)]
    pub server: server::ServerConfig,

    #[command(flatten)]
    pub relay: relay::RelayConfig,

    #[command(flatten)]
    pub task: task::TaskConfig,
}
