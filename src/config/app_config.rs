use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;

use crate::adapters::outgoing::{DiskSegmentStore, KraftMetadataStore};
use crate::adapters::protocol::DeltaEncoding;
use crate::application::KafkaBroker;
use crate::Result;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:9092";
pub const DEFAULT_LOG_DIR: &str = "/tmp/kraft-combined-logs";

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "kraft-broker", version)]
#[command(about = "Answers Kafka metadata and fetch requests from a KRaft log directory")]
pub struct CommandLine {
    /// path to a Kafka server.properties
    pub server_properties: Option<PathBuf>,
    /// address to listen on [default: 127.0.0.1:9092]
    #[arg(long)]
    pub listen: Option<String>,
    /// Kafka log directory [default: /tmp/kraft-combined-logs]
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
    /// cluster metadata log [default: <log-dir>/__cluster_metadata-0/00000000000000000000.log]
    #[arg(long)]
    pub metadata_log: Option<PathBuf>,
    /// read record timestamp/offset deltas as varints instead of single bytes
    #[arg(long)]
    pub varint_record_deltas: bool,
    /// log level (v: info, vv: debug, vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// `key=value` pairs of a Kafka `server.properties` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerProperties {
    entries: HashMap<String, String>,
}

impl ServerProperties {
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect();
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::parse(&std::fs::read_to_string(path)?))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// First entry of `log.dirs` (or `log.dir`).
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.get("log.dirs")
            .or_else(|| self.get("log.dir"))
            .and_then(|dirs| dirs.split(',').map(str::trim).find(|dir| !dir.is_empty()))
            .map(PathBuf::from)
    }

    /// `host:port` of the first listener; an empty host binds every interface.
    pub fn listen_addr(&self) -> Option<String> {
        let listener = self.get("listeners")?.split(',').next()?.trim();
        let (_, host_port) = listener.split_once("://")?;
        match host_port.strip_prefix(':') {
            Some(port) => Some(format!("0.0.0.0:{}", port)),
            None if host_port.is_empty() => None,
            None => Some(host_port.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub listen_addr: String,
    pub log_dir: PathBuf,
    pub metadata_log: PathBuf,
    pub delta_encoding: DeltaEncoding,
    pub verbose: u8,
}

impl AppConfig {
    /// Reads `server.properties` when one is given; explicit flags win over it.
    pub fn from_command_line(commandline: CommandLine) -> Result<Self> {
        let properties = match &commandline.server_properties {
            Some(path) => ServerProperties::load(path)?,
            None => ServerProperties::default(),
        };
        Ok(Self::resolve(commandline, &properties))
    }

    pub fn resolve(commandline: CommandLine, properties: &ServerProperties) -> Self {
        let listen_addr = commandline
            .listen
            .or_else(|| properties.listen_addr())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let log_dir = commandline
            .log_dir
            .or_else(|| properties.log_dir())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));
        let metadata_log = commandline
            .metadata_log
            .unwrap_or_else(|| KraftMetadataStore::metadata_log_path(&log_dir));
        let delta_encoding = if commandline.varint_record_deltas {
            DeltaEncoding::Varint
        } else {
            DeltaEncoding::FixedByte
        };

        Self {
            listen_addr,
            log_dir,
            metadata_log,
            delta_encoding,
            verbose: commandline.verbose,
        }
    }

    /// Default `tracing` filter for the verbosity level.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Loads the metadata index and wires the broker to the log directory.
    pub async fn build_broker(&self) -> Result<KafkaBroker> {
        let index = KraftMetadataStore::new(&self.metadata_log, self.delta_encoding)
            .load()
            .await?;
        let segment_store = DiskSegmentStore::new(&self.log_dir);
        Ok(KafkaBroker::new(Arc::new(index), Box::new(segment_store)))
    }
}
