use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::thread;
use thiserror::Error;
use tracing::info;

#[derive(Parser, Debug, Clone)]
pub struct CommandLineArgs {
    /// Optional YAML config file. Command line flags override its values.
    #[arg(long, short)]
    pub config: Option<String>,
    /// Number of threads per process in the parallel region.
    #[arg(long, short)]
    pub threads: Option<u32>,
    /// Number of processes in the execution group. Ignored by the threaded greeter.
    #[arg(long, short)]
    pub processes: Option<u32>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to open config file at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid value for {field}: {value}, must be at least 1")]
    InvalidValue { field: &'static str, value: u32 },
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    group: Group,
    #[serde(default)]
    region: Region,
    #[serde(default)]
    output: Output,
}

impl Config {
    pub fn from_file(path: &PathBuf) -> Result<Config, ConfigError> {
        let file = File::open(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            source: e,
        })
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn set_num_processes(&mut self, num_processes: u32) {
        self.group.num_processes = num_processes;
    }

    pub fn set_num_threads(&mut self, num_threads: u32) {
        self.region.num_threads = num_threads;
    }

    pub fn set_output(&mut self, output: Output) {
        self.output = output;
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.group.num_processes < 1 {
            return Err(ConfigError::InvalidValue {
                field: "group.num_processes",
                value: self.group.num_processes,
            });
        }
        if self.region.num_threads < 1 {
            return Err(ConfigError::InvalidValue {
                field: "region.num_threads",
                value: self.region.num_threads,
            });
        }
        Ok(())
    }
}

impl TryFrom<CommandLineArgs> for Config {
    type Error = ConfigError;

    fn try_from(args: CommandLineArgs) -> Result<Self, Self::Error> {
        let mut config = match &args.config {
            Some(path) => {
                let path = PathBuf::from(path);
                info!("Loading config from {path:?}");
                Config::from_file(&path)?
            }
            None => Config::default(),
        };
        if let Some(threads) = args.threads {
            config.set_num_threads(threads);
        }
        if let Some(processes) = args.processes {
            config.set_num_processes(processes);
        }
        config.validate()?;
        Ok(config)
    }
}

/// The distributed execution group. Membership is fixed for the whole run.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Group {
    #[serde(default = "default_num_processes")]
    pub num_processes: u32,
}

impl Default for Group {
    fn default() -> Self {
        Group {
            num_processes: default_num_processes(),
        }
    }
}

/// The parallel region entered by each group member.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Region {
    #[serde(default = "default_num_threads")]
    pub num_threads: u32,
}

impl Default for Region {
    fn default() -> Self {
        Region {
            num_threads: default_num_threads(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Output {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Output {
    fn default() -> Self {
        Output {
            output_dir: default_output_dir(),
            logging: Logging::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub enum Logging {
    Info,
    #[default]
    None,
}

fn default_num_processes() -> u32 {
    1
}

fn default_num_threads() -> u32 {
    thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(config: Option<String>, threads: Option<u32>, processes: Option<u32>) -> CommandLineArgs {
        CommandLineArgs {
            config,
            threads,
            processes,
        }
    }

    #[test]
    fn defaults() {
        let config = Config::try_from(args(None, None, None)).unwrap();
        assert_eq!(config.group().num_processes, 1);
        assert!(config.region().num_threads >= 1);
        assert_eq!(config.output().logging, Logging::None);
    }

    #[test]
    fn command_line_overrides() {
        let config = Config::try_from(args(None, Some(4), Some(2))).unwrap();
        assert_eq!(config.region().num_threads, 4);
        assert_eq!(config.group().num_processes, 2);
    }

    #[test]
    fn zero_threads_rejected() {
        let result = Config::try_from(args(None, Some(0), None));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "region.num_threads",
                ..
            })
        ));
    }

    #[test]
    fn zero_processes_rejected() {
        let result = Config::try_from(args(None, None, Some(0)));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "group.num_processes",
                ..
            })
        ));
    }

    #[test]
    fn yaml_file_with_command_line_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "group:\n  num_processes: 3\nregion:\n  num_threads: 2").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let config = Config::try_from(args(Some(path), Some(8), None)).unwrap();
        // file sets the group, command line wins for the region
        assert_eq!(config.group().num_processes, 3);
        assert_eq!(config.region().num_threads, 8);
    }

    #[test]
    fn output_section_parsed_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "output:\n  output_dir: /tmp/greeter-out\n  logging: Info"
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let config = Config::try_from(args(Some(path), None, None)).unwrap();
        assert_eq!(config.output().output_dir, PathBuf::from("/tmp/greeter-out"));
        assert_eq!(config.output().logging, Logging::Info);
        // sections not present in the file keep their defaults
        assert_eq!(config.group().num_processes, 1);
    }

    #[test]
    fn missing_file_reported() {
        let result = Config::try_from(args(Some("/no/such/greeter.yml".to_string()), None, None));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
