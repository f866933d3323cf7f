use std::path::Path;
use std::{fs, io};

use serde::{Deserialize, Serialize};

use crate::state::KnownTitle;
use crate::transport::region::DEFAULT_CAPACITY;
use crate::transport::stream::DEFAULT_WRITE_TIMEOUT_MS;
use crate::wire::MAX_GRID_FRAME_LEN;

/// File looked up next to the host executable.
pub const CONFIG_FILE_NAME: &str = "lightshim.yaml";
/// JSON alternative, used when no YAML file is present.
pub const JSON_CONFIG_FILE_NAME: &str = "lightshim.json";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct Root {
    /// Channel used for snapshots and per-call lines.
    pub transport: Transport,
    /// Shared region used by the keyboard grid shim.
    pub region: Region,
    /// High-frequency calls dropped between two published ones.
    pub throttle: u32,
    /// Titles recognised from the executable name.
    pub titles: Vec<KnownTitle>,
    /// Default log filter, overridden by `RUST_LOG`.
    pub log_level: String,
}

impl Default for Root {
    fn default() -> Self {
        Root {
            transport: Transport::default(),
            region: Region::default(),
            throttle: 20,
            titles: KnownTitle::defaults(),
            log_level: "info".to_owned(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Name of the shared mapping.
    pub name: String,
    /// Size of the mapping in bytes.
    pub capacity: usize,
    /// Backing directory on Unix.
    pub dir: Option<String>,
}

impl Default for Region {
    fn default() -> Self {
        Region {
            name: "overwatchMmf".to_owned(),
            capacity: DEFAULT_CAPACITY,
            dir: None,
        }
    }
}

/// Delivery mode.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Transport {
    Stream {
        /// Pipe or socket name.
        name: String,
        /// Socket directory on Unix.
        #[serde(default)]
        dir: Option<String>,
        #[serde(default = "default_write_timeout", rename = "writeTimeoutMs")]
        write_timeout_ms: u64,
    },
    Region {
        name: String,
        capacity: usize,
        #[serde(default)]
        dir: Option<String>,
    },
}

impl Default for Transport {
    fn default() -> Self {
        Transport::Stream {
            name: "artemis".to_owned(),
            dir: None,
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT_MS,
        }
    }
}

impl Region {
    pub fn as_transport(&self) -> Transport {
        Transport::Region {
            name: self.name.clone(),
            capacity: self.capacity,
            dir: self.dir.clone(),
        }
    }
}

fn default_write_timeout() -> u64 {
    DEFAULT_WRITE_TIMEOUT_MS
}

impl Root {
    /// Load the configuration sitting next to the host executable, or defaults.
    pub fn for_module(module_path: &str) -> Root {
        let dir = match module_path.rfind(|c: char| c == '\\' || c == '/') {
            Some(index) => &module_path[..index],
            None => ".",
        };
        let yaml = Path::new(dir).join(CONFIG_FILE_NAME);
        let json = Path::new(dir).join(JSON_CONFIG_FILE_NAME);
        let result = if yaml.exists() {
            read_config(&yaml)
        } else if json.exists() {
            read_config(&json)
        } else {
            return Root::default();
        };
        result.unwrap_or_else(|err| {
            log::warn!("[config] ignoring config beside {}: {}", module_path, err);
            Root::default()
        })
    }
}

/// Read YAML or JSON, picked by file extension.
pub fn read_config<T: AsRef<Path>>(path: T) -> io::Result<Root> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => read_config_json(path),
        _ => read_config_yaml(path),
    }
}

pub fn read_config_yaml<T: AsRef<Path>>(path: T) -> io::Result<Root> {
    let file = fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    let root: Root = serde_yaml::from_reader(reader).map_err(|err| {
        log::error!("Error reading config file: {:?}", err);
        io::Error::from(io::ErrorKind::InvalidData)
    })?;
    check(root)
}

pub fn read_config_json<T: AsRef<Path>>(path: T) -> io::Result<Root> {
    let file = fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    let root: Root = serde_json::from_reader(reader).map_err(|err| {
        log::error!("Error reading config file: {:?}", err);
        io::Error::from(io::ErrorKind::InvalidData)
    })?;
    check(root)
}

/// Quick sanity check for the configuration.
fn check(root: Root) -> io::Result<Root> {
    let invalid = |what: String| {
        log::error!("Invalid configuration: {}", what);
        Err(io::Error::from(io::ErrorKind::InvalidData))
    };

    let (name, capacity) = match &root.transport {
        Transport::Stream { name, .. } => (name, None),
        Transport::Region { name, capacity, .. } => (name, Some(*capacity)),
    };
    if name.is_empty() {
        return invalid("transport name is empty".to_owned());
    }
    for capacity in capacity.into_iter().chain(Some(root.region.capacity)) {
        // Oversized frames are dropped whole, so a region must take any grid.
        if capacity < MAX_GRID_FRAME_LEN {
            return invalid(format!(
                "region capacity {} below {} bytes",
                capacity, MAX_GRID_FRAME_LEN
            ));
        }
    }
    if root.region.name.is_empty() {
        return invalid("region name is empty".to_owned());
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(tag: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("lightshim-config-{}-{}", tag, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn yaml_fills_in_defaults() {
        let path = scratch_file(
            "yaml",
            "transport:\n  type: region\n  name: overwatchMmf\n  capacity: 4096\nthrottle: 5\n",
        );
        let root = read_config_yaml(&path).unwrap();
        fs::remove_file(&path).unwrap();

        match root.transport {
            Transport::Region { name, capacity, dir } => {
                assert_eq!(name, "overwatchMmf");
                assert_eq!(capacity, 4096);
                assert_eq!(dir, None);
            }
            other => panic!("unexpected transport {:?}", other),
        }
        assert_eq!(root.throttle, 5);
        assert_eq!(root.titles, KnownTitle::defaults());
        assert_eq!(root.log_level, "info");
    }

    #[test]
    fn json_stream_timeout_defaults() {
        let path = scratch_file("json", r#"{"transport": {"type": "stream", "name": "artemis"}}"#);
        let root = read_config_json(&path).unwrap();
        fs::remove_file(&path).unwrap();

        match root.transport {
            Transport::Stream {
                write_timeout_ms, ..
            } => assert_eq!(write_timeout_ms, DEFAULT_WRITE_TIMEOUT_MS),
            other => panic!("unexpected transport {:?}", other),
        }
    }

    #[test]
    fn rejects_tiny_regions() {
        let path = scratch_file("tiny", "region:\n  name: r\n  capacity: 4\n");
        let err = read_config_yaml(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn rejects_regions_too_small_for_a_white_grid() {
        let path = scratch_file("short", "region:\n  name: r\n  capacity: 2000\n");
        let err = read_config_yaml(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let yaml = format!("region:\n  name: r\n  capacity: {}\n", MAX_GRID_FRAME_LEN);
        let path = scratch_file("exact", &yaml);
        let root = read_config_yaml(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(root.region.capacity, MAX_GRID_FRAME_LEN);
    }

    #[test]
    fn module_config_is_found_beside_the_executable() {
        let dir = std::env::temp_dir().join(format!("lightshim-module-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(JSON_CONFIG_FILE_NAME), r#"{"throttle": 3, "logLevel": "debug"}"#).unwrap();
        let module = dir.join("Overwatch.exe");

        let root = Root::for_module(module.to_str().unwrap());
        assert_eq!(root.throttle, 3);
        assert_eq!(root.log_level, "debug");

        fs::write(dir.join(CONFIG_FILE_NAME), "throttle: 7\n").unwrap();
        let root = Root::for_module(module.to_str().unwrap());
        assert_eq!(root.throttle, 7);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_module_config_uses_defaults() {
        let root = Root::for_module("/nonexistent/dir/game.exe");
        assert_eq!(root.throttle, 20);
        assert!(matches!(root.transport, Transport::Stream { ref name, .. } if name == "artemis"));
    }
}
