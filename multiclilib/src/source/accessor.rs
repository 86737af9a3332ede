//! State accessor: where reports get host state from.
//!
//! Reports never talk to the host directly. They receive a [`DeviceState`]
//! from a [`StateSource`], which makes loading a single all-or-nothing step:
//! either the whole snapshot parses, or the command fails before any output
//! is produced.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::state::DeviceState;
use crate::error::MulticliError;
use crate::Result;

/// Anything that can produce a host state snapshot.
pub trait StateSource {
    /// Load the complete state snapshot.
    fn load(&self) -> Result<DeviceState>;
}

/// Reads a JSON snapshot from a file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateSource for JsonFileSource {
    fn load(&self) -> Result<DeviceState> {
        debug!(path = %self.path.display(), "loading state snapshot");
        let file = File::open(&self.path).map_err(|source| MulticliError::StateUnavailable {
            path: self.path.clone(),
            source,
        })?;
        parse_snapshot(BufReader::new(file))
    }
}

/// Reads a JSON snapshot from an arbitrary reader (e.g. stdin).
///
/// The reader is consumed on the first load.
pub struct JsonReaderSource<R> {
    reader: std::cell::RefCell<Option<R>>,
}

impl<R: Read> JsonReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: std::cell::RefCell::new(Some(reader)),
        }
    }
}

impl<R: Read> StateSource for JsonReaderSource<R> {
    fn load(&self) -> Result<DeviceState> {
        let reader = self.reader.borrow_mut().take().ok_or_else(|| {
            MulticliError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "state reader already consumed",
            ))
        })?;
        debug!("loading state snapshot from reader");
        parse_snapshot(reader)
    }
}

/// Serves an in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    state: DeviceState,
}

impl StaticSource {
    pub fn new(state: DeviceState) -> Self {
        Self { state }
    }
}

impl StateSource for StaticSource {
    fn load(&self) -> Result<DeviceState> {
        Ok(self.state.clone())
    }
}

/// Parse a JSON snapshot, mapping any decode failure to `MalformedState`.
pub fn parse_snapshot(reader: impl Read) -> Result<DeviceState> {
    let state: DeviceState = serde_json::from_reader(reader)?;
    debug!(
        interfaces = state.interfaces.len(),
        network_instances = state.network_instances.len(),
        tunnel_interfaces = state.tunnel_interfaces.len(),
        "state snapshot loaded"
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_source_loads_snapshot() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"platform": {{"chassis_type": "7220 IXR-D2L"}}, "interfaces": [{{"name": "ethernet-1/1"}}]}}"#
        )
        .unwrap();

        let state = JsonFileSource::new(file.path()).load().unwrap();
        assert!(state.platform.is_ixr());
        assert_eq!(state.interfaces.len(), 1);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = JsonFileSource::new("/nonexistent/state.json")
            .load()
            .unwrap_err();
        assert!(matches!(err, MulticliError::StateUnavailable { .. }));
        assert!(err.to_string().contains("/nonexistent/state.json"));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = JsonReaderSource::new("{ not json".as_bytes())
            .load()
            .unwrap_err();
        assert!(matches!(err, MulticliError::MalformedState(_)));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let err = JsonReaderSource::new(r#"{"interfaces": {"name": "x"}}"#.as_bytes())
            .load()
            .unwrap_err();
        assert!(matches!(err, MulticliError::MalformedState(_)));
    }

    #[test]
    fn test_reader_source_is_single_use() {
        let source = JsonReaderSource::new("{}".as_bytes());
        assert!(source.load().is_ok());
        assert!(source.load().is_err());
    }

    #[test]
    fn test_static_source_returns_clone() {
        let state = DeviceState::default();
        let source = StaticSource::new(state.clone());
        assert_eq!(source.load().unwrap(), state);
    }
}
