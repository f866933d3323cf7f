use std::io;
use std::path::PathBuf;

use super::{Transport, TransportError, TransportResult};

pub const DEFAULT_CAPACITY: usize = 4096;

/// Copies each frame to offset 0 of a fixed-size shared region.
///
/// The reader creates the region; this side only ever opens it. There is no
/// locking: the last writer wins and a reader may observe a torn frame.
/// Frames larger than the capacity are rejected whole.
pub struct RegionTransport {
    name: String,
    capacity: usize,
    #[cfg_attr(windows, allow(dead_code))]
    path: PathBuf,
}

impl RegionTransport {
    /// `dir` defaults to `/dev/shm` and is ignored on Windows.
    pub fn new(name: &str, capacity: usize, dir: Option<&str>) -> RegionTransport {
        RegionTransport {
            name: name.to_owned(),
            capacity,
            path: region_path(name, dir),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn unavailable(&self, source: io::Error) -> TransportError {
        TransportError::Unavailable {
            name: self.name.clone(),
            source,
        }
    }

    #[cfg(unix)]
    fn write_region(&self, payload: &[u8]) -> TransportResult<()> {
        use std::os::unix::fs::FileExt;

        let file = std::fs::OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|err| self.unavailable(err))?;
        file.write_all_at(payload, 0)?;
        Ok(())
    }

    #[cfg(windows)]
    fn write_region(&self, payload: &[u8]) -> TransportResult<()> {
        use windows::core::HSTRING;
        use windows::Win32::Foundation::CloseHandle;
        use windows::Win32::System::Memory::{
            MapViewOfFile, OpenFileMappingW, UnmapViewOfFile, FILE_MAP_WRITE,
        };

        let name = HSTRING::from(self.name.as_str());
        let mapping = unsafe { OpenFileMappingW(FILE_MAP_WRITE.0, false, &name) }
            .map_err(|_| self.unavailable(io::Error::from(io::ErrorKind::NotFound)))?;

        let view = unsafe { MapViewOfFile(mapping, FILE_MAP_WRITE, 0, 0, self.capacity) };
        let result = if view.Value.is_null() {
            Err(self.unavailable(io::Error::last_os_error()))
        } else {
            // SAFETY: the view spans `capacity` bytes and the payload was checked against it.
            unsafe {
                std::ptr::copy_nonoverlapping(payload.as_ptr(), view.Value as *mut u8, payload.len());
                let _ = UnmapViewOfFile(view);
            }
            Ok(())
        };
        unsafe {
            let _ = CloseHandle(mapping);
        }
        result
    }
}

/// Where a region of this name lives on the current platform.
pub fn region_path(name: &str, dir: Option<&str>) -> PathBuf {
    dir.map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/dev/shm"))
        .join(name)
}

impl Transport for RegionTransport {
    fn deliver(&mut self, payload: &[u8]) -> TransportResult<()> {
        if payload.len() > self.capacity {
            return Err(TransportError::Oversized {
                len: payload.len(),
                capacity: self.capacity,
            });
        }
        self.write_region(payload)
    }
}
