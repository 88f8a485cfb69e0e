//! SD card log storage
//!
//! FAT log file on an SPI SD card via `embedded-sdmmc`. Uses the raw handle
//! API so the manager can live in a struct: every append opens the file,
//! writes one line, and closes it again, which keeps the directory entry
//! consistent even if a later cycle dies mid-write.

use super::{LogStorage, Result, StorageError};
use crate::core::record::{HEADER_COLUMNS, HEADER_UNITS};
use embedded_sdmmc::{
    BlockDevice, Mode, RawDirectory, RawVolume, TimeSource, Timestamp, VolumeIdx, VolumeManager,
};

/// Fixed FAT timestamp source
///
/// Directory-entry timestamps are metadata nobody reads back; the record
/// line carries the authoritative capture time. Wiring the RTC in here
/// would put the I2C bus inside the storage stack for no benefit.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource;

impl TimeSource for FixedTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 56, // 2026
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

/// SD card log storage
pub struct SdCardStorage<D: BlockDevice> {
    volume_mgr: VolumeManager<D, FixedTimeSource>,
    volume: Option<RawVolume>,
    filename: &'static str,
}

impl<D: BlockDevice> SdCardStorage<D> {
    /// Create storage over a block device (typically `embedded_sdmmc::SdCard`)
    ///
    /// Nothing touches the card until [`LogStorage::initialize`].
    pub fn new(block_device: D, filename: &'static str) -> Self {
        Self {
            volume_mgr: VolumeManager::new(block_device, FixedTimeSource),
            volume: None,
            filename,
        }
    }

    fn open_root(&mut self) -> Result<RawDirectory> {
        let volume = self.volume.ok_or(StorageError::NotReady)?;
        self.volume_mgr
            .open_root_dir(volume)
            .map_err(|_| StorageError::OpenFailed)
    }

    fn write_line(&mut self, dir: RawDirectory, line: &str) -> Result<()> {
        let file = self
            .volume_mgr
            .open_file_in_dir(dir, self.filename, Mode::ReadWriteCreateOrAppend)
            .map_err(|_| StorageError::OpenFailed)?;

        let result = self
            .volume_mgr
            .write(file, line.as_bytes())
            .and_then(|()| self.volume_mgr.write(file, b"\n"))
            .map_err(|_| StorageError::WriteFailed);

        // Close even after a failed write so the handle is not leaked
        let closed = self
            .volume_mgr
            .close_file(file)
            .map_err(|_| StorageError::WriteFailed);

        result.and(closed)
    }
}

impl<D: BlockDevice> LogStorage for SdCardStorage<D> {
    fn initialize(&mut self) -> Result<()> {
        let volume = self
            .volume_mgr
            .open_raw_volume(VolumeIdx(0))
            .map_err(|_| StorageError::NotReady)?;
        self.volume = Some(volume);

        let root = match self.open_root() {
            Ok(root) => root,
            Err(e) => {
                self.volume = None;
                return Err(e);
            }
        };

        // Header only on first creation; an existing log keeps its records
        let exists = self
            .volume_mgr
            .find_directory_entry(root, self.filename)
            .is_ok();
        let result = if exists {
            Ok(())
        } else {
            self.write_line(root, HEADER_COLUMNS)
                .and_then(|()| self.write_line(root, HEADER_UNITS))
        };

        let _ = self.volume_mgr.close_dir(root);
        if result.is_err() {
            self.volume = None;
            return result.map_err(|_| StorageError::NotReady);
        }
        Ok(())
    }

    fn append(&mut self, line: &str) -> Result<()> {
        let root = self.open_root()?;
        let result = self.write_line(root, line);
        let _ = self.volume_mgr.close_dir(root);
        result
    }
}
