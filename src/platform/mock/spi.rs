//! Mock SPI implementation for testing

use crate::platform::{
    traits::{SpiConfig, SpiInterface},
    Result,
};
use std::collections::VecDeque;
use std::vec::Vec;

/// Mock SPI implementation
///
/// Records written bytes and answers transfers from a programmable queue.
/// An exhausted queue answers with 0xFF (idle MISO level).
#[derive(Debug)]
pub struct MockSpi {
    config: SpiConfig,
    written: Vec<u8>,
    responses: VecDeque<u8>,
}

impl MockSpi {
    /// Create a new mock SPI
    pub fn new(config: SpiConfig) -> Self {
        Self {
            config,
            written: Vec::new(),
            responses: VecDeque::new(),
        }
    }

    /// All bytes clocked out so far
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Queue bytes to be clocked in on subsequent transfers
    pub fn queue_response(&mut self, data: &[u8]) {
        self.responses.extend(data.iter().copied());
    }

    /// Get configured frequency
    pub fn frequency(&self) -> u32 {
        self.config.frequency
    }
}

impl SpiInterface for MockSpi {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.written.extend_from_slice(data);
        Ok(())
    }

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<()> {
        self.written.extend_from_slice(data);
        for byte in data.iter_mut() {
            *byte = self.responses.pop_front().unwrap_or(0xFF);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_spi_write() {
        let mut spi = MockSpi::new(SpiConfig::default());
        spi.write(&[0x40, 0x00]).unwrap();
        assert_eq!(spi.written(), &[0x40, 0x00]);
    }

    #[test]
    fn test_mock_spi_transfer() {
        let mut spi = MockSpi::new(SpiConfig::default());
        spi.queue_response(&[0x01]);

        let mut buf = [0xFF, 0xFF];
        spi.transfer_in_place(&mut buf).unwrap();
        assert_eq!(buf, [0x01, 0xFF]);
    }
}
