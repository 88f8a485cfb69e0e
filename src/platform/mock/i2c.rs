//! Mock I2C implementation for testing

use crate::platform::{
    error::{I2cError, PlatformError},
    traits::{I2cConfig, I2cInterface},
    Result,
};
use std::collections::VecDeque;
use std::vec::Vec;

/// I2C transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cTransaction {
    /// Write transaction
    Write { addr: u8, data: Vec<u8> },
    /// Read transaction
    Read { addr: u8, len: usize },
    /// Write-Read transaction
    WriteRead {
        addr: u8,
        write_data: Vec<u8>,
        read_len: usize,
    },
}

/// Mock I2C implementation
///
/// Records all transactions for test verification and allows pre-programming
/// responses for read operations. Each queued response answers one read (or
/// write-read); an empty queue answers with zeros.
#[derive(Debug)]
pub struct MockI2c {
    config: I2cConfig,
    transactions: Vec<I2cTransaction>,
    responses: VecDeque<Vec<u8>>,
    nack: bool,
}

impl MockI2c {
    /// Create a new mock I2C
    pub fn new(config: I2cConfig) -> Self {
        Self {
            config,
            transactions: Vec::new(),
            responses: VecDeque::new(),
            nack: false,
        }
    }

    /// Get transaction log (for test verification)
    pub fn transactions(&self) -> &[I2cTransaction] {
        &self.transactions
    }

    /// Clear transaction log
    pub fn clear_transactions(&mut self) {
        self.transactions.clear();
    }

    /// Queue a response for the next read operation
    pub fn queue_response(&mut self, data: &[u8]) {
        self.responses.push_back(data.to_vec());
    }

    /// Make every subsequent transaction fail with NACK
    ///
    /// Simulates a device that is absent from the bus.
    pub fn set_nack(&mut self, nack: bool) {
        self.nack = nack;
    }

    /// Get configured frequency
    pub fn frequency(&self) -> u32 {
        self.config.frequency
    }

    fn fill(&mut self, buffer: &mut [u8]) {
        buffer.fill(0);
        if let Some(response) = self.responses.pop_front() {
            let n = response.len().min(buffer.len());
            buffer[..n].copy_from_slice(&response[..n]);
        }
    }
}

impl I2cInterface for MockI2c {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        if self.nack {
            return Err(PlatformError::I2c(I2cError::Nack));
        }
        self.transactions.push(I2cTransaction::Write {
            addr,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        if self.nack {
            return Err(PlatformError::I2c(I2cError::Nack));
        }
        self.transactions.push(I2cTransaction::Read {
            addr,
            len: buffer.len(),
        });
        self.fill(buffer);
        Ok(())
    }

    fn write_read(&mut self, addr: u8, data: &[u8], buffer: &mut [u8]) -> Result<()> {
        if self.nack {
            return Err(PlatformError::I2c(I2cError::Nack));
        }
        self.transactions.push(I2cTransaction::WriteRead {
            addr,
            write_data: data.to_vec(),
            read_len: buffer.len(),
        });
        self.fill(buffer);
        Ok(())
    }
}
