//! Loaded sample banks.

use alloc::boxed::Box;
use alloc::vec::Vec;

/// A sample bank already resident in sound memory.
///
/// The sequencer only needs the address table; the raw sample block is
/// kept so a channel driver can upload it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleBank {
    addresses: Box<[u32]>,
    data: Box<[u8]>,
}

impl SampleBank {
    pub fn new(addresses: Box<[u32]>, data: Box<[u8]>) -> Self {
        Self { addresses, data }
    }

    /// Build a bank with an address table and no sample data.
    pub fn from_addresses(addresses: Vec<u32>) -> Self {
        Self {
            addresses: addresses.into_boxed_slice(),
            data: Box::default(),
        }
    }

    /// Number of samples in the bank.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Device address of sample `index`.
    pub fn address(&self, index: usize) -> Option<u32> {
        self.addresses.get(index).copied()
    }

    pub fn addresses(&self) -> &[u32] {
        &self.addresses
    }

    /// Sound memory address the data block is uploaded to.
    ///
    /// Slot 0 is often an empty placeholder, so this is the first non-zero
    /// address among the first two entries.
    pub fn base_address(&self) -> Option<u32> {
        self.addresses.iter().take(2).copied().find(|&a| a != 0)
    }

    /// Raw sample data, opaque to the sequencer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn base_address_skips_empty_first_slot() {
        assert_eq!(SampleBank::from_addresses(vec![0x1010, 0x1200]).base_address(), Some(0x1010));
        assert_eq!(SampleBank::from_addresses(vec![0, 0x2000, 0x2400]).base_address(), Some(0x2000));
        assert_eq!(SampleBank::from_addresses(vec![0, 0, 0x3000]).base_address(), None);
        assert_eq!(SampleBank::default().base_address(), None);
    }
}
