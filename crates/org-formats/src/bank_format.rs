//! Sample bank format parser.
//!
//! Layout (little-endian): data length (u32), sample count (u32), one u32
//! device address per sample, then `data length` bytes of raw sample data.

use std::io::{self, Read, Seek, Write};

use binrw::{BinRead, BinReaderExt};
use org_ir::SampleBank;

use crate::error::Result;

#[derive(BinRead, Debug, Clone, Copy)]
#[br(little)]
struct RawBankHeader {
    data_len: u32,
    num_sfx: u32,
}

/// Read a sample bank from a stream.
pub fn read_bank<R: Read + Seek>(reader: &mut R) -> Result<SampleBank> {
    let header: RawBankHeader = reader.read_le()?;

    let mut addresses = Vec::new();
    addresses.try_reserve_exact(header.num_sfx as usize)?;
    for _ in 0..header.num_sfx {
        addresses.push(reader.read_le::<u32>()?);
    }

    let data_len = header.data_len as usize;
    let mut data = Vec::new();
    data.try_reserve_exact(data_len)?;
    // Stop at the end of the stream instead of zero-filling to the claimed length
    let read = Read::take(&mut *reader, u64::from(header.data_len)).read_to_end(&mut data)?;
    if read != data_len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("sample data holds {read} of {data_len} bytes"),
        )
        .into());
    }

    tracing::debug!(
        samples = header.num_sfx,
        data_len = header.data_len,
        "decoded sample bank"
    );

    Ok(SampleBank::new(
        addresses.into_boxed_slice(),
        data.into_boxed_slice(),
    ))
}

/// Serialize a sample bank.
pub fn write_bank<W: Write>(bank: &SampleBank, out: &mut W) -> io::Result<()> {
    out.write_all(&(bank.data().len() as u32).to_le_bytes())?;
    out.write_all(&(bank.len() as u32).to_le_bytes())?;
    for addr in bank.addresses() {
        out.write_all(&addr.to_le_bytes())?;
    }
    out.write_all(bank.data())
}
