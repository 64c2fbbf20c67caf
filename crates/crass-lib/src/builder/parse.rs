//! FASTA/FASTQ parsing with automatic decompression
//!
//! Reads sequencing reads from FASTA or FASTQ files, with transparent
//! gzip decompression. Bases are validated and uppercased on the way in.

use crate::read::RawRead;
use anyhow::{Context, Result};
use needletail::parse_fastx_file;
use std::path::Path;

/// Parse a FASTA/FASTQ file and call a function for each record
///
/// # Arguments
/// * `path` - Path to input file (may be gzipped)
/// * `callback` - Function called for each record, receives (id, sequence)
///
/// The id is the header up to the first whitespace.
///
/// # Errors
/// Returns error if:
/// - File cannot be opened
/// - File format is invalid
/// - The callback fails
pub fn parse_sequences<P, F>(path: P, mut callback: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnMut(&[u8], &[u8]) -> Result<()>,
{
    let path = path.as_ref();

    let mut reader = parse_fastx_file(path)
        .with_context(|| format!("Failed to open sequence file: {}", path.display()))?;

    while let Some(record) = reader.next() {
        let record = record
            .with_context(|| format!("Failed to parse sequence record in {}", path.display()))?;

        let seq = record.seq();
        callback(short_id(record.id()), &seq)?;
    }

    Ok(())
}

/// Load every record of a FASTA/FASTQ file as a [`RawRead`]
///
/// # Errors
/// Returns error if the file cannot be read or a sequence holds anything
/// other than `ACGTN` (either case).
pub fn parse_reads<P: AsRef<Path>>(path: P) -> Result<Vec<RawRead>> {
    let path = path.as_ref();
    let mut reads = Vec::new();

    parse_sequences(path, |id, seq| {
        let read = RawRead::from_record(id, seq).with_context(|| {
            format!(
                "Invalid sequence '{}' in {}",
                String::from_utf8_lossy(id),
                path.display()
            )
        })?;
        reads.push(read);
        Ok(())
    })?;

    tracing::debug!("Parsed {} reads from {}", reads.len(), path.display());
    Ok(reads)
}

fn short_id(id: &[u8]) -> &[u8] {
    let end = id
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(id.len());
    &id[..end]
}
