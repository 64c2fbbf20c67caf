//! Reads and their repeat annotations
//!
//! A [`RawRead`] owns its normalized sequence and the [`RepeatArray`] that
//! marks where repeats sit inside it. Repeat spans are half-open `[start, end)`
//! base offsets into the read. Reads live in a [`ReadSet`]; graph nodes refer
//! back to them through [`ReadId`] handles and never own them.

use crate::encoding::{self, EncodingError};
use crate::repeat_array::{RepeatArray, Span};
use std::ops::Range;

/// Handle of a read inside a [`ReadSet`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReadId(pub usize);

/// Where a k-mer occurrence sits relative to a read's repeat annotation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KmerContext {
    /// Entirely inside one repeat
    Repeat,
    /// Entirely inside one spacer
    Spacer,
    /// Flanking sequence, or straddling a repeat/spacer boundary
    Other,
    /// The read carries no repeat annotation
    Unannotated,
}

/// A single sequencing read
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRead {
    header: String,
    seq: String,
    repeats: RepeatArray,
}

impl RawRead {
    /// Create a read from an already normalized (uppercase `ACGTN`) sequence
    pub fn new(header: impl Into<String>, seq: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            seq: seq.into(),
            repeats: RepeatArray::new(),
        }
    }

    /// Create a read from raw record bytes, validating and uppercasing the sequence
    ///
    /// # Errors
    /// Returns an [`EncodingError`] if the sequence contains non-nucleotide bytes
    pub fn from_record(header: &[u8], seq: &[u8]) -> Result<Self, EncodingError> {
        let seq = encoding::normalize_sequence(seq)?;
        Ok(Self::new(String::from_utf8_lossy(header), seq))
    }

    /// Read identifier (FASTA/FASTQ header up to the first whitespace)
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Normalized sequence
    pub fn seq(&self) -> &str {
        &self.seq
    }

    /// Sequence length in bases
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    /// Returns `true` for an empty sequence
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Repeat annotation of this read
    pub fn repeats(&self) -> &RepeatArray {
        &self.repeats
    }

    /// Mutable repeat annotation of this read
    pub fn repeats_mut(&mut self) -> &mut RepeatArray {
        &mut self.repeats
    }

    /// Successive k-mers of the read, left to right
    ///
    /// Yields nothing when the read is shorter than `k`.
    pub fn kmers(&self, k: usize) -> impl Iterator<Item = &str> + '_ {
        let count = self.kmer_count(k);
        (0..count).map(move |i| &self.seq[i..i + k])
    }

    /// Number of k-mers in the read
    pub fn kmer_count(&self, k: usize) -> usize {
        if k == 0 || self.seq.len() < k {
            0
        } else {
            self.seq.len() - k + 1
        }
    }

    /// Sequence of the `i`-th repeat
    pub fn repeat_seq(&self, i: usize) -> Option<&str> {
        let span = self.repeats.repeat(self.repeats.repeat_at(i))?;
        self.slice(span)
    }

    /// Sequence of the `i`-th spacer
    pub fn spacer_seq(&self, i: usize) -> Option<&str> {
        let span = self.repeats.spacer(self.repeats.spacer_at(i))?;
        self.slice(span)
    }

    /// Classify the k-mer starting at `pos`
    pub fn kmer_context(&self, pos: usize, k: usize) -> KmerContext {
        if self.repeats.is_empty() {
            return KmerContext::Unannotated;
        }
        let window: Range<usize> = pos..pos + k;
        if self.repeats.repeats().any(|span| span.contains_range(&window)) {
            KmerContext::Repeat
        } else if self.repeats.spacers().any(|span| span.contains_range(&window)) {
            KmerContext::Spacer
        } else {
            KmerContext::Other
        }
    }

    /// Flip the read onto the opposite strand
    ///
    /// The sequence is reverse complemented and the repeat annotation is
    /// re-anchored so every span still covers the same bases.
    pub fn reverse_complement(&mut self) {
        self.seq = encoding::reverse_complement(&self.seq);
        if let Some(final_index) = self.seq.len().checked_sub(1) {
            self.repeats.reverse_repeat_positions(final_index);
        }
    }

    fn slice(&self, span: Span) -> Option<&str> {
        self.seq.get(span.start..span.end)
    }
}

/// Owning collection of reads addressed by [`ReadId`]
#[derive(Clone, Debug, Default)]
pub struct ReadSet {
    reads: Vec<RawRead>,
}

impl ReadSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a read and return its handle
    pub fn push(&mut self, read: RawRead) -> ReadId {
        let id = ReadId(self.reads.len());
        self.reads.push(read);
        id
    }

    /// Read behind `id`
    pub fn get(&self, id: ReadId) -> Option<&RawRead> {
        self.reads.get(id.0)
    }

    /// Mutable read behind `id`
    pub fn get_mut(&mut self, id: ReadId) -> Option<&mut RawRead> {
        self.reads.get_mut(id.0)
    }

    /// Number of reads
    pub fn len(&self) -> usize {
        self.reads.len()
    }

    /// Returns `true` if the set holds no reads
    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    /// Iterate over `(handle, read)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ReadId, &RawRead)> + '_ {
        self.reads.iter().enumerate().map(|(i, r)| (ReadId(i), r))
    }

    /// Mutable iteration in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RawRead> + '_ {
        self.reads.iter_mut()
    }
}

impl FromIterator<RawRead> for ReadSet {
    fn from_iter<I: IntoIterator<Item = RawRead>>(iter: I) -> Self {
        Self {
            reads: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotated() -> RawRead {
        //                 0         1         2
        //                 0123456789012345678901234
        let mut read = RawRead::new("r1", "AAGGCCTTACGTACGAAGGCCTTCC");
        read.repeats_mut().add(0, 8);
        read.repeats_mut().add(15, 23);
        read
    }

    #[test]
    fn test_from_record_normalizes() {
        let read = RawRead::from_record(b"r1", b"acgtn").unwrap();
        assert_eq!(read.seq(), "ACGTN");
        assert_eq!(read.header(), "r1");

        assert!(RawRead::from_record(b"r2", b"AC-GT").is_err());
    }

    #[test]
    fn test_kmers() {
        let read = RawRead::new("r", "ACGTA");
        let kmers: Vec<&str> = read.kmers(3).collect();
        assert_eq!(kmers, vec!["ACG", "CGT", "GTA"]);
        assert_eq!(read.kmer_count(3), 3);

        assert_eq!(read.kmers(6).count(), 0);
        assert_eq!(read.kmers(0).count(), 0);
    }

    #[test]
    fn test_repeat_and_spacer_sequences() {
        let read = annotated();
        assert_eq!(read.repeat_seq(0), Some("AAGGCCTT"));
        assert_eq!(read.repeat_seq(1), Some("AAGGCCTT"));
        assert_eq!(read.repeat_seq(2), None);
        assert_eq!(read.spacer_seq(0), Some("ACGTACG"));
        assert_eq!(read.spacer_seq(1), None);
    }

    #[test]
    fn test_kmer_context() {
        let read = annotated();
        assert_eq!(read.kmer_context(0, 4), KmerContext::Repeat);
        assert_eq!(read.kmer_context(4, 4), KmerContext::Repeat);
        assert_eq!(read.kmer_context(6, 4), KmerContext::Other);
        assert_eq!(read.kmer_context(8, 4), KmerContext::Spacer);
        assert_eq!(read.kmer_context(21, 4), KmerContext::Other);

        let plain = RawRead::new("p", "ACGTACGT");
        assert_eq!(plain.kmer_context(0, 4), KmerContext::Unannotated);
    }

    #[test]
    fn test_reverse_complement_keeps_spans_on_same_bases() {
        let mut read = RawRead::new("r", "AAACCCGGGTT");
        read.repeats_mut().add(0, 3);
        read.repeats_mut().add(6, 9);
        let repeats_before: Vec<String> = (0..2)
            .map(|i| read.repeat_seq(i).unwrap().to_string())
            .collect();

        read.reverse_complement();

        assert_eq!(read.seq(), "AACCCGGGTTT");
        assert_eq!(read.repeats().positions(), &[2, 5, 8, 11]);
        // the first repeat is now what used to be the last, reverse complemented
        assert_eq!(
            read.repeat_seq(0).unwrap(),
            encoding::reverse_complement(&repeats_before[1])
        );
        assert_eq!(
            read.repeat_seq(1).unwrap(),
            encoding::reverse_complement(&repeats_before[0])
        );
    }

    #[test]
    fn test_reverse_complement_empty_read() {
        let mut read = RawRead::new("e", "");
        read.reverse_complement();
        assert!(read.is_empty());
    }

    #[test]
    fn test_read_set_handles() {
        let mut reads = ReadSet::new();
        let a = reads.push(RawRead::new("a", "ACGT"));
        let b = reads.push(RawRead::new("b", "TTTT"));

        assert_eq!(reads.len(), 2);
        assert_eq!(reads.get(a).unwrap().header(), "a");
        assert_eq!(reads.get(b).unwrap().seq(), "TTTT");
        assert!(reads.get(ReadId(7)).is_none());

        let ids: Vec<ReadId> = reads.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b]);
    }
}
