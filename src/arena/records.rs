//! Record-level primitives over carved regions.
//!
//! These are the operations the register set and the debug subsystem are
//! built from: append, remove-top, copy-whole-region, clear, and the
//! linear offset-accumulation scan that locates the n-th record. Every
//! scan is bounds-checked against the region's occupied span; a scan
//! that runs past it yields `None` rather than reading carved-but-unused
//! bytes.

use super::region::VmArena;
use crate::error::{Result, VmError};
use crate::record::{self, Record};
use crate::types::RegionId;
use std::ops::Range;

impl VmArena {
    /// Append a record to the region.
    ///
    /// # Errors
    /// `E002` if the region's fixed capacity cannot hold it.
    pub fn push_record(&mut self, id: RegionId, record: &Record) -> Result<()> {
        self.append(id, &record.to_bytes())
    }

    /// Append an already-encoded record to the region.
    ///
    /// # Errors
    /// `E004` if `bytes` is not exactly one well-formed record, `E002` on
    /// capacity.
    pub fn push_encoded(&mut self, id: RegionId, bytes: &[u8]) -> Result<()> {
        let total = record::encoded_len_at(bytes, 0)?;
        if total != bytes.len() {
            return Err(VmError::CorruptRecord {
                offset: 0,
                cause: format!("expected one record, got {} of {} bytes", total, bytes.len()),
            });
        }
        self.append(id, bytes)
    }

    /// Remove the region's top (most recently appended) record.
    ///
    /// No-op when the region is empty or its contents do not scan.
    pub fn drop_top(&mut self, id: RegionId) {
        if let Some(range) = self.top_range(id) {
            self.truncate(id, range.start);
        }
    }

    /// Clear the region to empty.
    pub fn clear(&mut self, id: RegionId) {
        self.truncate(id, 0);
    }

    /// Read the total encoded length of the record beginning at `offset`.
    ///
    /// # Errors
    /// `E003` if `offset` is past the occupied span, `E004` if the header
    /// there is invalid.
    pub fn read_len_at(&self, id: RegionId, offset: usize) -> Result<usize> {
        let used = self.used(id);
        if offset >= used {
            return Err(VmError::InvalidOffset {
                name: self.name(id).to_string(),
                offset,
                cause: format!("past occupied span of {} bytes", used),
            });
        }
        record::encoded_len_at(self.bytes(id), offset)
    }

    /// Byte range of the n-th record, by linear offset accumulation from
    /// the start of the region.
    ///
    /// Returns `None` when `n` is out of range or a header along the way
    /// is corrupt; callers treat both as a bounds violation, never as a
    /// readable offset.
    #[must_use]
    pub fn record_range(&self, id: RegionId, n: usize) -> Option<Range<usize>> {
        let bytes = self.bytes(id);
        let mut offset = 0;
        for _ in 0..n {
            offset += record::encoded_len_at(bytes, offset).ok()?;
        }
        if offset >= bytes.len() {
            return None;
        }
        let total = record::encoded_len_at(bytes, offset).ok()?;
        Some(offset..offset + total)
    }

    /// Byte range of the region's top record.
    #[must_use]
    pub fn top_range(&self, id: RegionId) -> Option<Range<usize>> {
        let bytes = self.bytes(id);
        let mut offset = 0;
        let mut last = None;
        while offset < bytes.len() {
            let total = record::encoded_len_at(bytes, offset).ok()?;
            last = Some(offset..offset + total);
            offset += total;
        }
        last
    }

    /// Number of well-formed records in the region.
    #[must_use]
    pub fn record_count(&self, id: RegionId) -> usize {
        let bytes = self.bytes(id);
        let mut offset = 0;
        let mut count = 0;
        while offset < bytes.len() {
            match record::encoded_len_at(bytes, offset) {
                Ok(total) => {
                    offset += total;
                    count += 1;
                }
                Err(_) => break,
            }
        }
        count
    }

    /// Decode all of the region's records.
    ///
    /// # Errors
    /// `E004` if the region's contents do not scan as records.
    pub fn records(&self, id: RegionId) -> Result<Vec<Record>> {
        Record::parse_all(self.bytes(id))
    }

    /// Copy the region's entire contents into `dst` as one nested bundle
    /// record. `src` is left untouched.
    ///
    /// # Errors
    /// `E002` if `dst` cannot hold the bundle.
    pub fn copy_as_bundle(&mut self, src: RegionId, dst: RegionId) -> Result<()> {
        let bundle = Record::bundle_from_encoded(self.bytes(src).to_vec());
        self.push_record(dst, &bundle)
    }

    /// Move the region's top record into `dst`, wrapped as a single-child
    /// bundle. No-op when `src` is empty. On capacity failure `src` is
    /// left untouched.
    ///
    /// # Errors
    /// `E002` if `dst` cannot hold the bundle.
    pub fn move_top_as_bundle(&mut self, src: RegionId, dst: RegionId) -> Result<()> {
        let Some(range) = self.top_range(src) else {
            return Ok(());
        };
        let bundle = Record::bundle_from_encoded(self.bytes(src)[range.clone()].to_vec());
        self.push_record(dst, &bundle)?;
        self.truncate(src, range.start);
        Ok(())
    }

    /// Pop the top record of `src` and replace `dst`'s contents with it:
    /// a bundle is unpacked into `dst`, anything else becomes `dst`'s
    /// sole record.
    ///
    /// # Errors
    /// `E003` if `src` is empty, `E004` if the top record is malformed,
    /// `E002` if `dst` cannot hold the contents.
    pub fn restore_from_top(&mut self, src: RegionId, dst: RegionId) -> Result<()> {
        let range = self.top_range(src).ok_or_else(|| VmError::InvalidOffset {
            name: self.name(src).to_string(),
            offset: 0,
            cause: "no record to restore from".to_string(),
        })?;
        let bytes = self.bytes(src)[range.clone()].to_vec();
        let (top, _) = Record::parse(&bytes)?;
        let contents = match top.kind() {
            crate::record::RecordKind::Bundle => top.payload().to_vec(),
            _ => bytes,
        };
        self.clear(dst);
        self.append(dst, &contents)?;
        self.truncate(src, range.start);
        Ok(())
    }

    /// Collapse all of the region's records into a single bundle record
    /// holding them in order. An empty region becomes one empty bundle.
    ///
    /// # Errors
    /// `E002` if the region cannot hold the added framing.
    pub fn collapse_all(&mut self, id: RegionId) -> Result<()> {
        let payload = self.bytes(id).to_vec();
        let bundle = Record::bundle_from_encoded(payload);
        let available = self.region_capacity(id);
        if bundle.encoded_len() > available {
            return Err(VmError::RegionCapacity {
                name: self.name(id).to_string(),
                requested: bundle.encoded_len(),
                available,
            });
        }
        self.clear(id);
        self.push_record(id, &bundle)
    }

    /// If the region's top record is a bundle with at least one child,
    /// remove the bundle's last child and re-push it as a top-level
    /// record above the shrunk bundle. Otherwise no-op.
    ///
    /// The occupied size is unchanged by the split.
    ///
    /// # Errors
    /// `E004` if the bundle payload does not scan as records.
    pub fn split_top_bundle(&mut self, id: RegionId) -> Result<()> {
        let Some(range) = self.top_range(id) else {
            return Ok(());
        };
        let bytes = self.bytes(id)[range.clone()].to_vec();
        let (top, _) = Record::parse(&bytes)?;
        if top.kind() != crate::record::RecordKind::Bundle || top.payload().is_empty() {
            return Ok(());
        }
        let payload = top.payload();
        let mut offset = 0;
        let mut last = 0;
        while offset < payload.len() {
            last = offset;
            offset += record::encoded_len_at(payload, offset)?;
        }
        let shrunk = Record::bundle_from_encoded(payload[..last].to_vec());
        let child = payload[last..].to_vec();
        self.truncate(id, range.start);
        self.push_record(id, &shrunk)?;
        self.push_encoded(id, &child)
    }

    /// Replace the record occupying `range` with an already-encoded one,
    /// preserving the position of every other record.
    ///
    /// # Errors
    /// `E002` if the region cannot hold the size difference.
    pub fn replace_record(
        &mut self,
        id: RegionId,
        range: Range<usize>,
        bytes: &[u8],
    ) -> Result<()> {
        let used = self.used(id);
        let new_used = used - range.len() + bytes.len();
        let available = self.region_capacity(id);
        if new_used > available {
            return Err(VmError::RegionCapacity {
                name: self.name(id).to_string(),
                requested: new_used,
                available,
            });
        }
        let mut contents = self.bytes(id).to_vec();
        contents.splice(range, bytes.iter().copied());
        self.clear(id);
        self.append(id, &contents)
    }
}
