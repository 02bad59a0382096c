//! Region bookkeeping over the single fixed byte region.

use crate::error::{Result, VmError};
use crate::types::RegionId;

/// One carved sub-region: a fixed-capacity window with a used watermark.
#[derive(Debug)]
pub(crate) struct Region {
    pub(crate) name: String,
    pub(crate) start: usize,
    pub(crate) capacity: usize,
    pub(crate) used: usize,
}

/// The enclosing fixed-size arena.
///
/// Owns the backing bytes and the region table. Handles are table
/// indices; releasing is only permitted for the tail region, so handles
/// to earlier regions stay valid for the life of the arena.
#[derive(Debug)]
pub struct VmArena {
    data: Box<[u8]>,
    regions: Vec<Region>,
}

impl VmArena {
    /// Create an arena with the given total capacity in bytes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            regions: Vec::new(),
        }
    }

    /// Total capacity of the enclosing arena.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes not yet carved into any region.
    #[must_use]
    pub fn free_space(&self) -> usize {
        self.data.len() - self.tail_end()
    }

    /// Carve a new region of `capacity` bytes from the free space.
    ///
    /// # Errors
    /// `E001` if the free space cannot hold the region.
    pub fn carve(&mut self, name: impl Into<String>, capacity: usize) -> Result<RegionId> {
        let name = name.into();
        let available = self.free_space();
        if capacity > available {
            return Err(VmError::ArenaExhausted {
                name,
                requested: capacity,
                available,
            });
        }
        let start = self.tail_end();
        self.regions.push(Region {
            name,
            start,
            capacity,
            used: 0,
        });
        Ok(RegionId::new(self.regions.len() - 1))
    }

    /// Release a region, returning its bytes to the free space.
    ///
    /// # Errors
    /// `E005` if the region is not the most recently carved one.
    pub fn release(&mut self, id: RegionId) -> Result<()> {
        if id.index() + 1 != self.regions.len() {
            return Err(VmError::ReleaseOrder {
                name: self.region(id).name.clone(),
            });
        }
        let region = self.regions.pop();
        // Scrub so a later carve starts from zeroed bytes.
        if let Some(region) = region {
            self.data[region.start..region.start + region.capacity].fill(0);
        }
        Ok(())
    }

    /// The region's occupied size in bytes.
    #[must_use]
    pub fn used(&self, id: RegionId) -> usize {
        self.region(id).used
    }

    /// The region's fixed capacity in bytes.
    #[must_use]
    pub fn region_capacity(&self, id: RegionId) -> usize {
        self.region(id).capacity
    }

    /// The region's name.
    #[must_use]
    pub fn name(&self, id: RegionId) -> &str {
        &self.region(id).name
    }

    /// The region's occupied bytes.
    #[must_use]
    pub fn bytes(&self, id: RegionId) -> &[u8] {
        let region = self.region(id);
        &self.data[region.start..region.start + region.used]
    }

    pub(crate) fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.index()]
    }

    /// Append raw bytes to the region, checking its fixed capacity.
    pub(crate) fn append(&mut self, id: RegionId, bytes: &[u8]) -> Result<()> {
        let region = self.region(id);
        let available = region.capacity - region.used;
        if bytes.len() > available {
            return Err(VmError::RegionCapacity {
                name: region.name.clone(),
                requested: bytes.len(),
                available,
            });
        }
        let at = region.start + region.used;
        self.data[at..at + bytes.len()].copy_from_slice(bytes);
        self.regions[id.index()].used += bytes.len();
        Ok(())
    }

    /// Shrink the region's occupied span to `used` bytes.
    pub(crate) fn truncate(&mut self, id: RegionId, used: usize) {
        debug_assert!(used <= self.region(id).used);
        self.regions[id.index()].used = used;
    }

    fn tail_end(&self) -> usize {
        self.regions
            .last()
            .map_or(0, |region| region.start + region.capacity)
    }
}
