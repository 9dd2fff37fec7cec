//! GNU ELF hash section.
//!
//! Unlike the SysV variant, the GNU section stores no total symbol count and
//! one has to be inferred by walking a hash chain.

/// Header of a GNU hash section.
#[repr(C)]
struct ElfGnuHeader {
    nbucket: u32,
    /// Index of the first symbol covered by the hash chains.
    symoffset: u32,
    /// Bloom filter size in words.
    nbloom: u32,
    nshift: u32,
}

/// GNU `.gnu.hash` section view.
pub struct ElfGnuHash {
    header: ElfGnuHeader,
    buckets: *const u32,
    chains: *const u32,
}

impl ElfGnuHash {
    /// Parse a GNU hash section from raw memory.
    ///
    /// The bucket array follows the header and the Bloom filter words; the
    /// chain array follows the buckets.
    #[inline]
    pub fn parse(ptr: *const u8) -> ElfGnuHash {
        const HEADER_SIZE: usize = size_of::<ElfGnuHeader>();
        let mut bytes = [0u8; HEADER_SIZE];
        bytes.copy_from_slice(unsafe { core::slice::from_raw_parts(ptr, HEADER_SIZE) });
        let header: ElfGnuHeader = unsafe { core::mem::transmute(bytes) };
        let bloom_size = header.nbloom as usize * size_of::<usize>();
        let bucket_size = header.nbucket as usize * size_of::<u32>();

        let blooms = unsafe { ptr.add(HEADER_SIZE) };
        let buckets = unsafe { blooms.add(bloom_size) };
        let chains = unsafe { buckets.add(bucket_size) };
        ElfGnuHash {
            header,
            buckets: buckets.cast(),
            chains: chains.cast(),
        }
    }

    /// Get the number of symbols in the symbol table.
    ///
    /// Each bucket holds the index of the first symbol in its chain and
    /// chains cover ascending symbol indices, so the largest bucket head
    /// belongs to the chain containing the table's final entries. Walking
    /// that chain until an entry with the low bit set (the last-in-chain
    /// marker) yields one past the highest symbol index reachable from any
    /// chain, which is the entry count.
    pub fn count_syms(&self) -> usize {
        let mut last = 0u32;
        for i in 0..self.header.nbucket as usize {
            last = last.max(unsafe { self.buckets.add(i).read() });
        }
        // No chain reaches past the hashed-symbol base, so there is nothing
        // to walk and the largest head already bounds the table.
        if last < self.header.symoffset {
            return last as usize;
        }
        loop {
            let entry = unsafe {
                self.chains
                    .add((last - self.header.symoffset) as usize)
                    .read()
            };
            last += 1;
            if entry & 1 != 0 {
                break;
            }
        }
        last as usize
    }
}
