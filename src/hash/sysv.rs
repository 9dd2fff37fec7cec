//! Traditional SysV ELF hash section.

/// Header of a SysV hash section. The two counts sit contiguously at the
/// start of the section.
#[repr(C)]
struct ElfHashHeader {
    nbucket: u32,
    nchain: u32,
}

/// SysV `.hash` section view.
pub struct ElfHash {
    header: ElfHashHeader,
}

impl ElfHash {
    /// Parse a SysV hash section from raw memory.
    #[inline]
    pub fn parse(ptr: *const u8) -> ElfHash {
        const HEADER_SIZE: usize = size_of::<ElfHashHeader>();
        let mut bytes = [0u8; HEADER_SIZE];
        bytes.copy_from_slice(unsafe { core::slice::from_raw_parts(ptr, HEADER_SIZE) });
        let header: ElfHashHeader = unsafe { core::mem::transmute(bytes) };
        ElfHash { header }
    }

    /// Get the number of symbols in the symbol table.
    ///
    /// The chain array holds one slot per symbol, so `nchain` is the total
    /// symbol count, independent of `nbucket`.
    #[inline]
    pub fn count_syms(&self) -> usize {
        self.header.nchain as usize
    }
}
