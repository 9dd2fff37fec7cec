//! Linear scan over a loaded module's dynamic symbol table.

use crate::defs::{ElfSymbol, SymbolKind};
use crate::dynamic::ElfDynamic;
use core::ffi::CStr;
use core::slice;

/// ELF string table wrapper.
///
/// When the module declared its string table extent via `DT_STRSZ`, reads are
/// bounds checked against it: an out-of-extent name offset, or a string that
/// runs unterminated to the end of the table, makes the entry unmatchable
/// instead of reading past the table. Without a declared extent the read
/// falls back to the null-terminated scan the format promises.
pub struct ElfStringTable {
    data: *const u8,
    len: Option<usize>,
}

impl ElfStringTable {
    const fn new(data: *const u8, len: Option<usize>) -> Self {
        ElfStringTable { data, len }
    }

    /// Get the name bytes at `offset`, without the terminating nul.
    #[inline]
    fn get(&self, offset: usize) -> Option<&[u8]> {
        match self.len {
            Some(len) => {
                if offset >= len {
                    return None;
                }
                let window = unsafe { slice::from_raw_parts(self.data.add(offset), len - offset) };
                CStr::from_bytes_until_nul(window).ok().map(CStr::to_bytes)
            }
            None => Some(unsafe { CStr::from_ptr(self.data.add(offset).cast()) }.to_bytes()),
        }
    }
}

/// Read-only window into one module's dynamic symbol table.
///
/// Never copies or mutates the underlying tables; valid for as long as the
/// module stays mapped.
pub struct SymbolTable {
    symtab: *const ElfSymbol,
    strtab: ElfStringTable,
    count: usize,
}

impl SymbolTable {
    pub(crate) fn from_dynamic(dynamic: &ElfDynamic, count: usize) -> SymbolTable {
        SymbolTable {
            symtab: dynamic.symtab as *const ElfSymbol,
            strtab: ElfStringTable::new(dynamic.strtab as *const u8, dynamic.strsz),
            count,
        }
    }

    /// Creates a view over caller-supplied tables.
    ///
    /// # Safety
    /// `symtab` must point at `count` consecutive symbol entries and `strtab`
    /// at a string table covering every entry's name offset (of at least
    /// `strsz` bytes when given), and both must stay valid for the lifetime
    /// of the view.
    pub unsafe fn from_raw_parts(
        symtab: *const ElfSymbol,
        strtab: *const u8,
        strsz: Option<usize>,
        count: usize,
    ) -> SymbolTable {
        SymbolTable {
            symtab,
            strtab: ElfStringTable::new(strtab, strsz),
            count,
        }
    }

    /// The number of entries in the table.
    #[inline]
    pub fn count_syms(&self) -> usize {
        self.count
    }

    /// Finds the first entry, in ascending index order, whose type matches
    /// `kind` and whose name equals `name` byte for byte. The scan stops at
    /// the first match, so duplicate names resolve to the lowest index.
    pub fn lookup(&self, name: &str, kind: SymbolKind) -> Option<&ElfSymbol> {
        for idx in 0..self.count {
            let sym = unsafe { &*self.symtab.add(idx) };
            if sym.st_type() != kind.st_type() {
                continue;
            }
            let Some(bytes) = self.strtab.get(sym.st_name()) else {
                continue;
            };
            if bytes == name.as_bytes() {
                log::debug!("found {} at symidx {}", name, idx);
                return Some(sym);
            }
        }
        None
    }
}
