//! Parsing the `PT_DYNAMIC` segment of a loaded module.

use crate::Result;
use crate::defs::Dyn;
use crate::error::missing_table_error;
use core::slice::from_raw_parts;
use elf::abi::{DT_GNU_HASH, DT_HASH, DT_NULL, DT_STRSZ, DT_STRTAB, DT_SYMTAB};

/// Corrects a pointer-sized value read out of dynamic metadata.
///
/// For unknown reason, these values are sometimes load-relative and sometimes
/// already absolute, depending on the platform and library version, and the
/// format alone does not disambiguate. The rule applied uniformly here: a
/// value numerically greater than the load base is taken as absolute and
/// returned unchanged, anything else is taken as base-relative. This is a
/// known fragility inherited from observed loader behavior, not a
/// guaranteed-correct algorithm.
#[inline]
pub const fn correct_address(base: usize, value: usize) -> usize {
    if value > base { value } else { base + value }
}

/// Table locations recorded from a dynamic section scan, before base
/// correction. The first occurrence of each recognized tag wins; duplicates
/// are ignored.
#[derive(Debug)]
pub struct ElfRawDynamic {
    /// DT_SYMTAB
    symtab_off: usize,
    /// DT_STRTAB
    strtab_off: usize,
    /// DT_STRSZ, when the module declares its string table extent
    strsz: Option<usize>,
    /// DT_HASH
    hash_off: Option<usize>,
    /// DT_GNU_HASH
    gnu_hash_off: Option<usize>,
}

impl ElfRawDynamic {
    /// Scans at most `max_entries` dynamic entries starting at `dyn_ptr`,
    /// stopping early at a `DT_NULL` terminator.
    ///
    /// `max_entries` is the segment's declared memory size divided by the
    /// entry size, so the scan never runs past the segment even when the
    /// terminator is missing.
    pub fn new(dyn_ptr: *const Dyn, max_entries: usize) -> Result<ElfRawDynamic> {
        let mut symtab_off = None;
        let mut strtab_off = None;
        let mut strsz = None;
        let mut hash_off = None;
        let mut gnu_hash_off = None;

        let entries = unsafe { from_raw_parts(dyn_ptr, max_entries) };
        for entry in entries {
            let tag = entry.d_tag as i64;
            if tag == DT_NULL {
                break;
            }
            let slot = match tag {
                DT_SYMTAB => &mut symtab_off,
                DT_STRTAB => &mut strtab_off,
                DT_STRSZ => &mut strsz,
                DT_HASH => &mut hash_off,
                DT_GNU_HASH => &mut gnu_hash_off,
                _ => continue,
            };
            if slot.is_none() {
                log::trace!("dynamic tag {:#x} -> {:#x}", tag, entry.d_un);
                *slot = Some(entry.d_un as usize);
            }
        }

        let symtab_off =
            symtab_off.ok_or_else(|| missing_table_error("dynamic section has no DT_SYMTAB"))?;
        let strtab_off =
            strtab_off.ok_or_else(|| missing_table_error("dynamic section has no DT_STRTAB"))?;
        if hash_off.is_none() && gnu_hash_off.is_none() {
            return Err(missing_table_error(
                "dynamic section has neither DT_HASH nor DT_GNU_HASH",
            ));
        }
        Ok(ElfRawDynamic {
            symtab_off,
            strtab_off,
            strsz,
            hash_off,
            gnu_hash_off,
        })
    }

    /// Maps every recorded location to an address in the running process via
    /// [`correct_address`]. `DT_STRSZ` is a byte count, not a pointer, and is
    /// carried through unchanged.
    pub fn finish(self, base: usize) -> ElfDynamic {
        ElfDynamic {
            symtab: correct_address(base, self.symtab_off),
            strtab: correct_address(base, self.strtab_off),
            strsz: self.strsz,
            hash: self.hash_off.map(|off| correct_address(base, off)),
            gnu_hash: self.gnu_hash_off.map(|off| correct_address(base, off)),
        }
    }
}

/// Table locations of one module after mapping to real addresses.
pub struct ElfDynamic {
    /// Symbol table address.
    pub symtab: usize,
    /// String table address.
    pub strtab: usize,
    /// String table extent in bytes, when declared.
    pub strsz: Option<usize>,
    /// SysV hash section address.
    pub hash: Option<usize>,
    /// GNU hash section address.
    pub gnu_hash: Option<usize>,
}
