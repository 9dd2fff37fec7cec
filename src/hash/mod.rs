//! Symbol table sizing via the ELF hash sections.
//!
//! The ELF format does not store the dynamic symbol table's length anywhere;
//! it has to be recovered from whichever hash section the module carries.

use crate::Result;
use crate::dynamic::ElfDynamic;
use crate::error::{hash_count_mismatch_error, missing_table_error};

mod gnu;
mod sysv;

pub use gnu::ElfGnuHash;
pub use sysv::ElfHash;

/// The hash sections found for one module.
///
/// The dynamic section parser guarantees at least one is present before this
/// type is constructed from its output.
pub struct HashTables {
    sysv: Option<ElfHash>,
    gnu: Option<ElfGnuHash>,
}

impl HashTables {
    pub fn from_dynamic(dynamic: &ElfDynamic) -> HashTables {
        HashTables {
            sysv: dynamic.hash.map(|addr| ElfHash::parse(addr as *const u8)),
            gnu: dynamic
                .gnu_hash
                .map(|addr| ElfGnuHash::parse(addr as *const u8)),
        }
    }

    /// Returns the number of entries in the symbol table.
    ///
    /// When both hash kinds are present their counts must agree; a mismatch
    /// indicates either a parsing bug or a malformed binary and is surfaced
    /// as [`crate::Error::HashCountMismatch`] rather than silently picking
    /// one of the two.
    pub fn count_syms(&self) -> Result<usize> {
        match (&self.sysv, &self.gnu) {
            (Some(sysv), Some(gnu)) => {
                let nchain = sysv.count_syms();
                let walked = gnu.count_syms();
                if nchain != walked {
                    return Err(hash_count_mismatch_error(nchain, walked));
                }
                Ok(nchain)
            }
            (Some(sysv), None) => Ok(sysv.count_syms()),
            (None, Some(gnu)) => Ok(gnu.count_syms()),
            (None, None) => Err(missing_table_error("no hash section was parsed")),
        }
    }
}
