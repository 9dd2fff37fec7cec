use core::fmt::Display;
use std::borrow::Cow;

/// Errors produced while resolving a symbol from the loaded modules.
///
/// The first three variants are recoverable for the enumeration as a whole:
/// a parse failure in one module does not affect the result computed from
/// another. [`Error::HashCountMismatch`] is an internal-consistency fault and
/// aborts the entire lookup.
#[derive(Debug)]
pub enum Error {
    /// No loaded module's path matched the requested substring.
    ModuleNotFound {
        /// A descriptive message naming the requested module.
        msg: Cow<'static, str>,
    },

    /// The candidate module carries no `PT_DYNAMIC` segment, typically
    /// because it is statically linked. Fatal for that module only.
    MissingDynamicSection {
        /// A descriptive message naming the module.
        msg: Cow<'static, str>,
    },

    /// The dynamic section lacks the symbol table, the string table, or both
    /// hash sections. Without at least one hash section the symbol table
    /// cannot be sized. Fatal for that module only.
    MissingRequiredTable {
        /// A descriptive message naming the missing table.
        msg: Cow<'static, str>,
    },

    /// The SysV and GNU hash sections disagree about the symbol count.
    /// This indicates either a parsing bug or a malformed binary; it is
    /// surfaced to the caller rather than asserted on, so the caller decides
    /// whether to abort.
    HashCountMismatch {
        /// Count reported by the SysV `nchain` header field.
        sysv: usize,
        /// Count computed by the GNU hash chain walk.
        gnu: usize,
    },

    /// The symbol table was fully scanned without a match. A distinct
    /// outcome, never conflated with a zero or sentinel address.
    SymbolNotFound {
        /// A descriptive message naming the symbol.
        msg: Cow<'static, str>,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::ModuleNotFound { msg } => write!(f, "module not found: {msg}"),
            Error::MissingDynamicSection { msg } => {
                write!(f, "missing dynamic section: {msg}")
            }
            Error::MissingRequiredTable { msg } => {
                write!(f, "missing required table: {msg}")
            }
            Error::HashCountMismatch { sysv, gnu } => write!(
                f,
                "hash sections disagree on symbol count: sysv reports {sysv}, gnu walk yields {gnu}"
            ),
            Error::SymbolNotFound { msg } => write!(f, "symbol not found: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

#[cold]
#[inline(never)]
pub(crate) fn module_not_found_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::ModuleNotFound { msg: msg.into() }
}

#[cold]
#[inline(never)]
pub(crate) fn missing_dynamic_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::MissingDynamicSection { msg: msg.into() }
}

#[cold]
#[inline(never)]
pub(crate) fn missing_table_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::MissingRequiredTable { msg: msg.into() }
}

#[cold]
#[inline(never)]
pub(crate) fn hash_count_mismatch_error(sysv: usize, gnu: usize) -> Error {
    Error::HashCountMismatch { sysv, gnu }
}

#[cold]
#[inline(never)]
pub(crate) fn symbol_not_found_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::SymbolNotFound { msg: msg.into() }
}
