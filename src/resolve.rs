//! Top-level lookup flow: filter modules by path, parse once, scan.

use crate::defs::{Dyn, SymbolKind};
use crate::dynamic::ElfRawDynamic;
use crate::error::{missing_dynamic_error, module_not_found_error, symbol_not_found_error};
use crate::hash::HashTables;
use crate::module::{Control, LoadedModule, each_module};
use crate::symbol::SymbolTable;
use crate::{Error, Result};

/// A resolved export.
///
/// Owned by the caller; carries no tie to the module view it was derived
/// from. The address stays valid for as long as the module stays mapped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSymbol {
    pub name: String,
    /// Absolute runtime address: load base plus the entry's value.
    pub address: usize,
}

/// Borrowed resolution scope over one module whose tables were parsed once.
///
/// Obtained through [`with_symbol_table`]; any number of lookups can run
/// against it before the enumeration callback returns and the view is
/// released.
pub struct ModuleSymbols<'m> {
    table: SymbolTable,
    base: usize,
    path: &'m str,
}

impl ModuleSymbols<'_> {
    /// The path of the module the tables belong to.
    #[inline]
    pub fn path(&self) -> &str {
        self.path
    }

    /// The module's load base address.
    #[inline]
    pub fn base(&self) -> usize {
        self.base
    }

    /// The symbol table view.
    #[inline]
    pub fn symbol_table(&self) -> &SymbolTable {
        &self.table
    }

    /// Resolves one export of the module by name and kind.
    ///
    /// At most one address is ever returned per call; if the name occurs
    /// multiple times, the lowest-indexed occurrence of the requested kind
    /// wins. No signature validation is performed, calling the address with
    /// a mismatched signature is entirely the caller's responsibility.
    pub fn resolve(&self, name: &str, kind: SymbolKind) -> Result<ResolvedSymbol> {
        let sym = self.table.lookup(name, kind).ok_or_else(|| {
            symbol_not_found_error(format!("'{}' is not exported by {}", name, self.path))
        })?;
        Ok(ResolvedSymbol {
            name: name.to_string(),
            address: self.base + sym.st_value(),
        })
    }
}

/// Parses one module's dynamic section down to a sized symbol table view.
fn open_module<'m>(module: &LoadedModule<'m>) -> Result<ModuleSymbols<'m>> {
    let Some(segment) = module.dynamic_segment() else {
        return Err(missing_dynamic_error(format!(
            "{} has no PT_DYNAMIC segment (statically linked?)",
            module.path()
        )));
    };
    // The dynamic segment's own address is always base-relative, only the
    // pointers stored inside it need correction.
    let dyn_ptr = (module.base() + segment.vaddr) as *const Dyn;
    let raw = ElfRawDynamic::new(dyn_ptr, segment.memsz / size_of::<Dyn>())?;
    let dynamic = raw.finish(module.base());
    let count = HashTables::from_dynamic(&dynamic).count_syms()?;
    log::trace!(
        "{}: symtab {:#x}, strtab {:#x}, {} entries",
        module.path(),
        dynamic.symtab,
        dynamic.strtab,
        count
    );
    Ok(ModuleSymbols {
        table: SymbolTable::from_dynamic(&dynamic, count),
        base: module.base(),
        path: module.path(),
    })
}

/// Runs `f` against the parsed symbol table of the first loaded module whose
/// path contains `module_name` and whose dynamic metadata parses.
///
/// Modules that match the substring but fail to parse are skipped and the
/// enumeration continues; if none is left the last per-module error is
/// returned, or [`Error::ModuleNotFound`] when nothing matched at all. A
/// [`Error::HashCountMismatch`] is an internal-consistency fault and aborts
/// the lookup immediately.
///
/// No module may be concurrently unloaded while this runs.
pub fn with_symbol_table<T, F>(module_name: &str, f: F) -> Result<T>
where
    F: FnOnce(&ModuleSymbols) -> T,
{
    let mut f = Some(f);
    let mut outcome: Option<Result<T>> = None;
    each_module(|module| {
        if !module.path().contains(module_name) {
            return Control::Continue;
        }
        log::debug!("lookup in '{}' (base {:#x})", module.path(), module.base());
        match open_module(module) {
            Ok(symbols) => {
                if let Some(f) = f.take() {
                    outcome = Some(Ok(f(&symbols)));
                }
                Control::Stop
            }
            Err(err @ Error::HashCountMismatch { .. }) => {
                outcome = Some(Err(err));
                Control::Stop
            }
            Err(err) => {
                log::debug!("skipping '{}': {}", module.path(), err);
                outcome = Some(Err(err));
                Control::Continue
            }
        }
    });
    outcome.unwrap_or_else(|| {
        Err(module_not_found_error(format!(
            "no loaded module matches '{module_name}'"
        )))
    })
}

/// Resolves the address of one export by module path substring, symbol name
/// and symbol kind.
///
/// Resolving the same pair twice with no module reload in between yields the
/// same address both times.
pub fn resolve(module_name: &str, symbol_name: &str, kind: SymbolKind) -> Result<ResolvedSymbol> {
    with_symbol_table(module_name, |symbols| symbols.resolve(symbol_name, kind))?
}
