//! # dynsym
//! Resolves the in-memory address of an exported function inside an
//! already-loaded shared library by walking the library's ELF dynamic-linking
//! metadata directly, without going through `dlsym`.
//! ## Usage
//! The loaded modules of the process are enumerated with `dl_iterate_phdr`,
//! the first module whose path contains the requested substring has its
//! `PT_DYNAMIC` segment parsed for the symbol, string and hash tables, and the
//! symbol table is scanned linearly for a name and kind match.
//! ## Example
//! ```no_run
//! use dynsym::{SymbolKind, resolve};
//!
//! let sym = resolve("libc.so.", "printf", SymbolKind::Function).unwrap();
//! let printf: unsafe extern "C" fn(*const i8, ...) -> i32 =
//!     unsafe { core::mem::transmute(sym.address) };
//! ```
//! ## Precondition
//! A lookup reads memory owned by the loaded modules themselves. No module may
//! be concurrently unloaded while a lookup runs; a concurrent `dlclose` is
//! undefined behavior, exactly as it is for the underlying iteration facility.

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd")))]
compile_error!("dynsym walks dl_iterate_phdr and supports Linux, Android and FreeBSD only");

// Native-width ELF type selection and the symbol entry wrapper
mod defs;
// Parsing the PT_DYNAMIC segment into typed table pointers
pub mod dynamic;
// Error types
mod error;
// Symbol table sizing via the hash sections
pub mod hash;
// Enumeration of the modules mapped into the process
pub mod module;
// Top-level lookup flow
mod resolve;
// Linear symbol table scan
pub mod symbol;

pub use defs::{Dyn, ElfSymbol, Phdr, Sym, SymbolKind};
pub use error::Error;
pub use module::{Control, LoadedModule, Segment, SegmentFlags, SegmentKind, each_module};
pub use resolve::{ModuleSymbols, ResolvedSymbol, resolve, with_symbol_table};
pub use symbol::SymbolTable;

pub use elf::abi;

pub type Result<T> = core::result::Result<T, Error>;
