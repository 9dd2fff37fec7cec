//! ELF definitions for the native word width.
//!
//! Only the native class is supported: a module mapped into this process has
//! the same class as the process itself, so there is no 32/64 duality to
//! handle at runtime.

use elf::abi::{STT_FUNC, STT_OBJECT};

cfg_if::cfg_if! {
    if #[cfg(target_pointer_width = "64")] {
        /// Program header of the native ELF class.
        pub type Phdr = elf::segment::Elf64_Phdr;
        /// Dynamic section entry of the native ELF class.
        pub type Dyn = elf::dynamic::Elf64_Dyn;
        /// Symbol table entry of the native ELF class.
        pub type Sym = elf::symbol::Elf64_Sym;
    } else {
        pub type Phdr = elf::segment::Elf32_Phdr;
        pub type Dyn = elf::dynamic::Elf32_Dyn;
        pub type Sym = Elf32Sym;
    }
}

/// 32-bit ELF symbol table entry.
/// The `elf` crate only ships a native struct for the 64-bit class; on 64-bit
/// targets the `Sym` alias points to `elf::symbol::Elf64_Sym` instead.
#[allow(unused)]
#[repr(C)]
pub struct Elf32Sym {
    pub st_name: u32,
    pub st_value: u32,
    pub st_size: u32,
    pub st_info: u8,
    pub st_other: u8,
    pub st_shndx: u16,
}

/// Kind of symbol a lookup must match. Entries of any other type are skipped
/// during the scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    /// `STT_FUNC`
    Function,
    /// `STT_OBJECT`
    Object,
}

impl SymbolKind {
    #[inline]
    pub(crate) const fn st_type(self) -> u8 {
        match self {
            SymbolKind::Function => STT_FUNC,
            SymbolKind::Object => STT_OBJECT,
        }
    }
}

/// ELF symbol table entry.
///
/// Wraps the native symbol struct and provides the accessors the scan needs,
/// independent of the ELF class.
#[repr(transparent)]
pub struct ElfSymbol {
    sym: Sym,
}

impl ElfSymbol {
    /// Returns the symbol value, an offset from the module's load base.
    #[inline]
    pub fn st_value(&self) -> usize {
        self.sym.st_value as usize
    }

    /// Returns the symbol binding.
    #[inline]
    pub fn st_bind(&self) -> u8 {
        self.sym.st_info >> 4
    }

    /// Returns the symbol type.
    #[inline]
    pub fn st_type(&self) -> u8 {
        self.sym.st_info & 0xf
    }

    /// Returns the symbol name offset into the string table.
    #[inline]
    pub fn st_name(&self) -> usize {
        self.sym.st_name as usize
    }
}
