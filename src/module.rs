//! Enumeration of the modules currently mapped into the process.

use crate::defs::Phdr;
use core::ffi::{CStr, c_int, c_void};
use core::slice;
use elf::abi::{PF_R, PF_W, PF_X, PT_DYNAMIC, PT_LOAD};

/// Signal returned by a module visitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    /// Present the next loaded module.
    Continue,
    /// End the enumeration now.
    Stop,
}

bitflags::bitflags! {
    /// Memory protection bits of a program header segment.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SegmentFlags: u32 {
        const R = PF_R;
        const W = PF_W;
        const X = PF_X;
    }
}

/// Kind of a program header segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    /// `PT_DYNAMIC`
    Dynamic,
    /// `PT_LOAD`
    Load,
    /// Any other `p_type`.
    Other(u32),
}

/// One memory segment of a loaded module.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Virtual address relative to the module's load base.
    pub vaddr: usize,
    pub memsz: usize,
    pub flags: SegmentFlags,
}

/// Read-only view of one loaded module, supplied per enumeration callback.
///
/// The view borrows process state owned by the dynamic linker; it is only
/// valid for the duration of the visitor invocation it was passed to.
pub struct LoadedModule<'iter> {
    base: usize,
    path: &'iter str,
    phdrs: &'iter [Phdr],
}

impl<'iter> LoadedModule<'iter> {
    /// The address at which the module's image begins in this process.
    #[inline]
    pub fn base(&self) -> usize {
        self.base
    }

    /// The path the module was loaded from. Empty for the main executable.
    #[inline]
    pub fn path(&self) -> &'iter str {
        self.path
    }

    /// The module's program headers.
    #[inline]
    pub fn phdrs(&self) -> &'iter [Phdr] {
        self.phdrs
    }

    /// Iterates the module's segments in program header order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + 'iter {
        self.phdrs.iter().map(|phdr| Segment {
            kind: match phdr.p_type {
                PT_DYNAMIC => SegmentKind::Dynamic,
                PT_LOAD => SegmentKind::Load,
                other => SegmentKind::Other(other),
            },
            vaddr: phdr.p_vaddr as usize,
            memsz: phdr.p_memsz as usize,
            flags: SegmentFlags::from_bits_truncate(phdr.p_flags),
        })
    }

    /// The module's single `PT_DYNAMIC` segment, absent when the module does
    /// not use dynamic linking.
    pub fn dynamic_segment(&self) -> Option<Segment> {
        self.segments()
            .find(|segment| segment.kind == SegmentKind::Dynamic)
    }
}

/// Invokes `visitor` once per loaded module, on the calling thread, in the
/// order the dynamic linker reports them, until the list is exhausted or the
/// visitor returns [`Control::Stop`].
///
/// Modules whose recorded path is not valid UTF-8 are skipped.
pub fn each_module<F>(visitor: F)
where
    F: FnMut(&LoadedModule) -> Control,
{
    unsafe extern "C" fn iterate_cb<F>(
        info: *mut libc::dl_phdr_info,
        _size: libc::size_t,
        data: *mut c_void,
    ) -> c_int
    where
        F: FnMut(&LoadedModule) -> Control,
    {
        // Skip a malformed record rather than ending the whole enumeration.
        if info.is_null() || data.is_null() {
            return 0;
        }
        let info = unsafe { &*info };
        let visitor = unsafe { &mut *data.cast::<F>() };
        let path = if info.dlpi_name.is_null() {
            ""
        } else {
            match unsafe { CStr::from_ptr(info.dlpi_name) }.to_str() {
                Ok(path) => path,
                Err(_) => return 0,
            }
        };
        let phdrs = if info.dlpi_phdr.is_null() {
            &[]
        } else {
            unsafe { slice::from_raw_parts(info.dlpi_phdr.cast::<Phdr>(), info.dlpi_phnum as usize) }
        };
        let module = LoadedModule {
            base: info.dlpi_addr as usize,
            path,
            phdrs,
        };
        match visitor(&module) {
            Control::Continue => 0,
            Control::Stop => 1,
        }
    }

    let mut visitor = visitor;
    unsafe {
        libc::dl_iterate_phdr(
            Some(iterate_cb::<F>),
            (&mut visitor as *mut F).cast::<c_void>(),
        );
    }
}
