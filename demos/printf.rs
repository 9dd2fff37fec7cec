//! Prints a line through a `printf` pointer resolved from libc's dynamic
//! section, bypassing `dlsym`.

use dynsym::{SymbolKind, resolve};
use std::mem;

type PrintfFn = unsafe extern "C" fn(*const libc::c_char, ...) -> libc::c_int;

fn main() {
    env_logger::init();
    let sym = resolve("libc.so.", "printf", SymbolKind::Function)
        .expect("printf not resolvable from libc");
    let printf: PrintfFn = unsafe { mem::transmute(sym.address) };
    unsafe {
        printf(
            c"resolved printf at %p, use it #%d\n".as_ptr(),
            sym.address as *const libc::c_void,
            1,
        );
    }
}
