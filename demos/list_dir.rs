//! Lists the current directory twice: once through the ordinary std API and
//! once through `opendir`/`readdir` pointers resolved by walking libc's
//! dynamic section directly.

use dynsym::{Error, SymbolKind, with_symbol_table};
use std::ffi::CStr;
use std::mem;

type OpendirFn = unsafe extern "C" fn(*const libc::c_char) -> *mut libc::DIR;
type ReaddirFn = unsafe extern "C" fn(*mut libc::DIR) -> *mut libc::dirent;

fn list_current_dir_std() {
    println!("\nlist current dir with std");
    for entry in std::fs::read_dir(".").expect("cannot open dir '.'") {
        let entry = entry.expect("cannot read dir entry");
        println!("list entry: {}", entry.file_name().to_string_lossy());
    }
}

fn list_current_dir_resolved() {
    println!("\nlist current dir directly with libc");
    // One parse of libc's tables, two lookups.
    let (opendir, readdir) = with_symbol_table("libc.so.", |symbols| {
        let opendir = symbols.resolve("opendir", SymbolKind::Function)?;
        let readdir = symbols.resolve("readdir", SymbolKind::Function)?;
        Ok::<_, Error>((opendir.address, readdir.address))
    })
    .expect("libc not found among loaded modules")
    .expect("opendir/readdir not exported by libc");

    let opendir: OpendirFn = unsafe { mem::transmute(opendir) };
    let readdir: ReaddirFn = unsafe { mem::transmute(readdir) };

    let dir = unsafe { opendir(c".".as_ptr()) };
    assert!(!dir.is_null(), "cannot open dir '.'");
    loop {
        let entry = unsafe { readdir(dir) };
        if entry.is_null() {
            break;
        }
        let name = unsafe { CStr::from_ptr((*entry).d_name.as_ptr()) };
        println!("list entry: {}", name.to_string_lossy());
    }
}

fn main() {
    env_logger::init();
    list_current_dir_std();
    list_current_dir_resolved();
}
