//! End-to-end resolution against the libc mapped into this test process.

use dynsym::{Control, Error, SymbolKind, each_module, resolve, with_symbol_table};
use rstest::rstest;
use std::mem;

type GetpidFn = unsafe extern "C" fn() -> libc::pid_t;

#[rstest]
fn resolves_getpid_to_a_callable_address() {
    let sym = resolve("libc.so.", "getpid", SymbolKind::Function).unwrap();
    assert_eq!(sym.name, "getpid");
    let getpid: GetpidFn = unsafe { mem::transmute(sym.address) };
    assert_eq!(unsafe { getpid() } as u32, std::process::id());
}

#[rstest]
fn repeated_resolution_is_stable() {
    let first = resolve("libc.so.", "printf", SymbolKind::Function).unwrap();
    let second = resolve("libc.so.", "printf", SymbolKind::Function).unwrap();
    assert_eq!(first, second);
}

#[rstest]
fn agrees_with_dlsym() {
    let lib = unsafe { libloading::os::unix::Library::this() };
    let oracle = unsafe { lib.get::<GetpidFn>(b"getpid\0").unwrap() };
    let sym = resolve("libc.so.", "getpid", SymbolKind::Function).unwrap();
    assert_eq!(sym.address, *oracle as usize);
}

#[rstest]
fn unknown_symbol_is_reported() {
    let err = resolve("libc.so.", "definitely_not_in_libc", SymbolKind::Function).unwrap_err();
    assert!(matches!(err, Error::SymbolNotFound { .. }));
}

#[rstest]
fn unknown_module_is_reported() {
    let err = resolve("libnosuchmodule.so", "getpid", SymbolKind::Function).unwrap_err();
    assert!(matches!(err, Error::ModuleNotFound { .. }));
}

#[rstest]
fn one_parse_serves_several_lookups() {
    let (opendir, readdir) = with_symbol_table("libc.so.", |symbols| {
        assert!(symbols.path().contains("libc.so."));
        assert!(symbols.symbol_table().count_syms() > 0);
        let opendir = symbols.resolve("opendir", SymbolKind::Function)?;
        let readdir = symbols.resolve("readdir", SymbolKind::Function)?;
        Ok::<_, Error>((opendir.address, readdir.address))
    })
    .unwrap()
    .unwrap();
    assert_ne!(opendir, 0);
    assert_ne!(readdir, 0);
    assert_ne!(opendir, readdir);
}

#[rstest]
fn stop_halts_the_enumeration_after_one_module() {
    let mut visited = 0;
    each_module(|_| {
        visited += 1;
        Control::Stop
    });
    assert_eq!(visited, 1);
}

#[rstest]
fn continue_visits_every_module() {
    let mut visited = 0;
    each_module(|_| {
        visited += 1;
        Control::Continue
    });
    // At least the main executable, the vdso and libc.
    assert!(visited > 1);
}

#[rstest]
fn modules_expose_their_segments() {
    let mut saw_dynamic_libc = false;
    each_module(|module| {
        if !module.path().contains("libc.so.") {
            return Control::Continue;
        }
        assert!(!module.phdrs().is_empty());
        saw_dynamic_libc = module.dynamic_segment().is_some();
        Control::Stop
    });
    assert!(saw_dynamic_libc);
}
