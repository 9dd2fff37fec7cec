use criterion::{Criterion, criterion_group, criterion_main};
use dynsym::{SymbolKind, resolve, with_symbol_table};
use libloading::os::unix::Library;

fn resolve_benchmark(c: &mut Criterion) {
    c.bench_function("dynsym:resolve", |b| {
        b.iter(|| resolve("libc.so.", "getpid", SymbolKind::Function).unwrap())
    });
    let lib = unsafe { Library::this() };
    c.bench_function("libloading:get", |b| {
        b.iter(|| {
            unsafe { lib.get::<unsafe extern "C" fn() -> i32>(b"getpid\0").unwrap() };
        })
    });
}

fn scoped_benchmark(c: &mut Criterion) {
    c.bench_function("dynsym:with_symbol_table", |b| {
        b.iter(|| {
            with_symbol_table("libc.so.", |symbols| {
                symbols.resolve("getpid", SymbolKind::Function).unwrap();
                symbols.resolve("printf", SymbolKind::Function).unwrap();
            })
            .unwrap()
        })
    });
}

criterion_group!(benches, resolve_benchmark, scoped_benchmark);
criterion_main!(benches);
