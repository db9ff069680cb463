//! 構文エラーで中断したときに組み立て途中の木が残らないことを確かめる

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

struct Counting;

thread_local! {
    static LIVE: Cell<isize> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            let _ = LIVE.try_with(|live| live.set(live.get() + 1));
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        let _ = LIVE.try_with(|live| live.set(live.get() - 1));
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

fn live() -> isize {
    LIVE.with(|live| live.get())
}

fn compile_with_diagnostics(source: &str) -> (bool, usize) {
    let mut sink = Vec::new();
    let succeeded = oztoy::compile(source, &mut sink).is_ok();
    let lines = sink.iter().filter(|&&byte| byte == b'\n').count();
    (succeeded, lines)
}

#[test]
fn test_failed_parse_releases_partial_tree() {
    let source = "module m { fn ok(a: int) -> int { { let b; a + b * 2 } } fn id(x: int) int { x } }";
    // 初回だけ確保される静的な領域を先に済ませる
    compile_with_diagnostics(source);

    let before = live();
    let (succeeded, lines) = compile_with_diagnostics(source);
    let after = live();
    assert!(!succeeded);
    assert_eq!(lines, 1);
    assert_eq!(after, before);
}

#[test]
fn test_translation_unit_releases_everything() {
    let source = "fn f(x: int) -> int { let y: int = x; { var y; y = x + 1 }; y }";
    compile_with_diagnostics(source);

    let before = live();
    let (succeeded, lines) = compile_with_diagnostics(source);
    let after = live();
    assert!(succeeded);
    assert_eq!(lines, 0);
    assert_eq!(after, before);
}
