use std::{collections::HashMap, env, fs};

use bloq::{
    console::BufferConsole,
    run_source,
    snippets::{DirSnippetStore, SnippetStore},
};

fn scratch_store(label: &str) -> DirSnippetStore {
    let root = env::temp_dir().join(format!("bloq-snippets-{}-{label}", std::process::id()));
    let _ = fs::remove_dir_all(&root);
    DirSnippetStore::new(root)
}

#[test]
fn snippets_round_trip() {
    let mut store = scratch_store("roundtrip");

    store.save_snippet("fib", "a = 1").expect("save");
    assert_eq!(store.load_snippet("fib").expect("load"), "a = 1");

    store.save_snippet("fib", "a = 2").expect("overwrite");
    assert_eq!(store.load_snippet("fib").expect("reload"), "a = 2");
}

#[test]
fn missing_snippets_load_as_empty() {
    let store = scratch_store("missing");
    assert_eq!(store.load_snippet("nope").expect("load"), "");
}

#[test]
fn snippet_ids_cannot_escape_the_store() {
    let mut store = scratch_store("escape");
    store.save_snippet("../outside", "x = 1").expect("save");

    // The separator is flattened, so the snippet stays inside the store.
    assert_eq!(store.load_snippet("../outside").expect("load"), "x = 1");
}

#[test]
fn a_stored_snippet_runs_like_any_source() {
    let mut store = scratch_store("run");
    store.save_snippet("answer", "x = 6 * 7\nprintln x").expect("save");

    let source = store.load_snippet("answer").expect("load");
    let mut console = BufferConsole::new();
    let results = run_source(&source, &HashMap::new(), &mut console);

    assert_eq!(results.variables["x"].to_text(), "42");
    assert_eq!(console.contents(), "42\n");
}
