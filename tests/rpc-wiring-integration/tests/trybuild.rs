//! trybuild compile-time tests for rpc_macros

#[test]
fn trybuild_managed_object() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/managed_ok.rs");
}
