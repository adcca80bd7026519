//! Shared test setup and fixtures for the Candle crates.

use std::sync::Once;

/// Install a `tracing` subscriber for the current test process.
///
/// Filtering follows `RUST_LOG`; nothing is printed unless it is set.
/// Safe to call from every test, only the first call installs anything.
pub fn setup() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// One copy of every kind of property the format supports, one per line.
pub const PROPERTIES: &str = r#"property1 = "Test"
property2 = "Test\"Test"
property3 = "Test\\Test"
property4 = "Test\bTest"
property5 = "Test\fTest"
property6 = "Test\nTest"
property7 = "Test\rTest"
property8 = "Test\tTest"
property9 = "Test\u2764Test"
property10 = 1234
property11 = -1234
property12 = 0xFF
property13 = 1.23
property14 = -1.23
property15 = true
property16 = false
property17 = VALUE1
property18 = null
property19 = ["Test 1", "Test 2", "Test 3"]
property20 = [1, 2, 3, 4]
property21 = [-1, -2, -3, -4]
property22 = [0xA, 0xB, 0xC, 0xD]
property23 = [1.1, 1.2, 1.3, 1.4]
property24 = [true, false, true, false]
property25 = [VALUE1, VALUE2, VALUE3, VALUE4]
property26 = []
property27 = [null, null, "Test 1", null]
property28 = [
	"Test 1",
	"Test 2",
	"Test 3",
	"Test 4",
]
property29 = default
"#;

/// The full sample document: [`PROPERTIES`] at the root, inside `object1`,
/// `object1.child1`, `object1.child1.child1` and `object1.child2`, plus
/// comments of both styles.
pub fn sample_document() -> String {
    let mut out = String::new();
    out.push_str("// Sample document\n");
    out.push_str(PROPERTIES);
    out.push_str("/* Nested\nobjects */\n");
    out.push_str("object1 {\n");
    push_indented(&mut out, PROPERTIES, 1);
    out.push_str("\tchild1 {\n");
    push_indented(&mut out, PROPERTIES, 2);
    out.push_str("\t\tchild1 {\n");
    push_indented(&mut out, PROPERTIES, 3);
    out.push_str("\t\t}\n");
    out.push_str("\t}\n");
    out.push_str("\tchild2 {\n");
    push_indented(&mut out, PROPERTIES, 2);
    out.push_str("\t}\n");
    out.push_str("}\n");
    out
}

/// A document the tokenizer rejects (`#` is not part of the format).
pub const LEXER_ERROR: &str = "property1 = \"Test\"\nproperty2 = #1234\n";

/// A document that tokenizes cleanly but is not grammatical.
pub const PARSER_ERROR: &str = "property1 = \"Test\"\nobject1 {\n\tproperty2 = = 1\n}\n";

fn push_indented(out: &mut String, text: &str, level: usize) {
    for line in text.lines() {
        for _ in 0..level {
            out.push('\t');
        }
        out.push_str(line);
        out.push('\n');
    }
}
