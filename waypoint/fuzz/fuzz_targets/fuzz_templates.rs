#![no_main]

use libfuzzer_sys::fuzz_target;
use waypoint::Engine;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut engine = Engine::new();

        let escaped = s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', " ");
        let code = format!(
            r#"
tree fuzz_template
root q
question q "Q?" options "value"
rule r when q is any as v then recommend "{}" "{}"
"#,
            escaped, escaped
        );

        if engine.add_tree_code(&code, "fuzz_template").is_ok() {
            if let Ok(mut session) = engine.session("fuzz_template") {
                let _ = session.answer("q", "value");
            }
        }
    }
});
