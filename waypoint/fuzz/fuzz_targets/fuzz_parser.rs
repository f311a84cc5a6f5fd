#![no_main]

use libfuzzer_sys::fuzz_target;
use waypoint::Engine;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut engine = Engine::new();

        let _ = engine.add_tree_code(s, "fuzz_input");
    }
});
