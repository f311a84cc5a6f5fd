#![no_main]

use libfuzzer_sys::fuzz_target;
use waypoint::Engine;

// Arbitrary answer text against every live question of the career tree
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let Ok(engine) = Engine::with_builtin() else {
            return;
        };
        let Ok(mut session) = engine.session("career_advisor") else {
            return;
        };

        for value in s.split('\n') {
            let Some(id) = session.current().question_id().map(str::to_string) else {
                break;
            };
            let _ = session.answer(&id, value);
        }

        let _ = waypoint::parse_answers(&[s]);
    }
});
