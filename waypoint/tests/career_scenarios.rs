use waypoint::{DisplayFact, Engine, SessionState, WaypointError};

fn career_session() -> waypoint::Session {
    Engine::with_builtin()
        .unwrap()
        .session("career_advisor")
        .unwrap()
}

#[test]
fn test_network_engineer_in_two_answers() {
    let mut session = career_session();
    assert_eq!(session.start().unwrap().question_id(), Some("field_interest"));

    let next = session
        .answer("field_interest", "Systems & Infrastructure")
        .unwrap();
    assert_eq!(next.question_id(), Some("sys_focus"));

    let next = session.answer("sys_focus", "Network Engineering").unwrap();
    assert_eq!(
        next,
        DisplayFact::Recommendation {
            track: "Network Engineer (Cisco/Juniper)".to_string(),
            description: "Design and manage network infrastructure.".to_string(),
        }
    );
    assert_eq!(session.state(), SessionState::Complete);
}

#[test]
fn test_native_ios_through_mobile_branch() {
    let mut session = career_session();

    let next = session.answer("field_interest", "Software Development").unwrap();
    assert_eq!(next.question_id(), Some("dev_platform"));

    let next = session.answer("dev_platform", "Mobile").unwrap();
    assert_eq!(next.question_id(), Some("mobile_type"));

    let next = session.answer("mobile_type", "Native iOS").unwrap();
    assert_eq!(next.track(), Some("iOS Developer (Swift)"));
}

#[test]
fn test_wildcard_leaf_interpolates_answer() {
    let mut session = career_session();
    session.answer("field_interest", "Software Development").unwrap();
    let next = session.answer("dev_platform", "Embedded Systems").unwrap();
    assert_eq!(next.question_id(), Some("embedded_tech"));

    let next = session.answer("embedded_tech", "Robotics").unwrap();
    assert_eq!(next.track(), Some("Robotics Specialist"));
}

#[test]
fn test_invalid_answer_leaves_question_live() {
    let mut session = career_session();
    let before = session.current().clone();

    let result = session.answer("field_interest", "Nonexistent");
    assert!(matches!(result, Err(WaypointError::InvalidAnswer { .. })));
    assert_eq!(session.current(), &before);
    assert_eq!(session.current().question_id(), Some("field_interest"));
    assert_eq!(session.facts().answers().count(), 0);
}

#[test]
fn test_four_answer_path() {
    let mut session = career_session();
    session.answer("field_interest", "Software Development").unwrap();
    session.answer("dev_platform", "Web").unwrap();
    session.answer("web_focus", "Backend (Server Logic)").unwrap();
    let next = session.answer("web_backend_tech", "Go").unwrap();

    assert_eq!(next.track(), Some("Web Backend Developer (Go)"));
    assert_eq!(session.transcript().steps.len(), 4);
}

#[test]
fn test_restart_after_recommendation() {
    let mut session = career_session();
    session
        .answer("field_interest", "Systems & Infrastructure")
        .unwrap();
    session.answer("sys_focus", "Network Engineering").unwrap();

    let root = session.start().unwrap();
    assert_eq!(root.question_id(), Some("field_interest"));
    assert_eq!(session.state(), SessionState::AwaitingAnswer);

    let next = session.answer("field_interest", "Data & AI").unwrap();
    assert_eq!(next.question_id(), Some("data_ai_focus"));
}
