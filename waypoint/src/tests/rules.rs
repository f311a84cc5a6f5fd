use crate::builtin;
use crate::facts::{Answer, Fact};
use crate::tests::{table, unchecked_table, PETS};
use crate::{Production, WaypointError};

fn answer(question_id: &str, value: &str) -> Answer {
    Answer {
        question_id: question_id.to_string(),
        value: value.to_string(),
    }
}

#[test]
fn test_table_shape() {
    let table = table(PETS);
    assert_eq!(table.name(), "pets");
    assert_eq!(table.root_id(), "space");
    assert_eq!(table.root().map(|q| q.id.as_str()), Some("space"));
    assert_eq!(table.question_count(), 2);
    assert_eq!(table.rule_count(), 3);

    let ids: Vec<&str> = table.questions().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["space", "time"]);
}

#[test]
fn test_branch_and_leaf_questions() {
    let table = table(PETS);
    assert!(!table.is_leaf("space"));
    assert!(table.is_leaf("time"));
    assert_eq!(table.rules_for("space").len(), 2);
    assert!(table.rules_for("unknown").is_empty());
}

#[test]
fn test_exact_match_selects_one_rule() {
    let table = table(PETS);
    let given = answer("space", "House with garden");
    let matched: Vec<&str> = table.matching(&given).map(|r| r.name()).collect();
    assert_eq!(matched, vec!["rec_dog"]);

    let unknown = answer("space", "Boat");
    assert_eq!(table.matching(&unknown).count(), 0);
}

#[test]
fn test_wildcard_matches_any_value() {
    let table = table(PETS);
    let given = answer("time", "Plenty");
    let rules: Vec<_> = table.matching(&given).collect();
    assert_eq!(rules.len(), 1);
    assert!(rules[0].is_wildcard());
}

#[test]
fn test_produce_question_and_recommendation() {
    let table = table(PETS);

    let ask = table.matching(&answer("space", "Apartment")).next().unwrap();
    match ask.produce("Apartment", &table).unwrap() {
        Fact::Question(q) => {
            assert_eq!(q.id, "time");
            assert_eq!(q.options, vec!["Little", "Plenty"]);
        }
        other => panic!("Expected question, got {:?}", other),
    }

    let leaf = &table.rules_for("time")[0];
    match leaf.produce("Little", &table).unwrap() {
        Fact::Recommendation(r) => {
            assert_eq!(r.track, "Cat (Little time)");
            assert_eq!(r.description, "Independent companion.");
        }
        other => panic!("Expected recommendation, got {:?}", other),
    }
}

#[test]
fn test_produce_unknown_question_is_inconsistent() {
    let table = unchecked_table(
        r#"
tree broken
root a
question a "A?" options "x"
rule r when a is "x" then ask ghost
"#,
        "a",
    );
    let rule = &table.rules_for("a")[0];
    assert!(matches!(rule.production(), Production::Ask(q) if q == "ghost"));
    assert!(matches!(
        rule.produce("x", &table),
        Err(WaypointError::InconsistentState(_))
    ));
}

#[test]
fn test_builtin_career_table() {
    let table = builtin::career_advisor().unwrap();
    assert_eq!(table.name(), builtin::CAREER_ADVISOR);
    assert_eq!(table.root_id(), "field_interest");
    assert_eq!(table.question_count(), 22);
    assert_eq!(table.rule_count(), 40);
    assert_eq!(table.rules_for("field_interest").len(), 5);
    assert!(table.is_leaf("web_backend_tech"));
}
