use proptest::prelude::*;
use waypoint::{DisplayFact, Engine, SessionState};

/// Answer the live question with the option at `choice % options.len()` until
/// a recommendation appears. Returns every displayed fact, in order.
fn walk(engine: &Engine, choices: &[usize]) -> Vec<DisplayFact> {
    let mut session = engine.session("career_advisor").unwrap();
    let mut shown = vec![session.current().clone()];

    for choice in choices {
        let DisplayFact::Question { id, options, .. } = session.current().clone() else {
            break;
        };
        let pick = &options[choice % options.len()];
        shown.push(session.answer(&id, pick).unwrap());
    }

    shown
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_any_option_walk_ends_within_four_answers(choices in prop::collection::vec(0usize..16, 4)) {
        let engine = Engine::with_builtin().unwrap();
        let shown = walk(&engine, &choices);

        let last = shown.last().unwrap();
        prop_assert!(last.is_recommendation());
        prop_assert!(shown.len() <= 5);
        prop_assert!(shown[..shown.len() - 1].iter().all(|f| f.is_question()));
    }

    #[test]
    fn prop_walks_are_deterministic(choices in prop::collection::vec(0usize..16, 4)) {
        let engine = Engine::with_builtin().unwrap();
        prop_assert_eq!(walk(&engine, &choices), walk(&engine, &choices));
    }

    #[test]
    fn prop_one_live_fact_at_every_step(choices in prop::collection::vec(0usize..16, 4)) {
        let engine = Engine::with_builtin().unwrap();
        let mut session = engine.session("career_advisor").unwrap();

        for choice in choices {
            let facts = session.facts();
            let pending = facts
                .questions()
                .filter(|q| facts.answer_for(&q.id).is_none())
                .count();
            let recommendations = facts.recommendations().count();

            match session.state() {
                SessionState::AwaitingAnswer => {
                    prop_assert_eq!(pending, 1);
                    prop_assert_eq!(recommendations, 0);
                }
                SessionState::Complete => {
                    prop_assert_eq!(recommendations, 1);
                    break;
                }
            }

            let DisplayFact::Question { id, options, .. } = session.current().clone() else {
                break;
            };
            session.answer(&id, &options[choice % options.len()]).unwrap();
        }
    }

    #[test]
    fn prop_unlisted_answers_change_nothing(value in "[a-z ]{1,24}") {
        let engine = Engine::with_builtin().unwrap();
        let mut session = engine.session("career_advisor").unwrap();
        let before = session.facts().len();

        prop_assert!(session.answer("field_interest", &value).is_err());
        prop_assert_eq!(session.facts().len(), before);
        prop_assert_eq!(session.current().question_id(), Some("field_interest"));
    }

    #[test]
    fn prop_template_text_without_braces_is_literal(text in "[A-Za-z0-9 ().,/-]{0,40}") {
        let template = waypoint::Template::parse(&text);
        prop_assert!(template.variables().is_empty());
        prop_assert_eq!(template.render(Some(("x", "ignored"))), text);
    }
}
