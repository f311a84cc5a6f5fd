

mod rules;


/// Small two-level tree used across unit tests
pub(crate) const PETS: &str = r#"
tree pets
root space

question space "How much space do you have?"
  options "Apartment", "House with garden"

rule ask_time
  when space is "Apartment"
  then ask time

rule rec_dog
  when space is "House with garden"
  then recommend "Dog" "Loyal and active."

question time "How much time per day?"
  options "Little", "Plenty"

rule rec_cat
  when time is any as amount
  then recommend "Cat ({amount} time)" "Independent companion."
"#;

/// Parse and validate a single tree
pub(crate) fn table(source: &str) -> crate::RuleTable {
    let limits = crate::ResourceLimits::default();
    let mut docs = crate::parse(source, Some("test.tree".to_string()), &limits).unwrap();
    assert_eq!(docs.len(), 1, "expected exactly one tree");
    crate::Validator::new()
        .validate(docs.remove(0), std::sync::Arc::from(source), &limits)
        .unwrap()
}

/// Parse a single tree without validating it
pub(crate) fn unchecked_table(source: &str, root: &str) -> crate::RuleTable {
    let mut docs = crate::parse(source, None, &crate::ResourceLimits::default()).unwrap();
    crate::RuleTable::assemble_unchecked(docs.remove(0), root)
}
