
use formgate::{Rule, RuleCode, check_button_visibility, check_rules, disable_button};
use proptest::prelude::*;
use strategies::{arb_button, arb_rule, arb_rules, arb_rules_without_click_gate};

// ---------------------------------------------------------------------------
// Invariant 1: Determinism
//
// Every predicate is pure: the same rules and inputs give the same answer.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn predicates_are_deterministic(
        rules in arb_rules(),
        button in arb_button(),
        is_modify in any::<bool>(),
    ) {
        let disabled = disable_button(&rules, button);
        let visible = check_button_visibility(&rules, is_modify, button);
        let locked = check_rules(&rules, is_modify, button);
        for _ in 0..3 {
            prop_assert_eq!(disabled, disable_button(&rules, button));
            prop_assert_eq!(visible, check_button_visibility(&rules, is_modify, button));
            prop_assert_eq!(locked, check_rules(&rules, is_modify, button));
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: No click gate, no lock
//
// Without an in-use `visibility` rule bound to `on_click`, a click is never
// locked.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn no_click_rules_never_lock(
        rules in arb_rules_without_click_gate(),
        button in arb_button(),
        is_modify in any::<bool>(),
    ) {
        prop_assert!(!check_rules(&rules, is_modify, button));
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Any-match semantics
//
// Each predicate over a list equals the OR of the predicate over the single
// matching rules, so adding a rule can only turn a `false` into a `true`
// for disable_button.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn disable_button_is_or_of_single_rules(
        rules in arb_rules(),
        button in arb_button(),
    ) {
        let expected = rules
            .iter()
            .any(|r| disable_button(std::slice::from_ref(r), button));
        prop_assert_eq!(disable_button(&rules, button), expected);
    }

    #[test]
    fn adding_rule_never_undisables(
        rules in arb_rules(),
        extra in arb_rule(),
        button in arb_button(),
    ) {
        if disable_button(&rules, button) {
            let mut more = rules.clone();
            more.push(extra);
            prop_assert!(disable_button(&more, button));
        }
    }

    #[test]
    fn rule_order_does_not_matter(
        rules in arb_rules(),
        button in arb_button(),
        is_modify in any::<bool>(),
    ) {
        let mut reversed = rules.clone();
        reversed.reverse();
        prop_assert_eq!(disable_button(&rules, button), disable_button(&reversed, button));
        prop_assert_eq!(
            check_button_visibility(&rules, is_modify, button),
            check_button_visibility(&reversed, is_modify, button)
        );
        prop_assert_eq!(
            check_rules(&rules, is_modify, button),
            check_rules(&reversed, is_modify, button)
        );
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Override needs editing
//
// The visibility override never grants anything outside edit mode.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn override_false_when_not_modifying(rules in arb_rules(), button in arb_button()) {
        prop_assert!(!check_button_visibility(&rules, false, button));
    }

    #[test]
    fn foreign_codes_are_inert(
        rules in arb_rules(),
        button in arb_button(),
        is_modify in any::<bool>(),
    ) {
        let foreign: Vec<Rule> = rules
            .into_iter()
            .map(|mut r| {
                r.code = RuleCode::Other("requiredfield".into());
                r
            })
            .collect();
        prop_assert!(!disable_button(&foreign, button));
        prop_assert!(!check_button_visibility(&foreign, is_modify, button));
        prop_assert!(!check_rules(&foreign, is_modify, button));
    }
}
