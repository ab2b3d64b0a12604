use super::*;
use crate::{
    command::{CommandKind, InclusionMode, NullValueMode, modifier},
    test_support::{Order, User},
};
use proptest::prelude::*;

fn spec(text: &str) -> CommandSpec {
    CommandSpec::new(text, CommandKind::StoredProcedure).unwrap()
}

fn with_inclusions(text: &str, names: &[String]) -> CommandSpec {
    let mut spec = spec(text);
    for name in names {
        spec.inclusions.insert(name.clone(), None);
    }
    spec
}

#[test]
fn equal_specs_hash_equal() {
    let mut a = spec("get_users");
    a.inclusions.insert("Id".to_string(), None);
    a.exclusions.insert("Secret".to_string());
    a.constants
        .insert("tenant".to_string(), modifier(|_| {}));

    // modifiers are closures and do not take part in identity
    let mut b = spec("get_users");
    b.inclusions
        .insert("Id".to_string(), Some(modifier(|p| p.size = Some(4))));
    b.exclusions.insert("Secret".to_string());
    b.constants
        .insert("tenant".to_string(), modifier(|p| p.size = Some(9)));

    assert_eq!(Fingerprint::of_command(&a), Fingerprint::of_command(&b));
}

#[test]
fn inclusion_order_changes_fingerprint() {
    let a = with_inclusions("get_users", &["Id".to_string(), "Name".to_string()]);
    let b = with_inclusions("get_users", &["Name".to_string(), "Id".to_string()]);

    assert_ne!(Fingerprint::of_command(&a), Fingerprint::of_command(&b));
}

#[test]
fn every_field_contributes() {
    let base = Fingerprint::of_command(&spec("get_users"));

    let text = spec("get_orders");
    let kind = CommandSpec::new("get_users", CommandKind::Text).unwrap();
    let mut inclusion = spec("get_users");
    inclusion.inclusion_mode = InclusionMode::Explicit;
    let mut nulls = spec("get_users");
    nulls.null_mode = NullValueMode::Full;
    let mut exclusion = spec("get_users");
    exclusion.exclusions.insert("Id".to_string());
    let mut constant = spec("get_users");
    constant.constants.insert("Id".to_string(), modifier(|_| {}));

    for variant in [text, kind, inclusion, nulls, exclusion, constant] {
        assert_ne!(base, Fingerprint::of_command(&variant), "{variant:?}");
    }
}

#[test]
fn string_boundaries_do_not_alias() {
    let a = with_inclusions("cmd", &["ab".to_string(), "c".to_string()]);
    let b = with_inclusions("cmd", &["a".to_string(), "bc".to_string()]);

    assert_ne!(Fingerprint::of_command(&a), Fingerprint::of_command(&b));
}

#[test]
fn same_key_in_different_collections_differs() {
    let mut a = spec("cmd");
    a.exclusions.insert("Id".to_string());
    let mut b = spec("cmd");
    b.constants.insert("Id".to_string(), modifier(|_| {}));

    assert_ne!(Fingerprint::of_command(&a), Fingerprint::of_command(&b));
}

#[test]
fn combine_is_order_sensitive() {
    let a = Fingerprint::of_type::<User>();
    let b = Fingerprint::of_type::<Order>();

    assert_ne!(a.combine(&b), b.combine(&a));
}

#[test]
fn result_type_hash_tracks_overrides_and_clearing() {
    let desc = TypeDescriptor::of::<User>();

    let plain = Fingerprint::of_result_type(&desc, false, std::iter::empty());
    let cleared = Fingerprint::of_result_type(&desc, true, std::iter::empty());
    let overridden = Fingerprint::of_result_type(&desc, false, ["name"].into_iter());
    let other = Fingerprint::of_result_type(&TypeDescriptor::of::<Order>(), false, std::iter::empty());

    assert_ne!(plain, cleared);
    assert_ne!(plain, overridden);
    assert_ne!(plain, other);
    assert_eq!(
        overridden,
        Fingerprint::of_result_type(&desc, false, ["name"].into_iter())
    );
}

#[test]
fn processor_key_differs_from_configuration_fingerprint() {
    let base = Fingerprint::of_command(&spec("get_users"));

    assert_ne!(base, base.for_processor::<User>());
    assert_ne!(base.for_processor::<User>(), base.for_processor::<Order>());
    assert_eq!(base.for_processor::<User>(), base.for_processor::<User>());
}

#[test]
fn hex_rendering_matches_display() {
    let fingerprint = Fingerprint::of_command(&spec("get_users"));

    assert_eq!(fingerprint.to_string(), fingerprint.as_hex());
    assert!(fingerprint.as_biguint().bits() > 0);
}

fn arb_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z_]{1,6}", 0..6)
}

proptest! {
    #[test]
    fn fingerprint_is_deterministic(text in "[a-z_]{1,12}", names in arb_names()) {
        let a = with_inclusions(&text, &names);
        let b = with_inclusions(&text, &names);

        prop_assert_eq!(Fingerprint::of_command(&a), Fingerprint::of_command(&b));
    }

    #[test]
    fn distinct_texts_do_not_collide(a in "[a-z_]{1,12}", b in "[a-z_]{1,12}") {
        prop_assume!(a != b);

        prop_assert_ne!(
            Fingerprint::of_command(&spec(&a)),
            Fingerprint::of_command(&spec(&b))
        );
    }
}
