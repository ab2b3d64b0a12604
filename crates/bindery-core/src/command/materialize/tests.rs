use super::*;
use crate::{
    command::{CommandKind, modifier},
    test_support::{RecordingDatabase, SearchFilter, Tags, UserFilter},
    value::Value,
};

fn spec(inclusion_mode: InclusionMode, null_mode: NullValueMode) -> CommandSpec {
    let mut spec = CommandSpec::new("get_users", CommandKind::StoredProcedure).unwrap();
    spec.inclusion_mode = inclusion_mode;
    spec.null_mode = null_mode;
    spec
}

fn names(parameters: &[Parameter]) -> Vec<&str> {
    parameters.iter().map(|p| p.name.as_str()).collect()
}

fn search_filter() -> SearchFilter {
    SearchFilter {
        id: 7,
        name: None,
        tags: Tags(vec!["red".to_string()]),
        active: true,
    }
}

#[test]
fn implicit_minimum_substitutes_sentinel_for_null_property() {
    let spec = spec(InclusionMode::Implicit, NullValueMode::FilterOnlyMinimum);
    let filter = UserFilter {
        id: Some(5),
        name: None,
    };

    let parameters =
        materialize(&spec, &RecordingDatabase::default(), Some(&filter), vec![]).unwrap();

    assert_eq!(
        parameters,
        vec![
            Parameter::input("Id", 5i64),
            Parameter {
                name: "Name".to_string(),
                db_type: Some(DbType::String),
                value: Value::DbNull,
                ..Parameter::default()
            },
        ]
    );
}

#[test]
fn null_mode_full_sends_sentinel_and_never_sends_null() {
    let filter = UserFilter::default();
    let db = RecordingDatabase::default();

    let full = materialize(
        &spec(InclusionMode::Implicit, NullValueMode::Full),
        &db,
        Some(&filter),
        vec![],
    )
    .unwrap();
    let never = materialize(
        &spec(InclusionMode::Implicit, NullValueMode::Never),
        &db,
        Some(&filter),
        vec![],
    )
    .unwrap();

    assert!(full.iter().all(|p| p.value == Value::DbNull));
    assert!(never.iter().all(|p| p.value == Value::Null));
}

#[test]
fn order_is_filter_then_constants_then_explicit() {
    let mut spec = spec(InclusionMode::Implicit, NullValueMode::Never);
    spec.constants.insert(
        "C".to_string(),
        modifier(|p| p.value = Value::Text("const".to_string())),
    );
    let filter = UserFilter {
        id: Some(1),
        name: Some("ice".to_string()),
    };

    let parameters = materialize(
        &spec,
        &RecordingDatabase::default(),
        Some(&filter),
        vec![Parameter::input("D", 4i64)],
    )
    .unwrap();

    assert_eq!(names(&parameters), ["Id", "Name", "C", "D"]);
    assert_eq!(parameters[2].direction, ParameterDirection::Input);
    assert_eq!(parameters[2].value, Value::Text("const".to_string()));
}

#[test]
fn explicit_mode_only_sends_included_properties() {
    let mut spec = spec(InclusionMode::Explicit, NullValueMode::Never);
    spec.inclusions.insert("active".to_string(), None);
    spec.inclusions.insert("id".to_string(), None);

    let parameters = materialize(
        &spec,
        &RecordingDatabase::default(),
        Some(&search_filter()),
        vec![],
    )
    .unwrap();

    assert_eq!(names(&parameters), ["active", "id"]);
}

#[test]
fn implicit_mode_honours_exclusions_and_skips_unmapped_types() {
    let mut spec = spec(InclusionMode::Implicit, NullValueMode::Never);
    spec.exclusions.insert("active".to_string());

    let parameters = materialize(
        &spec,
        &RecordingDatabase::default(),
        Some(&search_filter()),
        vec![],
    )
    .unwrap();

    // `tags` has no parameter type and no override
    assert_eq!(names(&parameters), ["id", "name"]);
}

#[test]
fn implicit_override_keeps_unmapped_property() {
    let mut spec = spec(InclusionMode::Implicit, NullValueMode::Never);
    spec.inclusions.insert(
        "tags".to_string(),
        Some(modifier(|p| p.db_type = Some(DbType::Structured))),
    );

    let parameters = materialize(
        &spec,
        &RecordingDatabase::default(),
        Some(&search_filter()),
        vec![],
    )
    .unwrap();

    assert_eq!(names(&parameters), ["id", "name", "tags", "active"]);
    assert_eq!(parameters[2].db_type, Some(DbType::Structured));
}

#[test]
fn explicit_mode_fails_on_unconvertible_property() {
    let mut spec = spec(InclusionMode::Explicit, NullValueMode::Never);
    spec.inclusions.insert("tags".to_string(), None);

    let err = materialize(
        &spec,
        &RecordingDatabase::default(),
        Some(&search_filter()),
        vec![],
    )
    .unwrap_err();

    assert!(matches!(
        err,
        MaterializeError::UnsupportedParameterType { ref parameter, kind: "list" } if parameter == "tags"
    ));
}

#[test]
fn explicit_mode_fails_on_unknown_property() {
    let mut spec = spec(InclusionMode::Explicit, NullValueMode::Never);
    spec.inclusions.insert("missing".to_string(), None);

    let err = materialize(
        &spec,
        &RecordingDatabase::default(),
        Some(&search_filter()),
        vec![],
    )
    .unwrap_err();

    assert!(matches!(
        err,
        MaterializeError::UnknownProperty { ref property, .. } if property == "missing"
    ));
    assert_eq!(err.class(), ErrorClass::NotFound);
}

#[test]
fn modifier_output_only_substituted_under_full_filter_modes() {
    let null_out = modifier(|p| p.value = Value::Null);
    let filter = UserFilter {
        id: Some(1),
        name: Some("ice".to_string()),
    };

    let mut minimum = spec(InclusionMode::Explicit, NullValueMode::FilterOnlyMinimum);
    minimum
        .inclusions
        .insert("Name".to_string(), Some(null_out.clone()));
    let mut filter_full = spec(InclusionMode::Explicit, NullValueMode::FilterOnlyFull);
    filter_full
        .inclusions
        .insert("Name".to_string(), Some(null_out));

    let db = RecordingDatabase::default();
    let minimum = materialize(&minimum, &db, Some(&filter), vec![]).unwrap();
    let filter_full = materialize(&filter_full, &db, Some(&filter), vec![]).unwrap();

    assert_eq!(minimum[0].value, Value::Null);
    assert_eq!(filter_full[0].value, Value::DbNull);
}

#[test]
fn explicit_parameter_nulls_follow_explicit_modes() {
    let db = RecordingDatabase::default();
    let explicit = || vec![Parameter::input("D", None::<i64>)];

    let explicit_only = materialize::<(), _>(
        &spec(InclusionMode::Implicit, NullValueMode::ExplicitParametersOnly),
        &db,
        None,
        explicit(),
    )
    .unwrap();
    let filter_full = materialize::<(), _>(
        &spec(InclusionMode::Implicit, NullValueMode::FilterOnlyFull),
        &db,
        None,
        explicit(),
    )
    .unwrap();

    assert_eq!(explicit_only[0].value, Value::DbNull);
    assert_eq!(filter_full[0].value, Value::Null);
}

#[test]
fn missing_filter_yields_constants_and_explicit_only() {
    let mut spec = spec(InclusionMode::Explicit, NullValueMode::Full);
    spec.inclusions.insert("missing".to_string(), None);
    spec.constants
        .insert("tenant".to_string(), modifier(|p| p.value = Value::Int(9)));

    let parameters = materialize::<SearchFilter, _>(
        &spec,
        &RecordingDatabase::default(),
        None,
        vec![Parameter::input("D", 1i64)],
    )
    .unwrap();

    assert_eq!(names(&parameters), ["tenant", "D"]);
}
