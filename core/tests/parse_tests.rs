//! End-to-end parsing behavior over a realistic registry.

use optline_core::*;

fn registry() -> OptionRegistry {
    let mut registry = OptionRegistry::new();
    registry
        .add("build", None, OptionKind::Verb, "Build the project")
        .unwrap()
        .add("clean", None, OptionKind::Verb, "Remove artifacts")
        .unwrap()
        .add("help", None, OptionKind::Verb, "Show help")
        .unwrap()
        .add("verbose", Some("v"), OptionKind::Flag, "Chatty output")
        .unwrap()
        .add_single(
            "mask",
            Some("m"),
            OptionKind::Parameter,
            ParameterType::Integer,
            Some("0"),
            "Bit mask",
        )
        .unwrap()
        .add_single(
            "enabled",
            Some("e"),
            OptionKind::Parameter,
            ParameterType::Boolean,
            Some("false"),
            "Toggle",
        )
        .unwrap()
        .add_single(
            "nums",
            Some("n"),
            OptionKind::MultiParameter,
            ParameterType::Integer,
            None,
            "Numbers",
        )
        .unwrap()
        .add("files", None, OptionKind::Unnamed, "Input files")
        .unwrap();
    registry
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[test]
fn prefixed_matches_mark_user_set() {
    for tokens in [
        vec!["--verbose"],
        vec!["-v"],
        vec!["--mask", "3"],
        vec!["-m", "3"],
        vec!["-n", "1", "--nums", "2"],
    ] {
        let mut registry = registry();
        registry.parse(tokens.clone()).unwrap();

        let name = match tokens[0].trim_start_matches('-') {
            "v" => "verbose",
            "m" => "mask",
            "n" => "nums",
            long => long,
        };
        let option = registry.get(name).unwrap();
        assert!(option.user_set, "{tokens:?}");
        assert!(option.count >= 1, "{tokens:?}");
    }
}

#[test]
fn unknown_prefixed_token_names_the_raw_token() {
    for token in ["--nope", "-x", "--v", "-verbose", "-", "--"] {
        let mut registry = registry();
        let err = registry.parse([token]).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownOption {
                token: token.to_string()
            }
        );
    }
}

#[test]
fn flag_round_trip() {
    let mut registry = registry();
    registry.set_default_parameter("files");

    registry.parse(["--verbose", "true"]).unwrap();

    let verbose = registry.get("verbose").unwrap();
    assert_eq!(verbose.bool(), Ok(true));
    assert_eq!(verbose.count, 1);
    // the following token was not consumed by the flag
    assert_eq!(registry.strings("files"), vec!["true"]);
}

#[test]
fn unparsed_flag_stays_false() {
    let mut registry = registry();
    registry.parse(Vec::<String>::new()).unwrap();

    assert_eq!(registry.has_flag("verbose"), Ok(false));
    assert_eq!(registry.get("verbose").unwrap().count, 0);
    assert!(!registry.get("verbose").unwrap().user_set);
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

#[test]
fn hex_integer_is_accepted() {
    let mut registry = registry();
    registry.parse(["--mask", "0x1F"]).unwrap();
    assert_eq!(registry.long("mask"), Ok(31));
    assert_eq!(registry.int("mask"), Ok(31));
    assert_eq!(registry.decimal("mask"), Ok(31.0));
    assert_eq!(registry.bool("mask"), Ok(true));
}

#[test]
fn non_numeric_integer_fails_with_signature() {
    let mut registry = registry();
    let err = registry.parse(["-m", "abc"]).unwrap_err();
    assert_eq!(
        err,
        ParseError::TypeCoercionFailure {
            option: "mask".to_string(),
            token: "abc".to_string(),
            expected: ParameterType::Integer,
            signature: vec![ParameterType::Integer],
        }
    );
}

#[test]
fn boolean_synonyms() {
    let falsy = ["0", "false", "off", "disabled", "disable", "no", " OFF ", "No"];
    let truthy = ["1", "true", "on", "enabled", "enable", "yes", "TRUE", " Yes\n"];

    for token in falsy {
        let mut registry = registry();
        registry.parse(["--enabled", token]).unwrap();
        assert_eq!(registry.bool("enabled"), Ok(false), "{token:?}");
    }
    for token in truthy {
        let mut registry = registry();
        registry.parse(["--enabled", token]).unwrap();
        assert_eq!(registry.bool("enabled"), Ok(true), "{token:?}");
    }
}

#[test]
fn other_boolean_literal_fails() {
    let mut registry = registry();
    let err = registry.parse(["-e", "sure"]).unwrap_err();
    assert!(matches!(
        err,
        ParseError::TypeCoercionFailure { ref option, ref token, expected: ParameterType::Boolean, .. }
            if option == "enabled" && token == "sure"
    ));
}

// ---------------------------------------------------------------------------
// Accumulation
// ---------------------------------------------------------------------------

#[test]
fn multi_parameter_accumulates_in_order() {
    let mut registry = registry();
    registry
        .parse(["--nums", "1", "--nums", "2", "--nums", "3"])
        .unwrap();

    let nums = registry.get("nums").unwrap();
    assert_eq!(nums.ints(), vec![1, 2, 3]);
    assert_eq!(nums.count, 3);
}

#[test]
fn multi_parameter_with_two_slots_appends_groups() {
    let mut registry = OptionRegistry::new();
    registry
        .add_with_slots(
            "range",
            Some("r"),
            OptionKind::MultiParameter,
            vec![
                ParameterSlot::with_default(ParameterType::Integer, "0"),
                ParameterSlot::new(ParameterType::String),
            ],
            "Start and label",
        )
        .unwrap();

    // before parsing only the placeholders are present
    assert_eq!(registry.get("range").unwrap().values.len(), 2);

    registry
        .parse(["--range", "10", "ten", "-r", "0x14", "twenty", "-r", "30", "thirty"])
        .unwrap();

    let range = registry.get("range").unwrap();
    assert_eq!(range.count, 3);
    assert_eq!(range.values.len(), 6);
    assert_eq!(
        range.strings(),
        vec!["10", "ten", "20", "twenty", "30", "thirty"]
    );
    assert_eq!(range.values[0], ValueCell::new(ParameterType::Integer, Value::Integer(10)));
    assert_eq!(range.values[5], ValueCell::text("thirty"));
}

#[test]
fn multi_parameter_group_missing_second_value() {
    let mut registry = OptionRegistry::new();
    registry
        .add_with_slots(
            "range",
            None,
            OptionKind::MultiParameter,
            vec![
                ParameterSlot::new(ParameterType::Integer),
                ParameterSlot::new(ParameterType::Integer),
            ],
            "",
        )
        .unwrap();

    let err = registry.parse(["--range", "1"]).unwrap_err();
    assert_eq!(
        err,
        ParseError::MissingValue {
            option: "range".to_string(),
            slot: 1,
            expected: ParameterType::Integer
        }
    );
}

#[test]
fn default_sink_collects_bare_tokens() {
    let mut registry = registry();
    registry.set_default_parameter("files");

    let summary = registry.parse(["a.txt", "b.txt"]).unwrap();

    assert_eq!(registry.strings("files"), vec!["a.txt", "b.txt"]);
    assert_eq!(summary.unnamed, 2);
    assert!(registry.exists("files"));
}

#[test]
fn bare_tokens_are_dropped_without_sink() {
    let mut registry = registry();
    let summary = registry.parse(["a.txt", "-v"]).unwrap();

    assert_eq!(summary.discarded, 1);
    assert!(registry.strings("files").is_empty());
    assert!(registry.is_parameter_null_or_empty("files"));
}

// ---------------------------------------------------------------------------
// Verbs
// ---------------------------------------------------------------------------

#[test]
fn verbs_fall_back_to_default() {
    let mut registry = registry();
    registry.set_default_verb("help");
    registry.parse(["-v"]).unwrap();
    assert_eq!(registry.verbs(), vec!["help"]);
}

#[test]
fn explicit_verb_replaces_default() {
    let mut registry = registry();
    registry.set_default_verb("help");
    let summary = registry.parse(["build"]).unwrap();

    assert_eq!(registry.verbs(), vec!["build"]);
    assert!(summary.last_match_verb_like);
}

#[test]
fn verbs_follow_registration_order() {
    let mut registry = registry();
    registry.parse(["clean", "build"]).unwrap();
    assert_eq!(registry.verbs(), vec!["build", "clean"]);
}

#[test]
fn no_verbs_without_default() {
    let mut registry = registry();
    registry.parse(["-v"]).unwrap();
    assert!(registry.verbs().is_empty());
}

// ---------------------------------------------------------------------------
// Accessor strictness
// ---------------------------------------------------------------------------

#[test]
fn singular_accessors_reject_zero_and_many() {
    let mut registry = registry();
    registry.parse(["-n", "1", "-n", "2"]).unwrap();

    assert_eq!(
        registry.long("nums"),
        Err(AccessError::MultipleValues {
            option: "nums".to_string(),
            count: 2
        })
    );
    assert_eq!(
        registry.string("files"),
        Err(AccessError::NoValue {
            option: "files".to_string()
        })
    );
    assert_eq!(
        registry.int("build"),
        Err(AccessError::NoValue {
            option: "build".to_string()
        })
    );
}

#[test]
fn parse_error_leaves_registry_untouched() {
    let mut registry = registry();
    let err = registry.parse(["-v", "--mask", "zz", "build"]).unwrap_err();

    assert!(matches!(err, ParseError::TypeCoercionFailure { .. }));
    assert!(!registry.get("verbose").unwrap().user_set);
    assert_eq!(registry.has_flag("verbose"), Ok(false));
    assert!(!registry.get("build").unwrap().user_set);
    assert_eq!(registry.int("mask"), Ok(0));

    // the same registry still parses a good command line afterwards
    registry.parse(["-v", "--mask", "3"]).unwrap();
    assert_eq!(registry.has_flag("verbose"), Ok(true));
    assert_eq!(registry.int("mask"), Ok(3));
}
