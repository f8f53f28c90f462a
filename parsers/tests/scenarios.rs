use std::io::Write;

use optstream_core::{
    CommandLineStyle, OptionDescription, OptionRegistry, ParseError, PositionalDescription,
    RecognizedItem, ValueSemantics,
};
use optstream_parsers::encoding::to_narrow;
use optstream_parsers::{
    CommandLineParser, EnvironmentSnapshot, WideCommandLineParser, parse_command_line,
    parse_config_file, parse_config_str, parse_environment_with_prefix,
};

fn app_registry() -> OptionRegistry {
    OptionRegistry::new()
        .with(OptionDescription::flag("verbose,v"))
        .with(OptionDescription::value("level,l"))
        .with(OptionDescription::new(
            "define,D",
            ValueSemantics::single().multitoken(),
        ))
        .with(OptionDescription::new(
            "color",
            ValueSemantics::single().implicit(),
        ))
}

fn summary(items: &[RecognizedItem]) -> Vec<(Option<String>, Option<usize>, Vec<String>)> {
    items
        .iter()
        .map(|i| (i.name.clone(), i.position, i.values.clone()))
        .collect()
}

fn strings(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn verbose_level_input_scenario() {
    let registry = OptionRegistry::new()
        .with(OptionDescription::flag("verbose"))
        .with(OptionDescription::value("level"));
    let result =
        parse_command_line(["--verbose", "--level", "3", "input.txt"], Some(&registry)).unwrap();

    assert_eq!(
        summary(&result.items),
        vec![
            (Some("verbose".to_string()), None, vec![]),
            (Some("level".to_string()), None, strings(&["3"])),
            (None, Some(0), strings(&["input.txt"])),
        ]
    );
}

#[test]
fn environment_prefix_scenario() {
    let registry = app_registry();
    let env: EnvironmentSnapshot = [("APP_HOST", "x"), ("OTHER", "y")].into_iter().collect();
    let result = parse_environment_with_prefix(&registry, &env, "APP_");

    assert_eq!(
        summary(&result.items),
        vec![(Some("host".to_string()), None, strings(&["x"]))]
    );
}

#[test]
fn config_file_scenario() {
    let registry = OptionRegistry::new().with(OptionDescription::value("level"));
    let result = parse_config_str("level = 5\n", &registry).unwrap();

    assert_eq!(
        summary(&result.items),
        vec![(Some("level".to_string()), None, strings(&["5"]))]
    );
}

#[test]
fn config_file_from_disk() {
    let registry = app_registry();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# defaults").unwrap();
    writeln!(file, "verbose = true").unwrap();
    writeln!(file, "level = 2").unwrap();

    let reader = std::io::BufReader::new(std::fs::File::open(file.path()).unwrap());
    let result = parse_config_file(reader, &registry).unwrap();
    let names: Vec<_> = result.iter().filter_map(|i| i.name.as_deref()).collect();
    assert_eq!(names, vec!["verbose", "level"]);
}

#[test]
fn order_is_preserved() {
    let registry = app_registry();
    let args = ["a", "-v", "b", "--level=1", "c", "--color", "-D", "x", "y", "--", "-v"];
    let result = parse_command_line(args, Some(&registry)).unwrap();

    let origin: Vec<String> = result
        .iter()
        .map(|i| i.original_tokens.join(" "))
        .collect();
    assert_eq!(
        origin,
        strings(&["a", "-v", "b", "--level=1", "c", "--color", "-D x y", "-v"])
    );
    let positions: Vec<_> = result.iter().filter_map(|i| i.position).collect();
    assert_eq!(positions, vec![0, 1, 2, 3]);
}

#[test]
fn positional_boundary() {
    let registry = app_registry();
    let mut positional = PositionalDescription::new();
    positional.add("file", Some(3));

    let ok = CommandLineParser::new(["a", "-v", "b", "c"])
        .options(&registry)
        .positional(&positional)
        .run()
        .unwrap();
    let positions: Vec<_> = ok.iter().filter_map(|i| i.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);

    let err = CommandLineParser::new(["a", "b", "c", "d"])
        .options(&registry)
        .positional(&positional)
        .run()
        .unwrap_err();
    assert!(matches!(
        err,
        ParseError::TooManyPositionalArguments { max: 3 }
    ));
}

#[test]
fn wide_bridge_matches_narrow_parse() {
    let registry = app_registry();
    let raw = ["-l", "ünïcødé", "--define", "π=3.14", "Ω", "файл"];
    let narrow = parse_command_line(raw, Some(&registry)).unwrap();

    let wide_args: Vec<Vec<u16>> = raw.iter().map(|s| s.encode_utf16().collect()).collect();
    let wide = WideCommandLineParser::new(&wide_args)
        .unwrap()
        .options(&registry)
        .run()
        .unwrap();

    assert_eq!(wide.wide.len(), narrow.len());
    for (w, n) in wide.wide.iter().zip(narrow.iter()) {
        assert_eq!(w.name, n.name);
        assert_eq!(w.position, n.position);
        let values: Vec<String> = w.values.iter().map(|v| to_narrow(v).unwrap()).collect();
        assert_eq!(values, n.values);
    }
}

#[test]
fn parsing_is_idempotent() {
    let registry = app_registry();
    let args = ["-vl", "9", "--color=red", "x"];
    let first = parse_command_line(args, Some(&registry)).unwrap();
    let second = parse_command_line(args, Some(&registry)).unwrap();
    assert_eq!(first, second);

    let env: EnvironmentSnapshot = [("APP_A", "1"), ("APP_B", "2")].into_iter().collect();
    assert_eq!(
        parse_environment_with_prefix(&registry, &env, "APP_"),
        parse_environment_with_prefix(&registry, &env, "APP_")
    );
}

#[test]
fn style_loaded_from_yaml_changes_matching() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("style.yaml");
    std::fs::write(&path, "allow_guessing: true\nallow_unregistered: true\n").unwrap();
    let style = CommandLineStyle::load(&path).unwrap();

    let registry = app_registry();
    let result = CommandLineParser::new(["--verb", "--extra=1"])
        .options(&registry)
        .style(style)
        .run()
        .unwrap();

    assert_eq!(result.items[0].name.as_deref(), Some("verbose"));
    assert_eq!(result.items[1].name.as_deref(), Some("extra"));
    assert!(result.items[1].unregistered);
}

#[test]
fn failures_abort_whole_parse() {
    let registry = app_registry();
    assert!(matches!(
        parse_command_line(["ok", "--unknown"], Some(&registry)),
        Err(ParseError::UnrecognizedOption(_))
    ));
    assert!(matches!(
        parse_command_line(["ok", "--level"], Some(&registry)),
        Err(ParseError::MissingOptionValue(_))
    ));
    assert!(matches!(
        parse_config_str("nope = 1\n", &registry),
        Err(ParseError::UnrecognizedOption(_))
    ));
}
