//! Lint, fix and preset workflows over realistic files.

use modsight_config::{
    apply_preset, apply_safe_fixes, detect_config_issues, find_preset, ConfigFormat, IssueKind,
    RuleSet,
};
use proptest::prelude::*;

const SERVER_PROPERTIES: &str = "\
#Minecraft server properties
#Sat Oct 18 12:00:00 UTC 2026
enable-command-block=false
gamemode=survival
difficulty=Hard
level-name=world
motd=A Modded Server
online-mode=true
pvp=yes
server-port=70000
view-distance=48
simulation-distance=10
white-list=false
";

#[test]
fn lint_then_fix_server_properties() {
    let format = ConfigFormat::from_file_name("server.properties").unwrap();
    let rules = RuleSet::for_file("server.properties");

    let issues = detect_config_issues(SERVER_PROPERTIES, format, rules);
    let kinds: Vec<IssueKind> = issues.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![
            IssueKind::UnknownChoice,
            IssueKind::NotABoolean,
            IssueKind::OutOfRange,
            IssueKind::OutOfRange,
        ]
    );
    assert!(issues.iter().all(|i| i.is_fixable()));

    let outcome = apply_safe_fixes(SERVER_PROPERTIES, format, rules);
    assert!(outcome.remaining.is_empty());
    assert!(outcome.text.contains("\ndifficulty=hard\n"));
    assert!(outcome.text.contains("\npvp=true\n"));
    assert!(outcome.text.contains("\nserver-port=65535\n"));
    assert!(outcome.text.contains("\nview-distance=32\n"));
    assert!(outcome.text.starts_with("#Minecraft server properties\n#Sat Oct 18"));
}

#[test]
fn preset_after_fix() {
    let rules = RuleSet::for_file("server.properties");
    let fixed = apply_safe_fixes(SERVER_PROPERTIES, ConfigFormat::Properties, rules);
    let preset = find_preset("server.properties", "performance").unwrap();
    let outcome = apply_preset(&fixed.text, ConfigFormat::Properties, preset, rules).unwrap();

    assert!(outcome.text.contains("\nview-distance=8\n"));
    assert!(outcome.text.contains("\nsimulation-distance=6\n"));
    assert!(outcome.added.contains(&"sync-chunk-writes".to_string()));
    assert!(detect_config_issues(&outcome.text, ConfigFormat::Properties, rules).is_empty());
}

#[test]
fn options_txt_preset() {
    let text = "version:3465\nrenderDistance:32\nmaxFps:260\nkey_key.attack:key.mouse.left\n";
    let rules = RuleSet::for_file("options.txt");
    let preset = find_preset("options.txt", "low-end").unwrap();
    let outcome = apply_preset(text, ConfigFormat::Options, preset, rules).unwrap();

    assert!(outcome.text.starts_with("version:3465\nrenderDistance:6\nmaxFps:60\n"));
    assert!(outcome.text.contains("key_key.attack:key.mouse.left\n"));
    assert!(outcome.text.contains("\nao:false\n"));
}

fn options_line() -> impl Strategy<Value = String> {
    prop_oneof![
        (-50i64..100).prop_map(|n| format!("renderDistance:{n}")),
        (-2.0f64..3.0).prop_map(|x| format!("gamma:{x}")),
        prop::sample::select(vec!["true", "false", "maybe", "TRUE"]).prop_map(|b| format!("ao:{b}")),
        "[a-z]{1,8}:[a-z0-9]{0,8}",
        "[a-z ]{0,12}",
    ]
}

proptest! {
    #[test]
    fn fixing_twice_changes_nothing(lines in prop::collection::vec(options_line(), 0..30)) {
        let text = lines.join("\n");
        let rules = RuleSet::options_txt();
        let once = apply_safe_fixes(&text, ConfigFormat::Options, rules);
        let twice = apply_safe_fixes(&once.text, ConfigFormat::Options, rules);
        prop_assert_eq!(&twice.text, &once.text);
        prop_assert!(twice.applied.is_empty());
        prop_assert!(once.remaining.iter().all(|i| !i.is_fixable()));
    }

    #[test]
    fn untouched_lines_are_kept(lines in prop::collection::vec(options_line(), 1..30)) {
        let text = lines.join("\n");
        let outcome = apply_safe_fixes(&text, ConfigFormat::Options, RuleSet::options_txt());
        let fixed_lines: Vec<usize> = outcome.applied.iter().filter_map(|f| f.line).collect();
        let after: Vec<&str> = outcome.text.lines().collect();
        prop_assert_eq!(after.len(), text.lines().count());
        for (i, line) in text.lines().enumerate() {
            if !fixed_lines.contains(&(i + 1)) {
                prop_assert_eq!(after[i], line);
            }
        }
    }
}
