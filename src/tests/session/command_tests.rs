use super::*;

#[test]
fn blank_input_is_a_no_op() {
    assert_eq!(parse_command(""), Ok(None));
    assert_eq!(parse_command("   \t "), Ok(None));
}

#[test]
fn run_line_splits_command_and_args() {
    let cmd = parse_command("run build --flag").expect("parse").expect("command");
    let Command::Run { line } = cmd else {
        panic!("expected run, got {:?}", cmd);
    };
    assert_eq!(line, "build --flag");

    let run = RunLine::parse(&line).expect("run line");
    assert_eq!(run.command, "build");
    assert_eq!(run.args, vec!["--flag".to_string()]);
}

#[test]
fn verb_is_case_insensitive_and_remainder_is_kept_verbatim() {
    assert_eq!(
        parse_command("  ADD   Fix   the  bug  "),
        Ok(Some(Command::Add {
            title: "Fix   the  bug".to_string()
        }))
    );
    assert_eq!(parse_command("Claim"), Ok(Some(Command::Claim)));
}

#[test]
fn refresh_alias() {
    assert_eq!(parse_command("r"), Ok(Some(Command::Refresh)));
    assert_eq!(parse_command("refresh"), Ok(Some(Command::Refresh)));
}

#[test]
fn missing_remainder_is_empty_not_an_error() {
    assert_eq!(
        parse_command("note"),
        Ok(Some(Command::Note {
            content: String::new()
        }))
    );
    assert_eq!(RunLine::parse("   "), None);
}

#[test]
fn unknown_verb_names_the_verb() {
    let err = parse_command("Frobnicate now").expect_err("unknown verb");
    assert_eq!(err, SessionError::UnknownCommand("frobnicate".to_string()));
    assert!(err.to_string().contains("frobnicate"));
}

#[test]
fn split_verb_splits_on_first_whitespace_run() {
    assert_eq!(
        split_verb("query  hello world"),
        Some(("query".to_string(), "hello world"))
    );
    assert_eq!(split_verb("workers"), Some(("workers".to_string(), "")));
    assert_eq!(split_verb(""), None);
}

#[test]
fn every_listed_command_and_alias_parses() {
    for def in COMMANDS {
        let cmd = parse_command(def.name).expect("listed name").expect("command");
        assert_eq!(cmd.verb(), def.name);
        for alias in def.aliases {
            let aliased = parse_command(alias).expect("listed alias").expect("command");
            assert_eq!(aliased.verb(), def.name);
        }
    }
}
