use super::*;

#[test]
fn selection_is_one_based_and_bounded() {
    assert_eq!(
        parse_line("1 9"),
        Some(LineInput::Select { row: 0, col: 8 })
    );
    assert_eq!(parse_line("10 10"), None);
    assert_eq!(parse_line("0 3"), None);
    assert_eq!(parse_line("3 x"), None);
}

#[test]
fn aliases_and_key_names_map_to_keys() {
    assert_eq!(parse_line("del"), Some(LineInput::Key(InputKey::Delete)));
    assert_eq!(
        parse_line("up"),
        Some(LineInput::Key(InputKey::Move(Direction::Up)))
    );
    assert_eq!(
        parse_line("ArrowRight"),
        Some(LineInput::Key(InputKey::Move(Direction::Right)))
    );
    assert_eq!(parse_line("7"), Some(LineInput::Key(InputKey::Digit(7))));
    assert_eq!(parse_line("n"), Some(LineInput::Key(InputKey::ToggleNotes)));
    assert_eq!(parse_line("dance"), None);
}

#[test]
fn cli_flags_override_loaded_settings() {
    let args = Args::parse_from(["desktop", "--server-url", "http://cli.local", "--difficulty", "easy"]);
    let settings = merge_args(Settings::default(), &args);
    assert_eq!(settings.server_url, "http://cli.local");
    assert_eq!(settings.difficulty, Difficulty::Easy);
    assert_eq!(settings.device_id_path, Settings::default().device_id_path);
}
