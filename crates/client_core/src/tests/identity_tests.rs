use super::*;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_root(label: &str) -> std::path::PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    std::env::temp_dir().join(format!("daily_sudoku_{label}_{unique}"))
}

#[test]
fn device_id_is_created_once_and_reused() {
    let root = temp_root("identity");
    let path = root.join("nested").join("device_id");

    let first = load_or_create_device_id(&path).expect("create");
    let second = load_or_create_device_id(&path).expect("reload");

    assert_eq!(first, second);
    assert_eq!(
        fs::read_to_string(&path).expect("persisted"),
        first.as_str()
    );
    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn blank_file_is_replaced_with_new_id() {
    let root = temp_root("identity_blank");
    fs::create_dir_all(&root).expect("root");
    let path = root.join("device_id");
    fs::write(&path, "  \n").expect("seed blank");

    let device_id = load_or_create_device_id(&path).expect("create");
    assert!(!device_id.as_str().trim().is_empty());
    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn generated_ids_have_timestamp_and_random_parts() {
    let a = generate_device_id();
    let b = generate_device_id();
    assert_ne!(a, b);

    let (stamp, random) = a.as_str().split_once('-').expect("separator");
    assert!(stamp.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(random.len(), RANDOM_SUFFIX_LEN);
}

#[test]
fn date_key_is_zero_padded() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 7).expect("date");
    assert_eq!(date_key_for(date).as_str(), "2024-03-07");
    assert_eq!(today_date_key().as_str().len(), 10);
}

#[test]
fn base36_matches_known_values() {
    assert_eq!(to_base36(0), "0");
    assert_eq!(to_base36(35), "z");
    assert_eq!(to_base36(36), "10");
}

#[test]
fn unreadable_file_is_an_error_and_left_untouched() {
    let root = temp_root("identity_unreadable");
    fs::create_dir_all(&root).expect("root");
    let path = root.join("device_id");
    let garbage = [0xff_u8, 0xfe, 0x00, 0x41];
    fs::write(&path, garbage).expect("seed garbage");

    let err = load_or_create_device_id(&path).expect_err("invalid utf-8");
    assert!(err.to_string().contains("failed to read device id"));
    assert_eq!(fs::read(&path).expect("still there"), garbage);
    fs::remove_dir_all(root).expect("cleanup");
}
