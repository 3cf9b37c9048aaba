use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use shared::domain::{DateKey, DeviceId};
use tracing::info;
use uuid::Uuid;

const RANDOM_SUFFIX_LEN: usize = 13;

pub fn load_or_create_device_id(path: &Path) -> Result<DeviceId> {
    match fs::read_to_string(path) {
        Ok(raw) if !raw.trim().is_empty() => return Ok(DeviceId(raw.trim().to_string())),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| {
                format!("failed to read device id from '{}'", path.display())
            })
        }
    }

    let device_id = generate_device_id();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create parent directory '{}' for device id",
                parent.display()
            )
        })?;
    }
    fs::write(path, device_id.as_str())
        .with_context(|| format!("failed to persist device id to '{}'", path.display()))?;
    info!(device_id = %device_id, path = %path.display(), "identity: created device id");
    Ok(device_id)
}

pub fn generate_device_id() -> DeviceId {
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let random = Uuid::new_v4().simple().to_string();
    DeviceId(format!(
        "{}-{}",
        to_base36(millis),
        &random[..RANDOM_SUFFIX_LEN]
    ))
}

pub fn today_date_key() -> DateKey {
    date_key_for(Local::now().date_naive())
}

pub fn date_key_for(date: NaiveDate) -> DateKey {
    DateKey(date.format("%Y-%m-%d").to_string())
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
#[path = "tests/identity_tests.rs"]
mod tests;
