use std::{fs, sync::Arc};

use crate::presets::{MAINNET, MINIMAL, WithdrawalPreset};

pub fn preset_parser(preset_string: &str) -> Result<Arc<WithdrawalPreset>, String> {
    match preset_string {
        "mainnet" => Ok(MAINNET.clone()),
        "minimal" => Ok(MINIMAL.clone()),
        path => read_preset(path),
    }
}

fn read_preset(path: &str) -> Result<Arc<WithdrawalPreset>, String> {
    let contents = fs::read_to_string(path).map_err(|err| format!("Failed to read file: {err}"))?;
    let preset: WithdrawalPreset = serde_yaml::from_str(&contents)
        .map_err(|err| format!("Failed to parse YAML from: {err}"))?;
    preset
        .validate()
        .map_err(|err| format!("Invalid preset {path}: {err}"))?;
    Ok(Arc::new(preset))
}
