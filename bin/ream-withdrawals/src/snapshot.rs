use std::{fs, path::Path};

use anyhow::{anyhow, bail};
use serde::{Serialize, de::DeserializeOwned};
use snap::raw::{Decoder, Encoder};
use ssz::{Decode, Encode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Ssz,
    SszSnappy,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow!("Invalid snapshot path: {}", path.display()))?;

        if file_name.ends_with(".ssz_snappy") {
            Ok(Self::SszSnappy)
        } else if file_name.ends_with(".ssz") {
            Ok(Self::Ssz)
        } else if file_name.ends_with(".json") {
            Ok(Self::Json)
        } else {
            bail!("Unsupported snapshot format, expected .json, .ssz or .ssz_snappy: {file_name}")
        }
    }
}

pub fn read_snapshot<T: DeserializeOwned + Decode>(path: &Path) -> anyhow::Result<T> {
    let bytes = fs::read(path)
        .map_err(|err| anyhow!("Failed to read {}: {err}", path.display()))?;

    match SnapshotFormat::from_path(path)? {
        SnapshotFormat::Json => Ok(serde_json::from_slice(&bytes)?),
        SnapshotFormat::Ssz => decode_ssz(&bytes),
        SnapshotFormat::SszSnappy => {
            let mut decoder = Decoder::new();
            let ssz = decoder.decompress_vec(&bytes)?;
            decode_ssz(&ssz)
        }
    }
}

pub fn write_snapshot<T: Serialize + Encode>(path: &Path, value: &T) -> anyhow::Result<()> {
    let bytes = match SnapshotFormat::from_path(path)? {
        SnapshotFormat::Json => serde_json::to_vec_pretty(value)?,
        SnapshotFormat::Ssz => value.as_ssz_bytes(),
        SnapshotFormat::SszSnappy => Encoder::new().compress_vec(&value.as_ssz_bytes())?,
    };
    fs::write(path, bytes).map_err(|err| anyhow!("Failed to write {}: {err}", path.display()))
}

fn decode_ssz<T: Decode>(bytes: &[u8]) -> anyhow::Result<T> {
    T::from_ssz_bytes(bytes).map_err(|err| anyhow!("Failed to decode SSZ: {err:?}"))
}
