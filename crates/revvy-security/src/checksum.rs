use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use md5::Md5;
use sha2::{Digest, Sha256};

const READ_CHUNK_SIZE: usize = 64 * 1024;

pub fn md5_hex(payload: &[u8]) -> String {
    hex::encode(Md5::digest(payload))
}

pub fn sha256_hex(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

pub fn md5_reader_hex(reader: impl Read) -> Result<String> {
    digest_reader_hex::<Md5>(reader)
}

pub fn sha256_reader_hex(reader: impl Read) -> Result<String> {
    digest_reader_hex::<Sha256>(reader)
}

pub fn md5_file_hex(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("failed to open file for md5: {}", path.display()))?;
    md5_reader_hex(BufReader::new(file))
        .with_context(|| format!("failed hashing file: {}", path.display()))
}

pub fn sha256_file_hex(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("failed to open file for sha256: {}", path.display()))?;
    sha256_reader_hex(BufReader::new(file))
        .with_context(|| format!("failed hashing file: {}", path.display()))
}

/// Compares two hex digests ignoring case and surrounding whitespace.
pub fn digests_match(actual_hex: &str, expected_hex: &str) -> bool {
    actual_hex.trim().eq_ignore_ascii_case(expected_hex.trim())
}

fn digest_reader_hex<D: Digest>(mut reader: impl Read) -> Result<String> {
    let mut hasher = D::new();
    let mut buffer = vec![0_u8; READ_CHUNK_SIZE];
    loop {
        let read = reader
            .read(&mut buffer)
            .context("failed reading payload for digest")?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}
