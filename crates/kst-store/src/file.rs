//! File-backed persistence with atomic replacement.
//!
//! The format is dispatched on extension: `.json` holds the serde
//! document forms; anything else is the text states format. Writers go
//! through a tmp file and rename so a crashed write never leaves a
//! truncated structure behind.

use crate::StoreError;
use crate::text::{TextFormat, parse_states, render_states};
use kst_assess::ProbabilisticKnowledgeStructure;
use kst_kernel::KnowledgeStructure;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn io_error(path: &Path, e: impl std::fmt::Display) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Read a structure from disk, dispatching on extension.
pub fn read_structure(path: impl AsRef<Path>) -> Result<KnowledgeStructure, StoreError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
    validate_substrate_bytes(path, &bytes)?;
    let text = String::from_utf8(bytes)
        .map_err(|_| StoreError::Corrupt(format!("{}: not UTF-8", path.display())))?;

    if is_json(path) {
        serde_json::from_str(&text).map_err(|e| StoreError::Json(e.to_string()))
    } else {
        parse_states(&text, &TextFormat::default())
    }
}

/// Write a structure to disk atomically, dispatching on extension.
pub fn write_structure(
    path: impl AsRef<Path>,
    ks: &KnowledgeStructure,
) -> Result<(), StoreError> {
    let path = path.as_ref();
    let bytes = if is_json(path) {
        let mut out = serde_json::to_vec_pretty(ks).map_err(|e| StoreError::Json(e.to_string()))?;
        out.push(b'\n');
        out
    } else {
        render_states(ks, &TextFormat::default()).into_bytes()
    };
    atomic_write(path, &bytes)
}

/// Read a probabilistic structure (JSON only).
pub fn read_probabilistic(
    path: impl AsRef<Path>,
) -> Result<ProbabilisticKnowledgeStructure, StoreError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
    validate_substrate_bytes(path, &bytes)?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Json(e.to_string()))
}

/// Write a probabilistic structure (JSON only), atomically.
pub fn write_probabilistic(
    path: impl AsRef<Path>,
    pks: &ProbabilisticKnowledgeStructure,
) -> Result<(), StoreError> {
    let path = path.as_ref();
    let mut bytes =
        serde_json::to_vec_pretty(pks).map_err(|e| StoreError::Json(e.to_string()))?;
    bytes.push(b'\n');
    atomic_write(path, &bytes)
}

/// Write bytes through a tmp file, then rename over the target and sync
/// the parent directory.
fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> Result<(), StoreError> {
        let mut file = File::create(&tmp_path).map_err(|e| io_error(&tmp_path, e))?;
        file.write_all(bytes).map_err(|e| io_error(&tmp_path, e))?;
        file.sync_all().map_err(|e| io_error(&tmp_path, e))?;
        Ok(())
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_error(path, e)
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        let dir = File::open(parent).map_err(|e| io_error(parent, e))?;
        dir.sync_all().map_err(|e| io_error(parent, e))?;
    }

    Ok(())
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}

fn validate_substrate_bytes(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if bytes.contains(&0) {
        return Err(StoreError::Corrupt(format!(
            "{}: contains NUL byte(s)",
            path.display()
        )));
    }
    if std::str::from_utf8(bytes).is_err() {
        return Err(StoreError::Corrupt(format!(
            "{}: contains non-UTF-8 byte sequence(s)",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kst_kernel::Domain;

    fn temp_path(prefix: &str, ext: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "kst-store-{prefix}-{}-{unique}.{ext}",
            std::process::id()
        ))
    }

    fn sample_structure() -> KnowledgeStructure {
        let domain = Domain::new(["A", "B", "C"]).unwrap();
        KnowledgeStructure::from_state_labels(
            domain,
            [
                vec![],
                vec!["A"],
                vec!["B"],
                vec!["A", "B"],
                vec!["A", "C"],
                vec!["B", "C"],
                vec!["A", "B", "C"],
            ],
        )
        .unwrap()
    }

    #[test]
    fn text_roundtrip_through_disk() {
        let path = temp_path("text", "states");
        let ks = sample_structure();
        write_structure(&path, &ks).expect("write should succeed");
        let back = read_structure(&path).expect("read should succeed");
        assert_eq!(back.fingerprint(), ks.fingerprint());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn json_roundtrip_through_disk() {
        let path = temp_path("json", "json");
        let ks = sample_structure();
        write_structure(&path, &ks).expect("write should succeed");
        let back = read_structure(&path).expect("read should succeed");
        assert_eq!(back, ks);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn write_replaces_atomically() {
        let path = temp_path("atomic", "states");
        let ks = sample_structure();
        write_structure(&path, &ks).expect("first write");
        let trivial = KnowledgeStructure::trivial(Domain::new(["Z"]).unwrap());
        write_structure(&path, &trivial).expect("second write");
        let back = read_structure(&path).expect("read");
        assert_eq!(back.fingerprint(), trivial.fingerprint());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn read_rejects_nul_payload() {
        let path = temp_path("nul", "states");
        fs::write(&path, b"A\nA,B\n\0garbage").expect("fixture should write");
        match read_structure(&path) {
            Err(StoreError::Corrupt(message)) => assert!(message.contains("NUL")),
            other => panic!("expected corrupt substrate error, got {other:?}"),
        }
        let _ = fs::remove_file(path);
    }

    #[test]
    fn read_rejects_non_utf8_payload() {
        let path = temp_path("non-utf8", "states");
        fs::write(&path, [0xff, 0xfe, 0xfd]).expect("fixture should write");
        match read_structure(&path) {
            Err(StoreError::Corrupt(message)) => assert!(message.contains("non-UTF-8")),
            other => panic!("expected corrupt substrate error, got {other:?}"),
        }
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        match read_structure("/nonexistent/kst/input.states") {
            Err(StoreError::Io { .. }) => {}
            other => panic!("expected I/O error, got {other:?}"),
        }
    }

    #[test]
    fn probabilistic_roundtrip_through_disk() {
        let path = temp_path("pks", "json");
        let ks = sample_structure();
        let full = ks.domain().full_mask();
        let pks = ProbabilisticKnowledgeStructure::point_mass(ks, full).unwrap();
        write_probabilistic(&path, &pks).expect("write should succeed");
        let back = read_probabilistic(&path).expect("read should succeed");
        assert_eq!(back.probability_of_state(full), 1.0);
        let _ = fs::remove_file(path);
    }
}
