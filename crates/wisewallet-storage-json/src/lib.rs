use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde_json::{Map, Value};
use tracing::{debug, warn};
use wisewallet_core::{CoreError, KeyValueStore, Namespace};
use wisewallet_domain::Username;

const FILE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const GLOBAL_DIR: &str = "global";
const GLOBAL_FILE: &str = "user_prefs";
const USERS_DIR: &str = "users";

/// Filesystem-backed key-value store. Each namespace is one JSON object on
/// disk:
///
/// ```text
/// <root>/global/user_prefs.json
/// <root>/users/<encoded username>/{expenses,budget,notifications}.json
/// ```
///
/// Every write rewrites the namespace file through a temporary file and a
/// rename, so a crash leaves either the old or the new document.
pub struct JsonFileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn namespace_path(&self, namespace: &Namespace) -> PathBuf {
        match namespace {
            Namespace::Global => self
                .root
                .join(GLOBAL_DIR)
                .join(format!("{GLOBAL_FILE}.{FILE_EXTENSION}")),
            Namespace::User { username, domain } => self
                .user_dir(username)
                .join(format!("{}.{FILE_EXTENSION}", domain.as_str())),
        }
    }

    pub fn user_dir(&self, username: &Username) -> PathBuf {
        self.root
            .join(USERS_DIR)
            .join(encode_username(username.as_str()))
    }

    /// Usernames that have a data directory on disk.
    pub fn stored_usernames(&self) -> Result<Vec<Username>, CoreError> {
        let dir = self.root.join(USERS_DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let Some(raw) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            match decode_username(&raw) {
                Some(name) => names.push(Username::new(name)),
                None => debug!(dir = %raw, "skipping unrecognised user directory"),
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_document(&self, namespace: &Namespace) -> Result<Map<String, Value>, CoreError> {
        let path = self.namespace_path(namespace);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str::<Value>(&data) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => {
                warn!(path = %path.display(), "namespace file is not a JSON object");
                Ok(Map::new())
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "malformed namespace file");
                Ok(Map::new())
            }
        }
    }

    fn write_document(
        &self,
        namespace: &Namespace,
        document: &Map<String, Value>,
    ) -> Result<(), CoreError> {
        let path = self.namespace_path(namespace);
        let body = serde_json::to_string_pretty(document)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &body)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn update<F>(&self, namespace: &Namespace, edit: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| CoreError::Storage("json store lock poisoned".into()))?;
        let mut document = self.read_document(namespace)?;
        edit(&mut document);
        self.write_document(namespace, &document)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, namespace: &Namespace, key: &str) -> Result<Option<Value>, CoreError> {
        Ok(self.read_document(namespace)?.remove(key))
    }

    fn put(&self, namespace: &Namespace, key: &str, value: Value) -> Result<(), CoreError> {
        self.update(namespace, |document| {
            document.insert(key.to_string(), value);
        })
    }

    fn remove(&self, namespace: &Namespace, key: &str) -> Result<(), CoreError> {
        if !self.namespace_path(namespace).exists() {
            return Ok(());
        }
        self.update(namespace, |document| {
            document.remove(key);
        })
    }

    fn entries(&self, namespace: &Namespace) -> Result<BTreeMap<String, Value>, CoreError> {
        Ok(self.read_document(namespace)?.into_iter().collect())
    }

    fn clear(&self, namespace: &Namespace) -> Result<(), CoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| CoreError::Storage("json store lock poisoned".into()))?;
        let path = self.namespace_path(namespace);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        if let Namespace::User { username, .. } = namespace {
            remove_if_empty(&self.user_dir(username));
        }
        Ok(())
    }

    fn replace_all(
        &self,
        namespace: &Namespace,
        entries: BTreeMap<String, Value>,
    ) -> Result<(), CoreError> {
        if entries.is_empty() {
            return self.clear(namespace);
        }
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| CoreError::Storage("json store lock poisoned".into()))?;
        let document: Map<String, Value> = entries.into_iter().collect();
        self.write_document(namespace, &document)
    }
}

/// Maps a username to a single path segment. Lowercase ASCII letters, digits,
/// `-` and `_` pass through; every other byte, uppercase letters included,
/// becomes `%XX`. Two names therefore never collide on a case-insensitive
/// filesystem. The empty name maps to a lone `%`, which no other name can
/// produce.
pub fn encode_username(username: &str) -> String {
    if username.is_empty() {
        return "%".into();
    }
    let mut encoded = String::with_capacity(username.len());
    for byte in username.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => encoded.push(byte as char),
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}

pub fn decode_username(segment: &str) -> Option<String> {
    if segment == "%" {
        return Some(String::new());
    }
    let bytes = segment.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' {
            let hex = segment.get(idx + 1..idx + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            idx += 3;
        } else {
            decoded.push(bytes[idx]);
            idx += 1;
        }
    }
    String::from_utf8(decoded).ok()
}

fn remove_if_empty(dir: &Path) {
    let is_empty = fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);
    if is_empty {
        let _ = fs::remove_dir(dir);
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_encoding_is_reversible() {
        for name in ["alice", "Bob_2", "", "..", "a/b", "a%b", "ünï cødé", "%"] {
            let encoded = encode_username(name);
            assert!(!encoded.contains('/'));
            assert_ne!(encoded, ".");
            assert_ne!(encoded, "..");
            assert_eq!(decode_username(&encoded).as_deref(), Some(name), "{name}");
        }
        assert_ne!(encode_username(""), encode_username("%"));
    }

    #[test]
    fn names_differing_only_in_case_get_distinct_directories() {
        assert_eq!(encode_username("Bob"), "%42ob");
        assert_ne!(
            encode_username("Bob").to_lowercase(),
            encode_username("bob").to_lowercase()
        );
        assert_ne!(
            encode_username("ANA").to_lowercase(),
            encode_username("AnA").to_lowercase()
        );
    }

    #[test]
    fn tmp_path_keeps_original_extension() {
        let tmp = tmp_path(Path::new("/data/users/amy/budget.json"));
        assert_eq!(tmp, PathBuf::from("/data/users/amy/budget.json.tmp"));
    }
}
