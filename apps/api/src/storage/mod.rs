//! Encrypted single-file store for the profile record.
//!
//! One AES-256-GCM sealed file holds the JSON-serialized `ProfileRecord`
//! (profile fields + API credentials). File layout: 12-byte nonce followed by
//! ciphertext + tag. Reads never fail — a missing, empty, tampered, or
//! undecodable file degrades to the default record so a corrupt store can
//! never take the service down.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;
use tracing::warn;

use crate::models::profile::ProfileRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("profile store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("profile store encryption failed")]
    Crypto,

    #[error("profile record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct ProfileStore {
    path: PathBuf,
    key: Arc<LessSafeKey>,
    rng: SystemRandom,
}

impl ProfileStore {
    /// `key_b64` is a base64-encoded 32-byte AES-256-GCM key.
    pub fn new(path: PathBuf, key_b64: &str) -> anyhow::Result<Self> {
        let key_bytes = BASE64
            .decode(key_b64.trim())
            .context("ENCRYPTION_KEY is not valid base64")?;
        anyhow::ensure!(
            key_bytes.len() == 32,
            "ENCRYPTION_KEY must decode to exactly 32 bytes, got {}",
            key_bytes.len()
        );
        let unbound = UnboundKey::new(&aead::AES_256_GCM, &key_bytes)
            .map_err(|_| anyhow::anyhow!("failed to initialize the encryption key"))?;

        Ok(Self {
            path,
            key: Arc::new(LessSafeKey::new(unbound)),
            rng: SystemRandom::new(),
        })
    }

    /// Reads and decrypts the stored record. Never raises: any failure
    /// degrades to the default record.
    pub async fn read(&self) -> ProfileRecord {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "profile store file {} not found, using default record",
                    self.path.display()
                );
                return ProfileRecord::default();
            }
            Err(e) => {
                warn!("failed to read profile store: {e}, using default record");
                return ProfileRecord::default();
            }
        };

        if bytes.is_empty() {
            warn!("profile store file is empty, using default record");
            return ProfileRecord::default();
        }

        match self.open(bytes) {
            Ok(record) => record,
            Err(e) => {
                warn!("failed to decrypt profile store: {e}, using default record");
                ProfileRecord::default()
            }
        }
    }

    /// Serializes, seals, and writes the record. Unlike reads, write failures
    /// surface to the caller.
    pub async fn write(&self, record: &ProfileRecord) -> Result<(), StoreError> {
        let sealed = self.seal(serde_json::to_vec(record)?)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, sealed).await?;
        Ok(())
    }

    fn seal(&self, mut plaintext: Vec<u8>) -> Result<Vec<u8>, StoreError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| StoreError::Crypto)?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        self.key
            .seal_in_place_append_tag(nonce, Aad::empty(), &mut plaintext)
            .map_err(|_| StoreError::Crypto)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + plaintext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&plaintext);
        Ok(sealed)
    }

    fn open(&self, mut sealed: Vec<u8>) -> Result<ProfileRecord, StoreError> {
        if sealed.len() <= NONCE_LEN {
            return Err(StoreError::Crypto);
        }
        let mut body = sealed.split_off(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(&sealed).map_err(|_| StoreError::Crypto)?;

        // Authenticated decryption: tampered ciphertext fails here.
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut body)
            .map_err(|_| StoreError::Crypto)?;

        Ok(serde_json::from_slice(plaintext)?)
    }
}
