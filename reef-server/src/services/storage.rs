//! File storage and signed URLs
//!
//! Uploads are a two-step handshake: the client asks for a signed URL,
//! then PUTs the bytes to it. The signature covers file id, purpose and
//! expiry, so a URL cannot be replayed for another file or after its
//! window closes. Bytes live on disk under the work directory; the
//! database only holds metadata.

use std::path::{Path, PathBuf};

use hmac::{Hmac, Mac};
use sha2::Sha256;

use shared::error::{AppError, ErrorCode};
use shared::util::now_millis;

type HmacSha256 = Hmac<Sha256>;

/// Signed upload URLs stay valid this long
const UPLOAD_URL_TTL_MS: i64 = 15 * 60 * 1000;

const PURPOSE_UPLOAD: &str = "upload";

/// A signed URL with its absolute expiry (epoch milliseconds)
#[derive(Debug, Clone, serde::Serialize)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: i64,
}

/// Issues and verifies HMAC-signed file URLs
#[derive(Clone)]
pub struct UrlSigner {
    secret: Vec<u8>,
    base_url: String,
}

impl UrlSigner {
    pub fn new(secret: &str, base_url: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn signature(
        &self,
        purpose: &str,
        file_id: i64,
        expires_at: i64,
    ) -> Result<String, AppError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AppError::internal("HMAC key error"))?;
        mac.update(format!("{purpose}:{file_id}:{expires_at}").as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Signed PUT target for uploading the bytes of a pending file
    pub fn sign_upload(&self, file_id: i64) -> Result<SignedUrl, AppError> {
        let expires_at = now_millis() + UPLOAD_URL_TTL_MS;
        let sig = self.signature(PURPOSE_UPLOAD, file_id, expires_at)?;
        Ok(SignedUrl {
            url: format!(
                "{}/api/files/{file_id}/content?expires={expires_at}&sig={sig}",
                self.base_url
            ),
            expires_at,
        })
    }

    /// Verify an upload signature. Expiry is checked first so an
    /// attacker cannot distinguish a stale URL from a forged one by
    /// timing the HMAC.
    pub fn verify_upload(&self, file_id: i64, expires_at: i64, sig: &str) -> Result<(), AppError> {
        if expires_at <= now_millis() {
            return Err(AppError::new(ErrorCode::SignatureExpired));
        }

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AppError::new(ErrorCode::SignatureInvalid))?;
        mac.update(format!("{PURPOSE_UPLOAD}:{file_id}:{expires_at}").as_bytes());

        let sig_bytes =
            hex::decode(sig).map_err(|_| AppError::new(ErrorCode::SignatureInvalid))?;
        mac.verify_slice(&sig_bytes)
            .map_err(|_| AppError::new(ErrorCode::SignatureInvalid))?;

        Ok(())
    }
}

/// On-disk file store rooted at `{work_dir}/uploads`
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Fresh storage key: a UUID plus the original extension when it is
    /// plain alphanumeric. Client file names never reach the filesystem.
    pub fn new_key(file_name: &str) -> String {
        let id = uuid::Uuid::new_v4();
        match Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            Some(ext) => format!("{id}.{}", ext.to_ascii_lowercase()),
            None => id.to_string(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    pub async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), AppError> {
        tokio::fs::write(self.path_for(key), bytes)
            .await
            .map_err(|e| {
                AppError::with_message(ErrorCode::StorageError, format!("Write failed: {e}"))
            })
    }

    pub async fn read(&self, key: &str) -> Result<Vec<u8>, AppError> {
        tokio::fs::read(self.path_for(key)).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::new(ErrorCode::FileNotFound)
            } else {
                AppError::with_message(ErrorCode::StorageError, format!("Read failed: {e}"))
            }
        })
    }

    /// Delete stored bytes. Missing files are fine: metadata cleanup
    /// must not fail because the bytes are already gone.
    pub async fn remove(&self, key: &str) -> Result<(), AppError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_message(
                ErrorCode::StorageError,
                format!("Delete failed: {e}"),
            )),
        }
    }
}
