use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const BUFFER_SIZE: usize = 4 * 1024 * 1024; // 4MB buffer

/// 截取的摘要長度（128 bits）
const DIGEST_BYTES: usize = 16;

/// 檔案內容雜湊，作為快取的鍵值
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 只接受 32 個小寫十六進位字元
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == DIGEST_BYTES * 2
            && raw
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| Self(raw.to_string()))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 串流讀取完整檔案內容計算 BLAKE3，取前 128 bits
pub fn calculate_content_hash(path: &Path) -> Result<ContentHash> {
    let file = File::open(path).with_context(|| format!("無法開啟檔案: {}", path.display()))?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .with_context(|| format!("讀取檔案失敗: {}", path.display()))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let digest = hasher.finalize();
    Ok(ContentHash(digest.to_hex()[..DIGEST_BYTES * 2].to_string()))
}
