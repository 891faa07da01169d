//! 屏幕图片上传
//!
//! 文件名清洗后加上本地时间前缀 `%Y%m%d_%H%M%S_`，写入上传目录；
//! 数据库只保存相对路径（`uploads/<文件名>`）。

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::config::UploadConfig;
use crate::errors::{CrmError, Result};

/// 同一秒内同名文件的最大重试次数
const MAX_NAME_ATTEMPTS: usize = 16;

/// 已保存的图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// 写入 `screen.image_path` 的相对路径
    pub relative_path: String,
    pub full_path: PathBuf,
}

/// 清洗客户端提供的文件名
///
/// 去掉路径部分，`[A-Za-z0-9._-]` 以外的字符替换为 `_`，去掉开头的点。
/// 清洗后为空时返回 `None`。
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// 加时间前缀
pub fn timestamped_filename<Tz: TimeZone>(sanitized: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}{}", now.format("%Y%m%d_%H%M%S_"), sanitized)
}

/// 保存上传的图片
///
/// 文件名清洗失败时返回校验错误；目录不存在时自动创建。
pub async fn save_image(
    config: &UploadConfig,
    original_name: &str,
    data: &[u8],
) -> Result<StoredImage> {
    let sanitized = sanitize_filename(original_name)
        .ok_or_else(|| CrmError::validation("image", "file name is not usable"))?;

    let dir = Path::new(&config.dir);
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        CrmError::file_operation(format!("Unable to create upload directory {}: {}", dir.display(), e))
    })?;

    let base = timestamped_filename(&sanitized, &Local::now());

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let filename = if attempt == 0 {
            base.clone()
        } else {
            with_suffix(&base, attempt)
        };
        let full_path = dir.join(&filename);

        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .await;

        let mut file = match file {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(CrmError::file_operation(format!(
                    "Unable to write file {}: {}",
                    full_path.display(),
                    e
                )));
            }
        };

        write_or_remove(&mut file, &full_path, data).await?;

        debug!("Stored upload {} ({} bytes)", full_path.display(), data.len());
        return Ok(StoredImage {
            relative_path: format!(
                "{}/{}",
                config.public_prefix.trim_end_matches('/'),
                filename
            ),
            full_path,
        });
    }

    Err(CrmError::file_operation(format!(
        "Unable to allocate a unique file name for {}",
        sanitized
    )))
}

/// 写入并刷新；任一步失败都删除 `path`，不留下半截文件
async fn write_or_remove<W: AsyncWrite + Unpin>(
    writer: &mut W,
    path: &Path,
    data: &[u8],
) -> Result<()> {
    let written = async {
        writer.write_all(data).await?;
        writer.flush().await
    }
    .await;

    if let Err(e) = written {
        remove_image(path).await;
        return Err(CrmError::file_operation(format!(
            "Unable to write file {}: {}",
            path.display(),
            e
        )));
    }
    Ok(())
}

/// 删除已保存的文件（数据库写入失败时回收）
pub async fn remove_image(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Failed to remove orphaned upload {}: {}", path.display(), e);
    }
}

fn with_suffix(filename: &str, n: usize) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, n, ext),
        _ => format!("{}_{}", filename, n),
    }
}
