//! Writing downloaded documents and conversation exports to disk.

use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;

const EXPORT_STAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]-[minute]-[second]");

/// `conversation_history_<timestamp>.docx`, the name the backend export is saved under.
pub fn conversation_export_name(at: OffsetDateTime) -> String {
    let stamp = at
        .format(EXPORT_STAMP_FORMAT)
        .unwrap_or_else(|_| at.unix_timestamp().to_string());
    format!("conversation_history_{stamp}.docx")
}

/// Keeps only the final path component and replaces characters unsafe in file names.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}

/// Writes `bytes` into `dir` under a sanitised `name`, creating the directory.
pub async fn save_bytes(dir: &Path, name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(sanitize_filename(name));
    tokio::fs::write(&path, bytes).await?;
    tracing::info!(path = %path.display(), size = bytes.len(), "saved download");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn export_name_is_timestamped() {
        let name = conversation_export_name(datetime!(2024-03-05 14:07:09 UTC));
        assert_eq!(name, "conversation_history_2024-03-05T14-07-09.docx");
    }

    #[test]
    fn sanitize_strips_directories_and_reserved_chars() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\docs\\report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("what?.pdf"), "what_.pdf");
        assert_eq!(sanitize_filename(".."), "download");
        assert_eq!(sanitize_filename("  "), "download");
    }

    #[tokio::test]
    async fn save_bytes_creates_directory() {
        let dir = std::env::temp_dir().join(format!("drqa-downloads-{}", std::process::id()));
        let path = save_bytes(&dir, "paper.pdf", b"%PDF-1.4").await.unwrap();
        assert_eq!(path, dir.join("paper.pdf"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.4");
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
