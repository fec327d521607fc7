//! Google Drive共有URLの直接ダウンロードURL化

use regex::Regex;
use std::borrow::Cow;

lazy_static::lazy_static! {
    static ref DRIVE_FILE_ID_RE: Regex = Regex::new(r"[-\w]{25,}").unwrap();
}

const DRIVE_HOST: &str = "drive.google.com";

/// Drive上のファイルIDを抽出
pub fn drive_file_id(url: &str) -> Option<&str> {
    if !url.contains(DRIVE_HOST) {
        return None;
    }
    DRIVE_FILE_ID_RE.find(url).map(|m| m.as_str())
}

/// Drive URLなら `uc?export=download&id=` 形式へ書き換える
///
/// Drive以外のURL、IDが見つからないURLはそのまま返す。
pub fn download_url(url: &str) -> Cow<'_, str> {
    match drive_file_id(url) {
        Some(id) => Cow::Owned(format!("https://{}/uc?export=download&id={}", DRIVE_HOST, id)),
        None => Cow::Borrowed(url),
    }
}
