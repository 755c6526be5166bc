//! # Data URL 编解码
//!
//! 响应统一以 `data:image/png;base64,<...>` 形式内联返回图片。
//! 解析方向兼容 Data URL 与纯 Base64 字符串，主要供客户端与测试回读结果。

use base64::{Engine as _, engine::general_purpose};

use super::ImageError;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// 将 PNG 字节包装为 Data URL。
pub fn to_png_data_url(bytes: &[u8]) -> String {
    let encoded = general_purpose::STANDARD.encode(bytes);
    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + encoded.len());
    url.push_str(PNG_DATA_URL_PREFIX);
    url.push_str(&encoded);
    url
}

/// 解析 Base64 输入（支持 Data URL / 纯 Base64）。
pub fn decode_data_url(data: &str) -> Result<Vec<u8>, ImageError> {
    let normalized = data.trim();

    let payload = if normalized.starts_with("data:image/") {
        let base64_start = normalized
            .find(";base64,")
            .ok_or_else(|| ImageError::InvalidFormat("缺少 base64 标记".to_string()))?;
        &normalized[base64_start + 8..]
    } else {
        normalized
    };

    general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ImageError::Decode(format!("Base64 解码失败：{}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_bytes_with_png_prefix() {
        assert_eq!(to_png_data_url(b"Hello"), "data:image/png;base64,SGVsbG8=");
    }

    #[test]
    fn decode_accepts_data_url_and_plain_base64() {
        let url = to_png_data_url(&[1, 2, 3, 250]);

        assert_eq!(decode_data_url(&url).expect("data url"), vec![1, 2, 3, 250]);
        assert_eq!(decode_data_url("SGVsbG8=").expect("plain base64"), b"Hello".to_vec());
    }

    #[test]
    fn decode_rejects_data_url_without_base64_marker() {
        let result = decode_data_url("data:image/png,rawdata");

        assert!(matches!(result, Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        assert!(matches!(decode_data_url("@@@"), Err(ImageError::Decode(_))));
    }
}
