//! 文本工具：终端显示宽度、路径缩短、文件大小格式化

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// 省略标记，display_width 恒为 3
const ELLIPSIS: &str = "...";

/// 文件大小单位阶梯（基数 1024）
const SIZE_UNITS: [&str; 6] = ["Bytes", "KB", "MB", "GB", "TB", "PB"];

/// 字符串占用的终端列数（宽字符按 2 列计，与字节长度无关）
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// 将路径缩短到 max_width 列以内，超长时保留尾部并加省略标记
///
/// max_width 小于省略标记自身宽度时返回截短的标记，不会 panic
pub fn shorten_path(path: &str, max_width: usize) -> String {
    if display_width(path) <= max_width {
        return path.to_string();
    }
    if max_width <= ELLIPSIS.len() {
        // 连省略标记都放不下：尽力输出标记的前缀
        return ELLIPSIS[..max_width].to_string();
    }
    let budget = max_width - ELLIPSIS.len();
    let mut used = 0;
    let mut tail_start = path.len();
    // 从尾部向前累积，优先保留文件名
    for (i, ch) in path.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        tail_start = i;
    }
    format!("{}{}", ELLIPSIS, &path[tail_start..])
}

/// 字节数转人类可读字符串：1024 以下取整数，以上保留一位小数
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} Bytes", bytes);
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    // 一位小数四舍五入后可能顶到 1024.0，此时进位到下一单位
    if unit < SIZE_UNITS.len() - 1 && (size * 10.0).round() >= 10240.0 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_wide_glyphs() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("中文"), 4, "汉字占两列");
        assert_eq!(display_width("a中b"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn test_display_width_connector_glyphs() {
        // 树形连接符必须按单列计，否则前缀对不齐
        assert_eq!(display_width("└── "), 4);
        assert_eq!(display_width("├── "), 4);
        assert_eq!(display_width("│   "), 4);
    }

    #[test]
    fn test_shorten_long_path() {
        let path = "/very/long/path/segment/file.json";
        let shortened = shorten_path(path, 16);
        assert!(display_width(&shortened) <= 16);
        assert!(shortened.contains("..."), "截断后应包含省略标记");
        assert!(shortened.ends_with("file.json"), "应保留路径尾部");
    }

    #[test]
    fn test_shorten_short_path_unchanged() {
        assert_eq!(shorten_path("a/b.json", 16), "a/b.json");
        assert_eq!(shorten_path("", 0), "");
    }

    #[test]
    fn test_shorten_width_property() {
        let inputs = ["/很/长/的/中文/路径/文件.json", "/very/long/path/segment/file.json", "短"];
        for input in inputs {
            for w in 4..24 {
                let out = shorten_path(input, w);
                assert!(
                    display_width(&out) <= w,
                    "宽度约束被破坏: {:?} -> {:?} (w={})",
                    input,
                    out,
                    w
                );
                if display_width(input) > w {
                    assert!(out.contains("..."), "超限输入截断后必须含省略标记");
                }
            }
        }
    }

    #[test]
    fn test_shorten_tiny_max_width() {
        assert_eq!(shorten_path("/long/path", 3), "...");
        assert_eq!(shorten_path("/long/path", 2), "..");
        assert_eq!(shorten_path("/long/path", 0), "");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1023), "1023 Bytes");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1.0 GB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024 / 2), "1.5 GB");
    }

    #[test]
    fn test_format_file_size_boundary_rounding() {
        // 刚好不足一个单位的值，四舍五入后必须进位而不是显示 1024.0
        assert_eq!(format_file_size(1048570), "1.0 MB");
        assert_eq!(format_file_size(1024 * 1024 - 1), "1.0 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024 - 1), "1.0 GB");
        // 未触及进位阈值的值保持原单位
        assert_eq!(format_file_size(1023 * 1024), "1023.0 KB");
    }
}
