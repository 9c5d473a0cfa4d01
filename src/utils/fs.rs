//! IO helper: safe file read/write for JSON

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use crate::model::data_core::AppError;
use crate::model::value::JsonValue;

/// 读取文件全文（UTF-8）
pub fn read_text_file(p: &Path) -> Result<String, AppError> {
    let f = File::open(p)?;
    let mut rdr = BufReader::new(f);
    let mut text = String::new();
    rdr.read_to_string(&mut text)?;
    Ok(text)
}

/// 将文档保存到文件（格式化输出，非有限数值降级为 null）
pub fn write_json_file(p: &Path, value: &JsonValue) -> Result<(), AppError> {
    let f = File::create(p)?;
    serde_json::to_writer_pretty(f, &value.to_interchange())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parser::parse_json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_write_roundtrip() {
        let mut file = NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(r#"{"name":"样例","n":[1,2]}"#.as_bytes())
            .expect("写入临时文件失败");

        let text = read_text_file(file.path()).expect("读取应该成功");
        let value = parse_json(&text).expect("解析应该成功");

        let out = NamedTempFile::new().expect("创建临时文件失败");
        write_json_file(out.path(), &value).expect("写盘应该成功");
        let reread = parse_json(&read_text_file(out.path()).expect("重读应该成功"))
            .expect("导出文件应该是合法JSON");
        assert_eq!(value, reread, "写盘再读回应该结构相等");
    }

    #[test]
    fn test_write_preserves_key_order() {
        let value = parse_json(r#"{"user":1,"items":2,"config":3}"#).expect("解析应该成功");
        let out = NamedTempFile::new().expect("创建临时文件失败");
        write_json_file(out.path(), &value).expect("写盘应该成功");

        let text = read_text_file(out.path()).expect("重读应该成功");
        let user = text.find("\"user\"").expect("user 键应该在导出中");
        let items = text.find("\"items\"").expect("items 键应该在导出中");
        let config = text.find("\"config\"").expect("config 键应该在导出中");
        assert!(user < items && items < config, "导出必须保持插入顺序: {}", text);
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_text_file(Path::new("/不存在/的/路径.json"));
        assert!(matches!(result, Err(AppError::Io(_))), "缺失文件应该返回IO错误");
    }
}
