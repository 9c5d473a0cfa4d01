//! 工具层：文件IO与文本格式化

pub mod fs;
pub mod text;
