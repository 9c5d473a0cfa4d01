//! 数据模型层：JSON 值、解析器、展示树与应用状态

pub mod data_core;
pub mod parser;
pub mod tree;
pub mod value;
