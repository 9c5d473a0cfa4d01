//! JSON树浏览核心库
//!
//! 提供扩展数字文法的JSON解析、展示树构建、可见节点收集与树形前缀绘制，
//! 以及路径缩短、文件大小等展示用格式化工具
//! 遵循MVVM架构模式，终端渲染与按键处理由外层负责

pub mod model;
pub mod utils;

// 重新导出主要类型
pub use model::data_core::{AppError, AppState};
pub use model::parser::{parse_json, parse_json_strict, ParseError};
pub use model::tree::{JsonTree, NodeId, TreeNode};
pub use model::value::{JsonValue, ValueKind};
pub use utils::text::{display_width, format_file_size, shorten_path};
