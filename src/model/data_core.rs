//! AppState：应用核心状态，负责文档加载与展示树的生命周期

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::parser::{parse_json, ParseError};
use crate::model::tree::{JsonTree, NodeId};
use crate::model::value::JsonValue;
use crate::utils::fs::{read_text_file, write_json_file};
use crate::utils::text::{format_file_size, shorten_path};

/// 状态栏中路径展示的列数上限
const STATUS_PATH_WIDTH: usize = 48;

#[derive(Debug, Default)]
pub struct AppState {
    pub source_path: Option<PathBuf>,
    /// 载入文档的字节大小
    pub file_size: u64,
    pub document: Option<JsonValue>,
    pub tree: Option<JsonTree>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] ParseError),
    #[error("导出失败: {0}")]
    Export(#[from] serde_json::Error),
    #[error("状态错误: {0}")]
    State(String),
}

impl AppState {
    /// 加载JSON文件并构建全展开的展示树
    pub fn load_file(&mut self, p: &Path) -> Result<(), AppError> {
        let text = read_text_file(p)?;
        self.load_str(&text)?;
        self.source_path = Some(p.to_path_buf());
        tracing::info!(
            "文件加载成功: {} ({}), {} 个节点",
            p.display(),
            format_file_size(self.file_size),
            self.tree.as_ref().map_or(0, JsonTree::len)
        );
        Ok(())
    }

    /// 从内存文本加载文档（解析失败时保持原有状态不变）
    pub fn load_str(&mut self, text: &str) -> Result<(), AppError> {
        let document = parse_json(text)?;
        self.tree = Some(JsonTree::build(&document, true));
        self.document = Some(document);
        self.file_size = text.len() as u64;
        self.source_path = None;
        Ok(())
    }

    fn tree_ref(&self) -> Result<&JsonTree, AppError> {
        self.tree
            .as_ref()
            .ok_or_else(|| AppError::State("文档尚未加载".into()))
    }

    /// 切换节点的展开状态
    pub fn toggle_node(&mut self, id: NodeId) -> Result<(), AppError> {
        let tree = self
            .tree
            .as_mut()
            .ok_or_else(|| AppError::State("文档尚未加载".into()))?;
        tree.toggle(id);
        tracing::debug!("切换节点展开状态: {:?}", id);
        Ok(())
    }

    /// 当前可见节点（文档顺序）
    pub fn visible_nodes(&self) -> Result<Vec<NodeId>, AppError> {
        Ok(self.tree_ref()?.collect_visible())
    }

    /// 节点标签：`键名: 预览`，根节点只显示预览
    pub fn node_label(&self, id: NodeId) -> Result<String, AppError> {
        let node = self.tree_ref()?.node(id);
        if node.key.is_empty() {
            Ok(node.preview.clone())
        } else {
            Ok(format!("{}: {}", node.key, node.preview))
        }
    }

    /// 状态栏文本：缩短后的路径 + 文件大小
    pub fn status_line(&self) -> String {
        let path = match &self.source_path {
            Some(p) => shorten_path(&p.display().to_string(), STATUS_PATH_WIDTH),
            None => "(内存文档)".to_string(),
        };
        format!("{} | {}", path, format_file_size(self.file_size))
    }

    /// 将当前文档保存到指定路径
    pub fn save_to_file(&self, path: &Path) -> Result<(), AppError> {
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| AppError::State("文档尚未加载".into()))?;
        write_json_file(path, document)?;
        tracing::info!("文件保存成功: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// 创建临时JSON文件用于测试
    fn create_test_json_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(content.as_bytes()).expect("写入临时文件失败");
        file
    }

    #[test]
    fn test_load_simple_json() {
        let temp_file = create_test_json_file(r#"{"name": "test", "value": 42}"#);

        let mut app_state = AppState::default();
        let result = app_state.load_file(temp_file.path());

        assert!(result.is_ok(), "加载简单JSON应该成功");
        assert!(app_state.document.is_some(), "文档应该被加载");
        let tree = app_state.tree.as_ref().expect("展示树应该被构建");
        assert_eq!(tree.len(), 3, "应该有3个节点：根、name、value");
        assert_eq!(app_state.file_size, 29);
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_file = create_test_json_file(r#"{"invalid": json content}"#);

        let mut app_state = AppState::default();
        let result = app_state.load_file(temp_file.path());

        assert!(matches!(result, Err(AppError::Parse(_))), "无效JSON应该返回解析错误");
        assert!(app_state.document.is_none(), "解析失败不应留下半成品文档");
        assert!(app_state.tree.is_none(), "解析失败不应构建展示树");
    }

    #[test]
    fn test_load_special_numbers_document() {
        let mut app_state = AppState::default();
        app_state
            .load_str(r#"{"value": NaN, "range": [Infinity, -Infinity]}"#)
            .expect("扩展文法文档应该加载成功");
        let visible = app_state.visible_nodes().expect("可见集应该可用");
        assert_eq!(visible.len(), 4, "value + range + 两个数组元素");
    }

    #[test]
    fn test_toggle_and_visible_nodes() {
        let mut app_state = AppState::default();
        app_state
            .load_str(r#"{"name":"sample","numbers":[1,2,3],"nested":{"flag":true}}"#)
            .expect("加载应该成功");

        let visible = app_state.visible_nodes().expect("可见集应该可用");
        assert_eq!(visible.len(), 7, "全展开应该有7个可见节点");

        let tree = app_state.tree.as_ref().expect("树已构建");
        let numbers = tree
            .node(tree.root())
            .children
            .iter()
            .copied()
            .find(|&id| tree.node(id).key == "numbers")
            .expect("numbers 字段应该存在");

        app_state.toggle_node(numbers).expect("切换应该成功");
        assert_eq!(
            app_state.visible_nodes().expect("可见集应该可用").len(),
            4,
            "折叠 numbers 后裁掉3个数组元素"
        );
    }

    #[test]
    fn test_node_label() {
        let mut app_state = AppState::default();
        app_state
            .load_str(r#"{"name":"sample"}"#)
            .expect("加载应该成功");
        let tree = app_state.tree.as_ref().expect("树已构建");
        let name = tree.node(tree.root()).children[0];
        assert_eq!(
            app_state.node_label(name).expect("标签应该可用"),
            "name: \"sample\""
        );
        assert_eq!(
            app_state.node_label(tree.root()).expect("根标签应该可用"),
            "{..} (1 keys)"
        );
    }

    #[test]
    fn test_operations_require_loaded_document() {
        let app_state = AppState::default();
        assert!(matches!(app_state.visible_nodes(), Err(AppError::State(_))));
        assert!(matches!(
            app_state.save_to_file(Path::new("/tmp/unused.json")),
            Err(AppError::State(_))
        ));
    }

    #[test]
    fn test_status_line() {
        let mut app_state = AppState::default();
        app_state.load_str(r#"{"a":1}"#).expect("加载应该成功");
        let status = app_state.status_line();
        assert!(status.contains("内存文档"));
        assert!(status.contains("7 Bytes"), "状态栏应包含文件大小: {}", status);
    }

    #[test]
    fn test_save_roundtrip() {
        let mut app_state = AppState::default();
        app_state
            .load_str(r#"{"user":{"name":"张三","age":30},"items":[1,2,3]}"#)
            .expect("加载应该成功");

        let out = NamedTempFile::new().expect("创建临时文件失败");
        app_state.save_to_file(out.path()).expect("保存应该成功");

        let mut reloaded = AppState::default();
        reloaded.load_file(out.path()).expect("重新加载应该成功");
        assert_eq!(app_state.document, reloaded.document, "保存再加载应该结构相等");
    }
}
