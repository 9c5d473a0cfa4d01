//! 展示树：由解析后的 JSON 值构建，支持折叠/展开与树形前缀绘制
//!
//! 节点集中存放在 arena 向量里，父子关系通过 NodeId 索引表达，
//! 父引用只用于前缀计算，不构成第二个所有者。

use crate::model::value::{JsonValue, ValueKind};

/// arena 中节点的句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// 展示树的一个节点
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// 父级中的键名：对象字段名 / 数组 "[i]" / 根为空串
    pub key: String,
    /// 节点类型
    pub kind: ValueKind,
    /// 标量节点持有对应的值，容器节点为结构性节点不持有
    pub value: Option<JsonValue>,
    /// 轻量预览文本
    pub preview: String,
    /// 子元素数量（对象字段数 / 数组长度）
    pub child_count: usize,
    /// 节点深度（根为 0）
    pub depth: u32,
    /// 父节点句柄，根节点为 None
    pub parent: Option<NodeId>,
    /// 子节点句柄，保持文档顺序
    pub children: Vec<NodeId>,
    /// 是否展开（折叠时整棵子树从可见集中消失）
    pub expanded: bool,
}

/// 展示树本体
#[derive(Debug, Clone)]
pub struct JsonTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
}

impl JsonTree {
    /// 从解析结果递归构建全树，所有节点的展开标志初始化为 expanded_default
    pub fn build(value: &JsonValue, expanded_default: bool) -> JsonTree {
        let mut tree = JsonTree {
            nodes: Vec::with_capacity(64),
            root: NodeId(0),
        };
        let root = tree.build_node(value, String::new(), None, 0, expanded_default);
        tree.root = root;
        tree
    }

    fn build_node(
        &mut self,
        value: &JsonValue,
        key: String,
        parent: Option<NodeId>,
        depth: u32,
        expanded_default: bool,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            key,
            kind: value.kind(),
            value: value.is_scalar().then(|| value.clone()),
            preview: value.preview(),
            child_count: value.child_count(),
            depth,
            parent,
            children: Vec::new(),
            expanded: expanded_default,
        });
        match value {
            JsonValue::Object(entries) => {
                for (field, child) in entries {
                    let child_id =
                        self.build_node(child, field.clone(), Some(id), depth + 1, expanded_default);
                    self.nodes[id.0].children.push(child_id);
                }
            }
            JsonValue::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    let child_id = self.build_node(
                        child,
                        format!("[{}]", index),
                        Some(id),
                        depth + 1,
                        expanded_default,
                    );
                    self.nodes[id.0].children.push(child_id);
                }
            }
            _ => {}
        }
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// 树中节点总数（含根）
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 收集当前可见节点：从根的子级开始先序遍历，折叠节点本身可见但子树被裁掉
    pub fn collect_visible(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.push_visible_children(self.root, &mut out);
        out
    }

    fn push_visible_children(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if !self.nodes[id.0].expanded {
            return;
        }
        for &child in &self.nodes[id.0].children {
            out.push(child);
            self.push_visible_children(child, out);
        }
    }

    /// 设置展开标志（控制器层唯一的树变更入口）
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        self.nodes[id.0].expanded = expanded;
    }

    /// 切换展开状态
    pub fn toggle(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.0];
        node.expanded = !node.expanded;
    }

    /// 展开全部节点
    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = true;
        }
    }

    /// 折叠全部节点（根保持展开，否则可见集为空）
    pub fn collapse_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = false;
        }
        self.nodes[self.root.0].expanded = true;
    }

    /// 是否为其父级的最后一个子节点；根节点视为 true
    pub fn is_last_child(&self, id: NodeId) -> bool {
        match self.nodes[id.0].parent {
            Some(parent) => self.nodes[parent.0].children.last() == Some(&id),
            None => true,
        }
    }

    /// 构建树形连接前缀：节点自身为 └── 或 ├── ，
    /// 中间祖先按是否为末位子节点输出空白段或 │ 续线段
    pub fn build_prefix(&self, id: NodeId) -> String {
        let Some(parent) = self.nodes[id.0].parent else {
            return String::new();
        };
        let mut segments: Vec<&str> = Vec::new();
        segments.push(if self.is_last_child(id) { "└── " } else { "├── " });
        let mut current = parent;
        while let Some(grandparent) = self.nodes[current.0].parent {
            segments.push(if self.is_last_child(current) { "    " } else { "│   " });
            current = grandparent;
        }
        segments.reverse();
        segments.concat()
    }
}
