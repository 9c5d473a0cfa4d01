//! JSON 值模型：保序对象 + 允许非有限数值（NaN / Infinity / -Infinity）

use indexmap::IndexMap;

/// JSON 节点类型（与 UI 展示解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

/// 解析后的 JSON 值
///
/// 与 serde_json::Value 的区别：对象按插入顺序保序，数字统一为 f64
/// 且允许非有限值（严格 JSON 禁止，但本解析器的扩展文法接受）
#[derive(Debug, Clone)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(IndexMap<String, JsonValue>),
}

impl JsonValue {
    /// 返回节点类型标签
    pub fn kind(&self) -> ValueKind {
        match self {
            JsonValue::Object(_) => ValueKind::Object,
            JsonValue::Array(_) => ValueKind::Array,
            JsonValue::String(_) => ValueKind::String,
            JsonValue::Number(_) => ValueKind::Number,
            JsonValue::Bool(_) => ValueKind::Bool,
            JsonValue::Null => ValueKind::Null,
        }
    }

    /// 子元素数量（对象字段数 / 数组长度），标量为 0
    pub fn child_count(&self) -> usize {
        match self {
            JsonValue::Object(m) => m.len(),
            JsonValue::Array(a) => a.len(),
            _ => 0,
        }
    }

    /// 是否为标量（字符串/数字/布尔/空）
    pub fn is_scalar(&self) -> bool {
        !matches!(self, JsonValue::Object(_) | JsonValue::Array(_))
    }

    /// 轻量预览（字符串截断、数字/布尔/空的简短描述）
    pub fn preview(&self) -> String {
        match self {
            JsonValue::String(s) => {
                let s = s.trim();
                if s.chars().count() > 32 {
                    let truncated: String = s.chars().take(32).collect();
                    format!("\"{}...\"", truncated)
                } else {
                    format!("\"{}\"", s)
                }
            }
            JsonValue::Number(n) => format_number(*n),
            JsonValue::Bool(b) => b.to_string(),
            JsonValue::Null => "null".to_string(),
            JsonValue::Object(m) => format!("{{..}} ({} keys)", m.len()),
            JsonValue::Array(a) => format!("[..] ({} items)", a.len()),
        }
    }

    /// 紧凑序列化，非有限数值输出为 NaN / Infinity / -Infinity 字面量
    ///
    /// 与 parse_json 构成内部往返：dump 的输出再解析必然得到相等的值
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out);
        out
    }

    fn dump_into(&self, out: &mut String) {
        match self {
            JsonValue::Null => out.push_str("null"),
            JsonValue::Bool(true) => out.push_str("true"),
            JsonValue::Bool(false) => out.push_str("false"),
            JsonValue::Number(n) => out.push_str(&format_number(*n)),
            JsonValue::String(s) => dump_string(s, out),
            JsonValue::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.dump_into(out);
                }
                out.push(']');
            }
            JsonValue::Object(entries) => {
                out.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    dump_string(key, out);
                    out.push(':');
                    value.dump_into(out);
                }
                out.push('}');
            }
        }
    }

    /// 转换为 serde_json::Value 用于写盘导出
    ///
    /// 非有限数值无法用严格 JSON 表示，按 JavaScript JSON.stringify
    /// 的惯例降级为 null
    pub fn to_interchange(&self) -> serde_json::Value {
        match self {
            JsonValue::Null => serde_json::Value::Null,
            JsonValue::Bool(b) => serde_json::Value::Bool(*b),
            JsonValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            JsonValue::String(s) => serde_json::Value::String(s.clone()),
            JsonValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(JsonValue::to_interchange).collect())
            }
            JsonValue::Object(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_interchange()))
                    .collect(),
            ),
        }
    }
}

/// 结构相等：NaN 与 NaN 视为相等，对象逐项按顺序比较
impl PartialEq for JsonValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (JsonValue::Null, JsonValue::Null) => true,
            (JsonValue::Bool(a), JsonValue::Bool(b)) => a == b,
            (JsonValue::Number(a), JsonValue::Number(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (JsonValue::String(a), JsonValue::String(b)) => a == b,
            (JsonValue::Array(a), JsonValue::Array(b)) => a == b,
            (JsonValue::Object(a), JsonValue::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
            }
            _ => false,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else {
        n.to_string()
    }
}

fn dump_string(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
