//! 扩展数字文法的 JSON 解析器
//!
//! 在标准 JSON 文法之上，数字位置额外接受 NaN / Infinity / -Infinity
//! 三个字面量（映射为对应的 IEEE-754 非有限 f64）。严格模式可关闭该扩展。
//! 单次从左到右扫描，除字面量前缀（N / I / -I）外无回溯。

use indexmap::IndexMap;
use thiserror::Error;

use crate::model::value::JsonValue;

/// 递归深度上限：深层嵌套返回解析错误而不是栈溢出
const MAX_DEPTH: usize = 512;

/// 解析错误，携带出错位置的字节偏移
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("偏移 {0} 处出现意外符号")]
    UnexpectedToken(usize),
    #[error("偏移 {0} 处的字符串未终止")]
    UnterminatedString(usize),
    #[error("偏移 {0} 处的数字格式无效")]
    InvalidNumber(usize),
    #[error("输入在偏移 {0} 处意外结束")]
    UnexpectedEnd(usize),
}

/// 按扩展文法解析完整文档（接受非有限数值字面量）
pub fn parse_json(input: &str) -> Result<JsonValue, ParseError> {
    Parser::new(input, true).parse_document()
}

/// 严格模式解析：标准 JSON 文法，拒绝 NaN / Infinity / -Infinity
pub fn parse_json_strict(input: &str) -> Result<JsonValue, ParseError> {
    Parser::new(input, false).parse_document()
}

struct Parser<'a> {
    text: &'a str,
    input: &'a [u8],
    pos: usize,
    allow_special_numbers: bool,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, allow_special_numbers: bool) -> Self {
        Self {
            text,
            input: text.as_bytes(),
            pos: 0,
            allow_special_numbers,
        }
    }

    fn parse_document(mut self) -> Result<JsonValue, ParseError> {
        self.skip_whitespace();
        let value = self.parse_value(0)?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            // 顶层值之后不允许出现多余内容
            return Err(ParseError::UnexpectedToken(self.pos));
        }
        Ok(value)
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    /// 消费一个期望的标点符号
    fn expect_byte(&mut self, expected: u8) -> Result<(), ParseError> {
        match self.peek() {
            Some(b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(ParseError::UnexpectedToken(self.pos)),
            None => Err(ParseError::UnexpectedEnd(self.pos)),
        }
    }

    /// 消费一个固定字面量（true / false / null / NaN / Infinity）
    fn expect_literal(&mut self, literal: &str) -> Result<(), ParseError> {
        if self.input[self.pos..].starts_with(literal.as_bytes()) {
            self.pos += literal.len();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken(self.pos))
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<JsonValue, ParseError> {
        if depth >= MAX_DEPTH {
            return Err(ParseError::UnexpectedToken(self.pos));
        }
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd(self.pos)),
            Some(b'{') => self.parse_object(depth),
            Some(b'[') => self.parse_array(depth),
            Some(b'"') => Ok(JsonValue::String(self.parse_string()?)),
            Some(b't') => {
                self.expect_literal("true")?;
                Ok(JsonValue::Bool(true))
            }
            Some(b'f') => {
                self.expect_literal("false")?;
                Ok(JsonValue::Bool(false))
            }
            Some(b'n') => {
                self.expect_literal("null")?;
                Ok(JsonValue::Null)
            }
            Some(b'N') if self.allow_special_numbers => {
                self.expect_literal("NaN")?;
                Ok(JsonValue::Number(f64::NAN))
            }
            Some(b'I') if self.allow_special_numbers => {
                self.expect_literal("Infinity")?;
                Ok(JsonValue::Number(f64::INFINITY))
            }
            Some(b'-')
                if self.allow_special_numbers
                    && self.input.get(self.pos + 1) == Some(&b'I') =>
            {
                self.expect_literal("-Infinity")?;
                Ok(JsonValue::Number(f64::NEG_INFINITY))
            }
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(_) => Err(ParseError::UnexpectedToken(self.pos)),
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<JsonValue, ParseError> {
        self.pos += 1; // 跳过 '{'
        let mut entries = IndexMap::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(JsonValue::Object(entries));
        }
        loop {
            self.skip_whitespace();
            let key = match self.peek() {
                Some(b'"') => self.parse_string()?,
                Some(_) => return Err(ParseError::UnexpectedToken(self.pos)),
                None => return Err(ParseError::UnexpectedEnd(self.pos)),
            };
            self.skip_whitespace();
            self.expect_byte(b':')?;
            self.skip_whitespace();
            let value = self.parse_value(depth + 1)?;
            // 重复键：后值覆盖前值，插入位置保持首次出现处
            entries.insert(key, value);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(JsonValue::Object(entries));
                }
                Some(_) => return Err(ParseError::UnexpectedToken(self.pos)),
                None => return Err(ParseError::UnexpectedEnd(self.pos)),
            }
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<JsonValue, ParseError> {
        self.pos += 1; // 跳过 '['
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(JsonValue::Array(items));
        }
        loop {
            self.skip_whitespace();
            items.push(self.parse_value(depth + 1)?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    return Ok(JsonValue::Array(items));
                }
                Some(_) => return Err(ParseError::UnexpectedToken(self.pos)),
                None => return Err(ParseError::UnexpectedEnd(self.pos)),
            }
        }
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let open = self.pos;
        self.pos += 1; // 跳过开引号
        let mut out = String::new();
        loop {
            let segment_start = self.pos;
            // 多字节 UTF-8 的后续字节都 >= 0x80，整段直接透传
            while let Some(b) = self.peek() {
                if b == b'"' || b == b'\\' || b < 0x20 {
                    break;
                }
                self.pos += 1;
            }
            out.push_str(&self.text[segment_start..self.pos]);
            match self.peek() {
                None => return Err(ParseError::UnterminatedString(open)),
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    self.pos += 1;
                    self.parse_escape(&mut out)?;
                }
                // 字符串内的裸控制字符不合法
                Some(_) => return Err(ParseError::UnexpectedToken(self.pos)),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        let escape_pos = self.pos;
        let Some(b) = self.peek() else {
            return Err(ParseError::UnexpectedEnd(self.pos));
        };
        self.pos += 1;
        match b {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{0008}'),
            b'f' => out.push('\u{000C}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let unit = self.parse_hex4()?;
                let code = if (0xD800..=0xDBFF).contains(&unit) {
                    // 高代理项：必须紧跟 \uXXXX 低代理项；输入截断时保留 UnexpectedEnd
                    self.expect_byte(b'\\')
                        .and_then(|_| self.expect_byte(b'u'))
                        .map_err(|e| match e {
                            ParseError::UnexpectedEnd(p) => ParseError::UnexpectedEnd(p),
                            _ => ParseError::UnexpectedToken(escape_pos),
                        })?;
                    let low = self.parse_hex4()?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(ParseError::UnexpectedToken(escape_pos));
                    }
                    0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    unit
                };
                match char::from_u32(code) {
                    Some(c) => out.push(c),
                    None => return Err(ParseError::UnexpectedToken(escape_pos)),
                }
            }
            _ => return Err(ParseError::UnexpectedToken(escape_pos)),
        }
        Ok(())
    }

    fn parse_hex4(&mut self) -> Result<u32, ParseError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let Some(b) = self.peek() else {
                return Err(ParseError::UnexpectedEnd(self.pos));
            };
            let digit = match b {
                b'0'..=b'9' => u32::from(b - b'0'),
                b'a'..=b'f' => u32::from(b - b'a') + 10,
                b'A'..=b'F' => u32::from(b - b'A') + 10,
                _ => return Err(ParseError::UnexpectedToken(self.pos)),
            };
            code = code * 16 + digit;
            self.pos += 1;
        }
        Ok(code)
    }

    fn parse_number(&mut self) -> Result<JsonValue, ParseError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        // 整数部分：0 或 [1-9][0-9]*，禁止前导零
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                if matches!(self.peek(), Some(b'0'..=b'9')) {
                    return Err(ParseError::InvalidNumber(start));
                }
            }
            Some(b'1'..=b'9') => {
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.pos += 1;
                }
            }
            _ => return Err(ParseError::InvalidNumber(start)),
        }
        // 小数部分
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(ParseError::InvalidNumber(start));
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        // 指数部分
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(ParseError::InvalidNumber(start));
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        self.text[start..self.pos]
            .parse::<f64>()
            .map(JsonValue::Number)
            .map_err(|_| ParseError::InvalidNumber(start))
    }
}
