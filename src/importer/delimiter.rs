// ==========================================
// 易腐库存管理 - 分隔符识别
// ==========================================
// 规则: 全文含制表符 → Tab；否则含分号 → Semicolon；否则 Comma
// 首个命中即返回，不做频次统计
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delimiter {
    Tab,
    Semicolon,
    Comma,
}

impl Delimiter {
    /// 按优先级识别分隔符
    pub fn detect(text: &str) -> Self {
        if text.contains('\t') {
            Delimiter::Tab
        } else if text.contains(';') {
            Delimiter::Semicolon
        } else {
            Delimiter::Comma
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Tab => '\t',
            Delimiter::Semicolon => ';',
            Delimiter::Comma => ',',
        }
    }

    pub fn as_byte(&self) -> u8 {
        self.as_char() as u8
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Tab => write!(f, "TAB"),
            Delimiter::Semicolon => write!(f, ";"),
            Delimiter::Comma => write!(f, ","),
        }
    }
}
