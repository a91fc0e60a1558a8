// ==========================================
// 易腐库存管理 - 领域类型定义
// ==========================================
// 职责: 效期分级、上传状态、用户角色等枚举
// 红线: 效期分级是"等级制"，由剩余天数唯一决定
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 效期分级 (Freshness Tier)
// ==========================================
// 序列化格式与历史数据一致: OK / ATTENTION / VENCENDO / VENCIDO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FreshnessTier {
    #[serde(rename = "OK")]
    Ok, // 正常（剩余 > 15 天）
    #[serde(rename = "ATTENTION")]
    Attention, // 关注（8-15 天）
    #[serde(rename = "VENCENDO")]
    Vencendo, // 临期（0-7 天）
    #[serde(rename = "VENCIDO")]
    Vencido, // 已过期（< 0 天）
}

impl FreshnessTier {
    /// 全部分级，按新鲜度从高到低
    pub const ALL: [FreshnessTier; 4] = [
        FreshnessTier::Ok,
        FreshnessTier::Attention,
        FreshnessTier::Vencendo,
        FreshnessTier::Vencido,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FreshnessTier::Ok => "OK",
            FreshnessTier::Attention => "ATTENTION",
            FreshnessTier::Vencendo => "VENCENDO",
            FreshnessTier::Vencido => "VENCIDO",
        }
    }

    /// 是否已过期
    pub fn is_expired(&self) -> bool {
        matches!(self, FreshnessTier::Vencido)
    }

    /// 新鲜度序号（越大越新鲜），用于单调性校验
    pub fn freshness_rank(&self) -> u8 {
        match self {
            FreshnessTier::Vencido => 0,
            FreshnessTier::Vencendo => 1,
            FreshnessTier::Attention => 2,
            FreshnessTier::Ok => 3,
        }
    }
}

impl fmt::Display for FreshnessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FreshnessTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OK" => Ok(FreshnessTier::Ok),
            "ATTENTION" => Ok(FreshnessTier::Attention),
            "VENCENDO" => Ok(FreshnessTier::Vencendo),
            "VENCIDO" => Ok(FreshnessTier::Vencido),
            other => Err(format!("未知效期分级: {}", other)),
        }
    }
}

// ==========================================
// 上传记录状态 (Upload Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Active,   // 有效
    Archived, // 已归档
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Active => "active",
            UploadStatus::Archived => "archived",
        }
    }

    /// 从数据库文本解析（未知值按 active 处理）
    pub fn from_db(raw: &str) -> Self {
        match raw.trim() {
            "archived" => UploadStatus::Archived,
            _ => UploadStatus::Active,
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 用户角色 (User Role)
// ==========================================
// MODERADOR 才能上传/删除库存文件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    Moderador,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::User => write!(f, "USER"),
            UserRole::Moderador => write!(f, "MODERADOR"),
        }
    }
}

/// 已认证的调用方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: i64,
    pub role: UserRole,
}

impl Caller {
    pub fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn moderator(user_id: i64) -> Self {
        Self::new(user_id, UserRole::Moderador)
    }

    pub fn is_moderator(&self) -> bool {
        self.role == UserRole::Moderador
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness_tier_serde_names() {
        let json = serde_json::to_string(&FreshnessTier::Vencendo).unwrap();
        assert_eq!(json, "\"VENCENDO\"");

        let tier: FreshnessTier = serde_json::from_str("\"OK\"").unwrap();
        assert_eq!(tier, FreshnessTier::Ok);
    }

    #[test]
    fn test_freshness_tier_from_str() {
        assert_eq!("attention".parse::<FreshnessTier>(), Ok(FreshnessTier::Attention));
        assert!("unknown".parse::<FreshnessTier>().is_err());
    }

    #[test]
    fn test_upload_status_roundtrip() {
        assert_eq!(UploadStatus::from_db("archived"), UploadStatus::Archived);
        assert_eq!(UploadStatus::from_db("garbage"), UploadStatus::Active);
        assert_eq!(
            serde_json::to_string(&UploadStatus::Active).unwrap(),
            "\"active\""
        );
    }

    #[test]
    fn test_caller_role() {
        assert!(Caller::moderator(1).is_moderator());
        assert!(!Caller::new(2, UserRole::User).is_moderator());
    }
}
