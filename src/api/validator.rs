// ==========================================
// 易腐库存管理 - 调用方权限校验
// ==========================================
// 职责: 受限操作前校验调用方身份与角色
// 红线: 校验必须先于任何负载处理
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::Caller;
use crate::i18n::t;

/// 要求已认证
pub fn require_authenticated(caller: Option<&Caller>) -> ApiResult<&Caller> {
    caller.ok_or_else(|| ApiError::Unauthorized(t("auth.unauthenticated")))
}

/// 要求 MODERADOR 角色
///
/// # 返回
/// - Err(Unauthorized): 未认证
/// - Err(Forbidden): 已认证但角色不足
pub fn require_moderator(caller: Option<&Caller>) -> ApiResult<&Caller> {
    let caller = require_authenticated(caller)?;
    if !caller.is_moderator() {
        return Err(ApiError::Forbidden(t("auth.moderator_required")));
    }
    Ok(caller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::UserRole;

    #[test]
    fn test_require_moderator() {
        let moderator = Caller::moderator(1);
        let user = Caller::new(2, UserRole::User);

        assert!(require_moderator(Some(&moderator)).is_ok());
        assert!(matches!(require_moderator(Some(&user)), Err(ApiError::Forbidden(_))));
        assert!(matches!(require_moderator(None), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_require_authenticated() {
        let user = Caller::new(2, UserRole::User);
        assert_eq!(require_authenticated(Some(&user)).unwrap().user_id, 2);
        assert!(require_authenticated(None).is_err());
    }
}
