//! JSON API 错误码

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::CrmError;

/// 使用 serde_repr 序列化为数字
///
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 存储错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    ValidationFailed = 1010,

    // 存储错误 3000-3099
    DatabaseError = 3000,
    FileError = 3001,
}

impl From<&CrmError> for ErrorCode {
    fn from(err: &CrmError) -> Self {
        match err {
            CrmError::Validation(_) => ErrorCode::ValidationFailed,
            CrmError::Serialization(_) => ErrorCode::BadRequest,
            CrmError::NotFound(_) => ErrorCode::NotFound,
            CrmError::Unauthorized(_) => ErrorCode::Unauthorized,
            CrmError::Conflict(_) => ErrorCode::Conflict,
            CrmError::DatabaseConnection(_) | CrmError::DatabaseOperation(_) => {
                ErrorCode::DatabaseError
            }
            CrmError::FileOperation(_) => ErrorCode::FileError,
            CrmError::DatabaseConfig(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Unauthorized).unwrap(), "1001");
        assert_eq!(
            serde_json::from_str::<ErrorCode>("1010").unwrap(),
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_from_crm_error() {
        assert_eq!(
            ErrorCode::from(&CrmError::validation("name", "is required")),
            ErrorCode::ValidationFailed
        );
        assert_eq!(
            ErrorCode::from(&CrmError::database_operation("boom")),
            ErrorCode::DatabaseError
        );
    }
}
