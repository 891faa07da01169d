use std::fmt;

use actix_web::http::StatusCode;
use serde::Serialize;

/// 单个字段的校验错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone)]
pub enum CrmError {
    /// 请求字段缺失或格式错误，一次列出所有出错字段
    Validation(Vec<FieldError>),
    NotFound(String),
    Unauthorized(String),
    Conflict(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Serialization(String),
    DatabaseConfig(String),
}

impl CrmError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            CrmError::Validation(_) => "E001",
            CrmError::NotFound(_) => "E002",
            CrmError::Unauthorized(_) => "E003",
            CrmError::Conflict(_) => "E004",
            CrmError::DatabaseConnection(_) => "E005",
            CrmError::DatabaseOperation(_) => "E006",
            CrmError::FileOperation(_) => "E007",
            CrmError::Serialization(_) => "E008",
            CrmError::DatabaseConfig(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            CrmError::Validation(_) => "Validation Error",
            CrmError::NotFound(_) => "Resource Not Found",
            CrmError::Unauthorized(_) => "Unauthorized",
            CrmError::Conflict(_) => "Conflict",
            CrmError::DatabaseConnection(_) => "Database Connection Error",
            CrmError::DatabaseOperation(_) => "Database Operation Error",
            CrmError::FileOperation(_) => "File Operation Error",
            CrmError::Serialization(_) => "Serialization Error",
            CrmError::DatabaseConfig(_) => "Database Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> String {
        match self {
            CrmError::Validation(fields) => fields
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
            CrmError::NotFound(msg)
            | CrmError::Unauthorized(msg)
            | CrmError::Conflict(msg)
            | CrmError::DatabaseConnection(msg)
            | CrmError::DatabaseOperation(msg)
            | CrmError::FileOperation(msg)
            | CrmError::Serialization(msg)
            | CrmError::DatabaseConfig(msg) => msg.clone(),
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            CrmError::Validation(_) | CrmError::Serialization(_) => StatusCode::BAD_REQUEST,
            CrmError::NotFound(_) => StatusCode::NOT_FOUND,
            CrmError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CrmError::Conflict(_) => StatusCode::CONFLICT,
            CrmError::DatabaseConnection(_)
            | CrmError::DatabaseOperation(_)
            | CrmError::FileOperation(_)
            | CrmError::DatabaseConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 校验错误的字段列表，其它错误为空
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            CrmError::Validation(fields) => fields,
            _ => &[],
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for CrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CrmError {}

// 便捷的构造函数
impl CrmError {
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        CrmError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        CrmError::NotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        CrmError::Unauthorized(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        CrmError::Conflict(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        CrmError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        CrmError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        CrmError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        CrmError::Serialization(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        CrmError::DatabaseConfig(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for CrmError {
    fn from(err: sea_orm::DbErr) -> Self {
        CrmError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for CrmError {
    fn from(err: std::io::Error) -> Self {
        CrmError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for CrmError {
    fn from(err: serde_json::Error) -> Self {
        CrmError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CrmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            CrmError::validation("name", "required").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CrmError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CrmError::unauthorized("x").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(CrmError::conflict("x").http_status(), StatusCode::CONFLICT);
        assert_eq!(
            CrmError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message_lists_every_field() {
        let err = CrmError::Validation(vec![
            FieldError::new("name", "is required"),
            FieldError::new("width", "must be a number"),
        ]);
        assert_eq!(err.code(), "E001");
        assert_eq!(err.message(), "name: is required; width: must be a number");
        assert_eq!(err.field_errors().len(), 2);
    }

    #[test]
    fn test_db_err_conversion() {
        let err: CrmError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, CrmError::DatabaseOperation(ref m) if m.contains("boom")));
        assert!(err.field_errors().is_empty());
    }
}
