//! 类型化表单解码
//!
//! [`FormReader`] 逐个读取字段并累积所有错误，最后由 [`FormReader::finish`]
//! 一次性返回全部出错字段，而不是在第一个缺失字段处失败。

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::errors::{CrmError, FieldError, Result};

/// 原始表单字段
pub type FormFields = HashMap<String, String>;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct FormReader<'a> {
    fields: &'a FormFields,
    errors: Vec<FieldError>,
}

impl<'a> FormReader<'a> {
    pub fn new(fields: &'a FormFields) -> Self {
        Self {
            fields,
            errors: Vec::new(),
        }
    }

    /// 去掉首尾空白后的值；缺失或为空时返回 `None`
    pub fn text(&self, name: &str) -> Option<&'a str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// 可选文本，缺失时为空串
    pub fn text_or_empty(&self, name: &str) -> String {
        self.text(name).unwrap_or_default().to_string()
    }

    pub fn optional_text(&self, name: &str) -> Option<String> {
        self.text(name).map(str::to_string)
    }

    pub fn required_text(&mut self, name: &str) -> String {
        match self.text(name) {
            Some(v) => v.to_string(),
            None => {
                self.push_error(name, "is required");
                String::new()
            }
        }
    }

    pub fn optional_f64(&mut self, name: &str) -> Option<f64> {
        let raw = self.text(name)?;
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                self.push_error(name, "must be a number");
                None
            }
        }
    }

    pub fn required_f64(&mut self, name: &str) -> f64 {
        if self.text(name).is_none() {
            self.push_error(name, "is required");
            return 0.0;
        }
        self.optional_f64(name).unwrap_or_default()
    }

    pub fn optional_i32(&mut self, name: &str) -> Option<i32> {
        let raw = self.text(name)?;
        match raw.parse::<i32>() {
            Ok(v) => Some(v),
            Err(_) => {
                self.push_error(name, "must be a whole number");
                None
            }
        }
    }

    /// 必填的记录 ID
    pub fn required_id(&mut self, name: &str) -> i32 {
        match self.text(name) {
            None => {
                self.push_error(name, "is required");
                0
            }
            Some(raw) => match raw.parse::<i32>() {
                Ok(v) if v > 0 => v,
                _ => {
                    self.push_error(name, "must be a valid id");
                    0
                }
            },
        }
    }

    pub fn optional_date(&mut self, name: &str) -> Option<NaiveDate> {
        let raw = self.text(name)?;
        match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(d) => Some(d),
            Err(_) => {
                self.push_error(name, "must be a date (YYYY-MM-DD)");
                None
            }
        }
    }

    pub fn required_date(&mut self, name: &str) -> NaiveDate {
        if self.text(name).is_none() {
            self.push_error(name, "is required");
            return NaiveDate::MIN;
        }
        self.optional_date(name).unwrap_or(NaiveDate::MIN)
    }

    /// 必填枚举，`allowed` 用于错误提示
    pub fn required_choice<T: FromStr>(&mut self, name: &str, allowed: &str) -> Option<T> {
        match self.text(name) {
            None => {
                self.push_error(name, "is required");
                None
            }
            Some(raw) => match raw.parse::<T>() {
                Ok(v) => Some(v),
                Err(_) => {
                    self.push_error(name, format!("must be one of: {}", allowed));
                    None
                }
            },
        }
    }

    pub fn push_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 有错误时返回 `CrmError::Validation`，其中列出所有出错字段
    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CrmError::Validation(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_collects_every_error() {
        let f = fields(&[("width", "wide"), ("start_date", "2025-13-01"), ("name", "  ")]);
        let mut form = FormReader::new(&f);
        form.required_text("name");
        form.required_f64("width");
        form.required_f64("height");
        form.required_date("start_date");

        let err = form.finish().unwrap_err();
        let names: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(names, vec!["name", "width", "height", "start_date"]);
    }

    #[test]
    fn test_valid_values() {
        let f = fields(&[
            ("name", " Acme "),
            ("budget", "1500.5"),
            ("pixel_width", "1920"),
            ("client_id", "7"),
            ("start_date", "2025-01-31"),
        ]);
        let mut form = FormReader::new(&f);
        assert_eq!(form.required_text("name"), "Acme");
        assert_eq!(form.optional_f64("budget"), Some(1500.5));
        assert_eq!(form.optional_i32("pixel_width"), Some(1920));
        assert_eq!(form.optional_i32("pixel_height"), None);
        assert_eq!(form.required_id("client_id"), 7);
        assert_eq!(
            form.required_date("start_date"),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
        );
        assert_eq!(form.text_or_empty("email"), "");
        assert!(form.finish().is_ok());
    }

    #[test]
    fn test_invalid_id() {
        let f = fields(&[("client_id", "-1"), ("other", "abc")]);
        let mut form = FormReader::new(&f);
        form.required_id("client_id");
        form.required_id("other");
        assert_eq!(form.finish().unwrap_err().field_errors().len(), 2);
    }
}
