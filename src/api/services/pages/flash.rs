//! 一次性提示消息
//!
//! 重定向时写入 cookie，下一次渲染页面时读出并删除。

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse};
use strum::{AsRefStr, EnumString};

pub const FLASH_COOKIE: &str = "ekr_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// `level:urlencoded,level:urlencoded`
fn encode(flashes: &[Flash]) -> String {
    flashes
        .iter()
        .map(|f| format!("{}:{}", f.level.as_ref(), urlencoding::encode(&f.message)))
        .collect::<Vec<_>>()
        .join(",")
}

fn decode(value: &str) -> Vec<Flash> {
    value
        .split(',')
        .filter_map(|entry| {
            let (level, message) = entry.split_once(':')?;
            Some(Flash {
                level: level.parse().ok()?,
                message: urlencoding::decode(message).ok()?.into_owned(),
            })
        })
        .collect()
}

fn flash_cookie(value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(FLASH_COOKIE, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

/// 303 重定向并附带提示
pub fn redirect_with_flash(location: &str, flashes: &[Flash]) -> HttpResponse {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((LOCATION, location));
    if !flashes.is_empty() {
        builder.cookie(flash_cookie(encode(flashes)));
    }
    builder.finish()
}

/// 读取请求中的提示
pub fn read_flashes(req: &HttpRequest) -> Vec<Flash> {
    req.cookie(FLASH_COOKIE)
        .map(|c| decode(c.value()))
        .unwrap_or_default()
}

/// 用于删除提示 cookie
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = flash_cookie(String::new());
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let flashes = vec![
            Flash::success("Screen 'A, B' created"),
            Flash::warning("GPS \"x:y\" ignored; 100% sure"),
        ];
        let encoded = encode(&flashes);
        assert!(!encoded.contains(' '));
        assert_eq!(decode(&encoded), flashes);
    }

    #[test]
    fn test_decode_ignores_garbage() {
        assert_eq!(decode("bogus,shout:hi,error:ok"), vec![Flash::error("ok")]);
    }

    #[test]
    fn test_redirect_sets_cookie() {
        let resp = redirect_with_flash("/screens", &[Flash::success("done")]);
        assert_eq!(resp.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/screens");
        let cookie = resp.cookies().find(|c| c.name() == FLASH_COOKIE).unwrap();
        assert_eq!(decode(cookie.value()), vec![Flash::success("done")]);
    }
}
