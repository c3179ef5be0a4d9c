//! 로그 출력용 민감 정보 마스킹.
//!
//! 요청/응답 본문을 `debug!`로 남기기 전에 비밀번호와 세션 토큰을 가린다.

use once_cell::sync::Lazy;
use regex::{Captures, Match, Regex};
use std::borrow::Cow;

/// 마스킹 문자열
pub const HIDE_MASK: &str = "********";

/// `"password": "..."` 값 (이스케이프된 따옴표 포함) 또는 32자 이상 소문자/숫자 토큰
static SENSITIVE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?P<key>password)"\s*:\s*"(?P<password>(?:\\.|[^"\\])*)"|\W(?P<token>[a-z0-9]{32,})"#,
    )
    .expect("민감 정보 패턴 컴파일 실패")
});

fn mask_group(caps: &Captures<'_>, group: Match<'_>) -> String {
    let whole = &caps[0];
    let offset = caps.get(0).map_or(0, |m| m.start());
    let from = group.start() - offset;
    let to = group.end() - offset;
    format!("{}{}{}", &whole[..from], HIDE_MASK, &whole[to..])
}

/// 비밀번호/토큰을 `********`로 치환한 문자열 반환
///
/// 매칭이 없으면 원본을 빌려서 그대로 돌려준다.
pub fn hide_sensitive(message: &str) -> Cow<'_, str> {
    SENSITIVE_PATTERN.replace_all(message, |caps: &Captures<'_>| {
        if let Some(password) = caps.name("password") {
            mask_group(caps, password)
        } else if let Some(token) = caps.name("token") {
            mask_group(caps, token)
        } else {
            caps[0].to_string()
        }
    })
}
