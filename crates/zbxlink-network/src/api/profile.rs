//! 서버 버전별 프로토콜 프로필.
//!
//! 토큰 전달 위치와 로그인 호출 형태는 서버 버전에 따라 달라진다.
//! 로그인/버전 감지 시점에 한 번 선택해 세션에 캐시한다.

use semver::Version;

use super::error::ApiError;

/// `user.login` 필드명이 `user` → `username`으로 바뀐 버전
pub const ZABBIX_5_4_0: Version = Version::new(5, 4, 0);

/// 토큰이 본문 `auth` 필드에서 `Authorization` 헤더로 옮겨간 버전
pub const ZABBIX_6_4_0: Version = Version::new(6, 4, 0);

/// 인증 토큰 전달 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPlacement {
    /// 요청 본문의 `auth` 필드
    BodyField,
    /// `Authorization: Bearer <token>` 헤더
    BearerHeader,
}

/// 로그인 호출 형태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStyle {
    /// 구형 `user.authenticate(user, password)`
    Authenticate,
    /// `user.login(user, password)`: 5.4.0 미만
    LoginUser,
    /// `user.login(username, password)`: 5.4.0 이상
    LoginUsername,
}

impl LoginStyle {
    /// `user` 네임스페이스 아래 메서드명
    pub fn method_name(self) -> &'static str {
        match self {
            LoginStyle::Authenticate => "authenticate",
            LoginStyle::LoginUser | LoginStyle::LoginUsername => "login",
        }
    }

    /// 사용자명 필드명
    pub fn user_field(self) -> &'static str {
        match self {
            LoginStyle::Authenticate | LoginStyle::LoginUser => "user",
            LoginStyle::LoginUsername => "username",
        }
    }
}

/// 버전에서 결정된 (토큰 위치, 로그인 형태) 쌍
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolProfile {
    pub auth: AuthPlacement,
    pub login: LoginStyle,
}

impl ProtocolProfile {
    /// 버전 범위에 맞는 프로필 선택
    ///
    /// 버전을 모르면 가장 오래된 형태(본문 토큰, `user` 필드)를 쓴다.
    pub fn for_version(version: Option<&Version>, use_authenticate: bool) -> Self {
        let auth = match version {
            Some(v) if *v >= ZABBIX_6_4_0 => AuthPlacement::BearerHeader,
            _ => AuthPlacement::BodyField,
        };
        let login = if use_authenticate {
            LoginStyle::Authenticate
        } else {
            match version {
                Some(v) if *v >= ZABBIX_5_4_0 => LoginStyle::LoginUsername,
                _ => LoginStyle::LoginUser,
            }
        };
        Self { auth, login }
    }
}

impl Default for ProtocolProfile {
    fn default() -> Self {
        Self::for_version(None, false)
    }
}

/// `apiinfo.version` 응답 문자열 해석
///
/// 엄격한 semver가 아니면 앞쪽 숫자 세 자리만 취한다 (`6.0.0beta1` → `6.0.0`).
pub fn parse_api_version(raw: &str) -> Result<Version, ApiError> {
    let raw = raw.trim();
    if let Ok(version) = Version::parse(raw) {
        return Ok(version);
    }

    let mut parts = raw.splitn(3, '.').map(|part| {
        let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
        digits.parse::<u64>().ok()
    });

    let major = parts.next().flatten();
    let minor = parts.next().flatten();
    let patch = parts.next().flatten().unwrap_or(0);

    match (major, minor) {
        (Some(major), Some(minor)) => Ok(Version::new(major, minor, patch)),
        _ => Err(ApiError::Protocol(format!("알 수 없는 API 버전: {raw}"))),
    }
}
