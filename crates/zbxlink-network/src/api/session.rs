//! 세션 상태.
//!
//! 인증 토큰, 요청 ID 카운터, 감지된 서버 버전, 인증 방식을 보관한다.
//! `&mut`으로만 변경되므로 여러 태스크에서 공유하려면 호출자가 직렬화해야 한다.

use semver::Version;

use super::profile::ProtocolProfile;

/// 인증 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// 사용자명/비밀번호 로그인: 로그아웃, 인증 확인 가능
    #[default]
    Credentials,
    /// 호출자가 넘긴 API 토큰: 로그아웃/인증 확인 생략
    ApiToken,
}

/// JSON-RPC 세션
#[derive(Clone, Default)]
pub struct Session {
    auth: String,
    next_id: u64,
    version: Option<Version>,
    mode: AuthMode,
    profile: ProtocolProfile,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &!self.auth.is_empty())
            .field("next_id", &self.next_id)
            .field("version", &self.version)
            .field("mode", &self.mode)
            .field("profile", &self.profile)
            .finish()
    }
}

impl Session {
    /// 현재 토큰 (비어 있으면 미인증)
    pub fn auth(&self) -> &str {
        &self.auth
    }

    /// 다음 요청에 쓸 ID
    pub fn request_id(&self) -> u64 {
        self.next_id
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn profile(&self) -> ProtocolProfile {
        self.profile
    }

    pub fn uses_api_token(&self) -> bool {
        self.mode == AuthMode::ApiToken
    }

    /// ID 발급 후 카운터 증가
    pub(crate) fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// 감지된 버전 저장 및 프로필 재선택
    pub(crate) fn set_version(&mut self, version: Version, use_authenticate: bool) {
        self.profile = ProtocolProfile::for_version(Some(&version), use_authenticate);
        self.version = Some(version);
    }

    /// 버전 없이 프로필만 재선택 (`use_authenticate` 반영)
    pub(crate) fn refresh_profile(&mut self, use_authenticate: bool) {
        self.profile = ProtocolProfile::for_version(self.version.as_ref(), use_authenticate);
    }

    pub(crate) fn set_api_token(&mut self, token: &str) {
        self.mode = AuthMode::ApiToken;
        self.auth = token.to_string();
    }

    pub(crate) fn set_credentials_token(&mut self, token: String) {
        self.mode = AuthMode::Credentials;
        self.auth = token;
    }

    pub(crate) fn clear_auth(&mut self) {
        self.auth.clear();
    }
}
