//! 범위 기반 세션 가드.
//!
//! 작업 결과를 [`SessionGuard::finish`]에 넘기면 조건에 따라 로그아웃한다.
//! - 성공 또는 라이브러리 프로토콜 에러(`ApiError::permits_logout`)로 끝난 경우만 대상
//! - 사용자명/비밀번호 세션이고 서버가 인증 상태라고 답할 때만 `user.logout` 호출
//! - 전송 실패 등 그 밖의 에러는 로그아웃 없이 그대로 반환

use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

use super::client::ZabbixApi;
use super::error::ApiError;

/// 세션 가드: `ZabbixApi`로 역참조된다
pub struct SessionGuard<'a> {
    api: &'a mut ZabbixApi,
    finished: bool,
}

impl<'a> SessionGuard<'a> {
    pub(crate) fn new(api: &'a mut ZabbixApi) -> Self {
        Self {
            api,
            finished: false,
        }
    }

    /// 작업 결과를 받아 정리 후 그대로 반환
    ///
    /// 로그아웃 실패는 작업이 성공했을 때만 에러로 올라온다.
    /// 작업이 이미 실패했다면 원래 에러를 우선한다.
    pub async fn finish<T>(mut self, outcome: Result<T, ApiError>) -> Result<T, ApiError> {
        self.finished = true;

        if let Err(e) = &outcome {
            if !e.permits_logout() {
                debug!("예상 밖 에러로 종료, 로그아웃 생략: {e}");
                return outcome;
            }
        }

        match (outcome, self.release().await) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(cleanup)) => Err(cleanup),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(cleanup)) => {
                warn!("로그아웃 실패 (원래 에러 우선): {cleanup}");
                Err(e)
            }
        }
    }

    async fn release(&mut self) -> Result<(), ApiError> {
        if self.api.uses_api_token() {
            return Ok(());
        }
        if self.api.is_authenticated().await? {
            self.api.logout().await?;
        }
        Ok(())
    }
}

impl Deref for SessionGuard<'_> {
    type Target = ZabbixApi;

    fn deref(&self) -> &Self::Target {
        &*self.api
    }
}

impl DerefMut for SessionGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.api
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        if !self.finished && !self.api.uses_api_token() && !self.api.auth().is_empty() {
            warn!("세션 가드가 finish 없이 해제됨, 로그아웃되지 않은 세션이 남음");
        }
    }
}
