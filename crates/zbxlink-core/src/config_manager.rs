//! 설정 로드 관리.
//!
//! 기본값 → JSON 설정 파일 → `ZBXLINK__<SECTION>__<KEY>` 환경변수 순서로 덮어쓴다.

use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::AppConfig;
use crate::error::CoreError;

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 앱 디렉토리 이름
const APP_DIR_NAME: &str = "zbxlink";

/// 환경변수 접두사
const ENV_PREFIX: &str = "ZBXLINK";

/// 환경변수 계층 구분자
const ENV_SEPARATOR: &str = "__";

/// 설정 관리자
///
/// 명시적 경로는 필수 파일로, 플랫폼 기본 경로는 선택 파일로 취급한다.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 현재 설정
    config: AppConfig,
    /// 설정 파일 경로 (없으면 기본값 + 환경변수만 사용)
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 설정 로드
    ///
    /// `path`가 `None`이면 플랫폼 기본 경로를 시도하고, 없으면 기본값을 쓴다.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let (config_path, required) = match path {
            Some(p) => (Some(p.to_path_buf()), true),
            None => (Self::default_config_path().ok(), false),
        };

        let config = Self::build(config_path.as_deref(), required)?;
        Ok(Self {
            config,
            config_path,
        })
    }

    /// 지정된 경로로 설정 관리자 생성 (파일 필수)
    pub fn with_path(config_path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let config_path = config_path.into();
        Self::load(Some(&config_path))
    }

    /// 현재 설정
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// 설정 파일 경로
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// 플랫폼별 기본 설정 파일 경로
    pub fn default_config_path() -> Result<PathBuf, CoreError> {
        let dirs = ProjectDirs::from("", "", APP_DIR_NAME)
            .ok_or_else(|| CoreError::Config("홈 디렉토리를 찾을 수 없습니다".to_string()))?;
        Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    fn build(path: Option<&Path>, required: bool) -> Result<AppConfig, CoreError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if required && !path.exists() {
                return Err(CoreError::Config(format!(
                    "설정 파일 없음: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Json)
                    .required(required),
            );
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        match path {
            Some(p) => debug!("설정 로드 완료: {}", p.display()),
            None => debug!("설정 파일 없이 기본값 사용"),
        }
        Ok(config)
    }
}
