//! 환경 변수 기반 설정 관리

use std::env;
use std::time::Duration;

const DEFAULT_SWEEP_INTERVAL_MS: u64 = 15_000;
const DEFAULT_STALE_THRESHOLD_MS: u64 = 10_000;

/// 서버 설정
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub presence: PresenceConfig,
    pub log_level: String,
}

/// 참여자 상태(presence) 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceConfig {
    /// 정리 주기
    pub sweep_interval_ms: u64,
    /// 마지막 heartbeat 이후 이 시간이 지나면 퇴장 처리
    pub stale_threshold_ms: u64,
}

impl PresenceConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
            stale_threshold_ms: DEFAULT_STALE_THRESHOLD_MS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
            cors_origins: vec!["*".to_string()],
            presence: PresenceConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 key 조회 함수로 설정 구성 (테스트에서 환경 변수 대신 사용)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            port: lookup("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
            host: lookup("HOST").unwrap_or(defaults.host),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|origins| !origins.is_empty())
                .unwrap_or(defaults.cors_origins),
            presence: PresenceConfig {
                sweep_interval_ms: positive_millis(
                    lookup("SWEEP_INTERVAL_MS"),
                    DEFAULT_SWEEP_INTERVAL_MS,
                ),
                stale_threshold_ms: positive_millis(
                    lookup("STALE_THRESHOLD_MS"),
                    DEFAULT_STALE_THRESHOLD_MS,
                ),
            },
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    /// CORS 허용 origin이 와일드카드인지 여부
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

// 0 이하 또는 파싱 불가 값은 기본값으로
fn positive_millis(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(default)
}
