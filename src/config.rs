use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// 上传文件落盘目录 (分析前先过一跳对象存储)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub root: String,
}

/// 票据分析服务 (Textract 兼容网关)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(4200),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgres://localhost/bill_extract".to_string()),
            },
            storage: StorageConfig {
                root: std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "uploads".to_string()),
            },
            analysis: AnalysisConfig {
                endpoint: std::env::var("ANALYSIS_ENDPOINT")
                    .unwrap_or_else(|_| "http://127.0.0.1:8100".to_string()),
                api_key: std::env::var("ANALYSIS_API_KEY").unwrap_or_default(),
                timeout_secs: std::env::var("ANALYSIS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(30),
            },
        }
    }
}
