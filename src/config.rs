use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 应用配置管理模块
/// 集中管理所有配置项，提供默认值和配置验证

/// 配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "TILT_LOGGER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "tilt_logger.toml";

/// 主配置结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub gpio: GpioConfig,
    pub accelerometer: AccelerometerConfig,
    pub sampling: SamplingConfig,
    pub storage: StorageConfig,
}

/// 障碍传感器 GPIO 配置（BCM 编号）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpioConfig {
    pub obstacle_pin: u64,
    pub active_low: bool,
}

/// 加速度计 I2C 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccelerometerConfig {
    pub i2c_bus: String,
    pub address: u8,
}

/// 采样循环配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// 检测到障碍后的阻塞延时（秒）
    pub detection_delay_secs: f64,
}

/// 持久化文件配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
    pub indent: usize,
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            obstacle_pin: 14,
            active_low: true,
        }
    }
}

impl Default for AccelerometerConfig {
    fn default() -> Self {
        Self {
            i2c_bus: "/dev/i2c-1".to_string(),
            address: crate::sensors::adxl345::DEFAULT_ADDRESS,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            detection_delay_secs: 3.0,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "sample.json".to_string(),
            indent: 4,
        }
    }
}

impl SamplingConfig {
    /// 已通过 validate() 的配置不会落到默认分支
    pub fn detection_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.detection_delay_secs).unwrap_or(Duration::ZERO)
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;
        Self::from_toml(&content)
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;
        std::fs::write(path, content).map_err(ConfigError::IoError)?;
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let delay = self.sampling.detection_delay_secs;
        if !delay.is_finite() || delay < 0.0 {
            return Err(ConfigError::ValidationError("Detection delay must be a non-negative number of seconds".to_string()));
        }
        if Duration::try_from_secs_f64(delay).is_err() {
            return Err(ConfigError::ValidationError(format!("Detection delay {delay}s is too large")));
        }

        if self.storage.path.trim().is_empty() {
            return Err(ConfigError::ValidationError("Storage path must not be empty".to_string()));
        }

        if self.accelerometer.i2c_bus.trim().is_empty() {
            return Err(ConfigError::ValidationError("I2C bus path must not be empty".to_string()));
        }

        if self.accelerometer.address > 0x7F {
            return Err(ConfigError::ValidationError("I2C address must be a 7-bit value".to_string()));
        }

        Ok(())
    }

    /// 获取持久化文件路径
    pub fn get_storage_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.path)
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// 配置管理器
pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 创建配置管理器（默认配置）
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            config_path: None,
        }
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            config,
            config_path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// 文件存在则加载，否则使用默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::new())
        }
    }

    /// 按环境变量解析配置路径
    pub fn resolve_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// 获取当前配置
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
