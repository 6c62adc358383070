//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::observability::ObservabilityConfig;

/// 默认工作线程池大小
pub const DEFAULT_WORKER_POOL_SIZE: usize = 4;

/// 分发引擎配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// 异步发送与批量发送使用的工作池大小
    ///
    /// 同一时刻最多有这么多个网关调用在执行，超出的任务按提交顺序排队
    pub worker_pool_size: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            worker_pool_size: DEFAULT_WORKER_POOL_SIZE,
        }
    }
}

/// 发送方默认值
///
/// 构造通知时如果调用方没有指定发件人，由这里的配置补齐，
/// 而不是在 Handler 里写死。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SenderDefaults {
    pub email_sender: Option<String>,
    pub sms_sender: Option<String>,
}

/// 邮件服务商选择
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProviderKind {
    #[default]
    SendGrid,
    Mailgun,
}

/// SendGrid 配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SendGridConfig {
    pub api_key: String,
    pub base_url: String,
}

impl Default for SendGridConfig {
    fn default() -> Self {
        Self {
            api_key: "dev-sendgrid-key".to_string(),
            base_url: "https://api.sendgrid.com/v3/mail/send".to_string(),
        }
    }
}

/// Mailgun 配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailgunConfig {
    pub api_key: String,
    pub domain: String,
    pub base_url: String,
}

impl Default for MailgunConfig {
    fn default() -> Self {
        Self {
            api_key: "dev-mailgun-key".to_string(),
            domain: "mg.example.com".to_string(),
            base_url: "https://api.mailgun.net/v3".to_string(),
        }
    }
}

/// Twilio 短信配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// 短信发送号码
    pub from_number: String,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: "dev-account-sid".to_string(),
            auth_token: "dev-auth-token".to_string(),
            from_number: "+15005550006".to_string(),
        }
    }
}

/// Firebase 推送配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub service_account_key: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: "dev-project".to_string(),
            service_account_key: "dev-service-account-key".to_string(),
        }
    }
}

/// Slack 配置
///
/// `webhook_url` 与 `bot_token` 至少配置一个
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Incoming Webhook 地址
    pub webhook_url: Option<String>,
    /// Bot API token
    pub bot_token: Option<String>,
    pub default_channel: Option<String>,
    pub username: Option<String>,
    pub icon_emoji: Option<String>,
    pub base_url: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            webhook_url: Some("https://hooks.slack.com/services/dev".to_string()),
            bot_token: None,
            default_channel: Some("#alerts".to_string()),
            username: Some("notification-bot".to_string()),
            icon_emoji: None,
            base_url: "https://slack.com/api".to_string(),
        }
    }
}

/// 各渠道服务商配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// 邮件渠道使用的服务商
    pub email: EmailProviderKind,
    pub sendgrid: SendGridConfig,
    pub mailgun: MailgunConfig,
    pub twilio: TwilioConfig,
    pub firebase: FirebaseConfig,
    pub slack: SlackConfig,
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub dispatch: DispatchConfig,
    pub observability: ObservabilityConfig,
    pub defaults: SenderDefaults,
    pub providers: ProvidersConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: "notification-worker".to_string(),
            environment: "development".to_string(),
            dispatch: DispatchConfig::default(),
            observability: ObservabilityConfig::default(),
            defaults: SenderDefaults::default(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（NOTIFY_ 前缀，层级用双下划线分隔，
    ///    如 NOTIFY_DISPATCH__WORKER_POOL_SIZE -> dispatch.worker_pool_size）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("NOTIFY_ENV").unwrap_or_else(|_| "development".to_string());

        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            .set_default("observability.service_name", service_name)?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", service_name)))
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("NOTIFY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
