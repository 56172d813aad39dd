use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub mail: MailConfig,
    pub admin: AdminConfig,
    pub cors_allowed_origins: Option<String>,
    pub log_format: LogFormat,
}

/// Mail delivery settings. Everything is optional at boot: a missing value only
/// disables the workflows that need it.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct MailConfig {
    pub sender_address: Option<String>,
    pub admin_address: Option<String>,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct AdminConfig {
    pub panel_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        let server_port = env::var("SERVER_PORT")
            .or_else(|_| env::var("PORT"))
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        Ok(Config {
            server_port,
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
            mail: MailConfig {
                sender_address: non_empty_var("MAIL_SENDER_ADDRESS"),
                admin_address: non_empty_var("MAIL_ADMIN_ADDRESS"),
                api_url: non_empty_var("MAIL_API_URL"),
                api_key: non_empty_var("MAIL_API_KEY"),
            },
            admin: AdminConfig {
                panel_url: non_empty_var("ADMIN_PANEL_URL"),
                username: non_empty_var("ADMIN_USERNAME"),
                password: non_empty_var("ADMIN_PASSWORD"),
            },
            cors_allowed_origins: non_empty_var("CORS_ALLOWED_ORIGINS"),
            log_format: parse_log_format(&env::var("LOG_FORMAT").unwrap_or_default()),
        })
    }
}

impl MailConfig {
    /// Names of the settings a submission needs but that are absent.
    pub fn missing_for_submission(&self) -> Vec<&'static str> {
        let mut missing = self.missing_for_delivery();
        if self.admin_address.is_none() {
            missing.push("MAIL_ADMIN_ADDRESS");
        }
        missing
    }

    /// Names of the settings any outgoing email needs but that are absent.
    pub fn missing_for_delivery(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.sender_address.is_none() {
            missing.push("MAIL_SENDER_ADDRESS");
        }
        if self.api_url.is_none() {
            missing.push("MAIL_API_URL");
        }
        if self.api_key.is_none() {
            missing.push("MAIL_API_KEY");
        }
        missing
    }
}

/// Addresses a submission sends to, resolved once configuration is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionAddresses<'a> {
    pub sender: &'a str,
    pub admin: &'a str,
}

impl MailConfig {
    pub fn submission_addresses(&self) -> Result<SubmissionAddresses<'_>, Vec<&'static str>> {
        let missing = self.missing_for_submission();
        match (&self.sender_address, &self.admin_address) {
            (Some(sender), Some(admin)) if missing.is_empty() => Ok(SubmissionAddresses {
                sender: sender.as_str(),
                admin: admin.as_str(),
            }),
            _ => Err(missing),
        }
    }

    pub fn delivery_sender(&self) -> Result<&str, Vec<&'static str>> {
        let missing = self.missing_for_delivery();
        match &self.sender_address {
            Some(sender) if missing.is_empty() => Ok(sender.as_str()),
            _ => Err(missing),
        }
    }
}

impl AdminConfig {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_log_format(raw: &str) -> LogFormat {
    match raw.trim().to_lowercase().as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_mail() -> MailConfig {
        MailConfig {
            sender_address: Some("noreply@example.com".to_string()),
            admin_address: Some("admin@example.com".to_string()),
            api_url: Some("https://mail.example.com/v3".to_string()),
            api_key: Some("key".to_string()),
        }
    }

    #[test]
    fn complete_mail_config_has_nothing_missing() {
        assert!(full_mail().missing_for_submission().is_empty());
    }

    #[test]
    fn reports_every_missing_mail_setting() {
        let mail = MailConfig::default();
        assert_eq!(
            mail.missing_for_submission(),
            vec![
                "MAIL_SENDER_ADDRESS",
                "MAIL_API_URL",
                "MAIL_API_KEY",
                "MAIL_ADMIN_ADDRESS"
            ]
        );
    }

    #[test]
    fn status_emails_do_not_need_admin_address() {
        let mut mail = full_mail();
        mail.admin_address = None;
        assert!(mail.missing_for_delivery().is_empty());
        assert_eq!(mail.missing_for_submission(), vec!["MAIL_ADMIN_ADDRESS"]);
    }

    #[test]
    fn admin_credentials_need_both_parts() {
        let mut admin = AdminConfig {
            panel_url: None,
            username: Some("admin".to_string()),
            password: None,
        };
        assert!(admin.credentials().is_none());

        admin.password = Some("secret".to_string());
        assert_eq!(admin.credentials(), Some(("admin", "secret")));
    }

    #[test]
    fn parses_log_format() {
        assert_eq!(parse_log_format("JSON"), LogFormat::Json);
        assert_eq!(parse_log_format(""), LogFormat::Pretty);
        assert_eq!(parse_log_format("text"), LogFormat::Pretty);
    }
}
