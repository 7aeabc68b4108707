use std::{env, net::IpAddr, path::PathBuf};

use chrono_tz::Tz;
use log::*;
use ycm_common::{parse_boolean_flag, Secret};

const DEFAULT_YCM_HOST: &str = "127.0.0.1";
const DEFAULT_YCM_PORT: u16 = 8460;
const DEFAULT_HMAC_HEADER: &str = "X-Webhook-Signature";
const DEFAULT_MAIL_FROM: &str = "info@kokomoyachts.com";
const DEFAULT_ADMIN_EMAIL: &str = "brian@kokomoyachtclub.vip";
const DEFAULT_ORGANIZATION_NAME: &str = "Kokomo Yachts";
const DEFAULT_INVITE_DOMAIN: &str = "kokomoyachtclub.vip";
const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Apply the embedded database migrations at start-up
    pub run_migrations: bool,
    /// TOML file with the vendor name mappings. The built-in tables are used if this is not set.
    pub name_mappings_file: Option<PathBuf>,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address.
    pub use_forwarded: bool,
    /// The value expected in the `X-Admin-Key` header. When empty, the admin API rejects every request.
    pub admin_api_key: Secret<String>,
    pub webhook: WebhookConfig,
    pub mail: MailConfig,
    pub invites: InviteConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_YCM_HOST.to_string(),
            port: DEFAULT_YCM_PORT,
            database_url: String::default(),
            run_migrations: true,
            name_mappings_file: None,
            use_x_forwarded_for: false,
            use_forwarded: false,
            admin_api_key: Secret::default(),
            webhook: WebhookConfig::default(),
            mail: MailConfig::default(),
            invites: InviteConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("YCM_HOST").ok().unwrap_or_else(|| DEFAULT_YCM_HOST.into());
        let port = env::var("YCM_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for YCM_PORT. {e} Using the default, {DEFAULT_YCM_PORT}, instead."
                    );
                    DEFAULT_YCM_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_YCM_PORT);
        let database_url = env::var("YCM_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ YCM_DATABASE_URL is not set. Please set it to the URL for the membership database.");
            String::default()
        });
        let run_migrations = env_flag("YCM_RUN_MIGRATIONS", true);
        let name_mappings_file = env::var("YCM_NAME_MAPPINGS_FILE").ok().filter(|s| !s.trim().is_empty()).map(|s| {
            info!("🪛️ Vendor name mappings will be loaded from {s}");
            PathBuf::from(s)
        });
        if name_mappings_file.is_none() {
            info!("🪛️ YCM_NAME_MAPPINGS_FILE is not set. Using the built-in vendor name mappings.");
        }
        let use_x_forwarded_for = env_flag("YCM_USE_X_FORWARDED_FOR", false);
        let use_forwarded = env_flag("YCM_USE_FORWARDED", false);
        let admin_api_key = Secret::new(env::var("YCM_ADMIN_API_KEY").unwrap_or_default());
        if admin_api_key.is_empty() {
            warn!("🪛️ YCM_ADMIN_API_KEY is not set. The admin API will refuse every request.");
        }
        Self {
            host,
            port,
            database_url,
            run_migrations,
            name_mappings_file,
            use_x_forwarded_for,
            use_forwarded,
            admin_api_key,
            webhook: WebhookConfig::from_env_or_defaults(),
            mail: MailConfig::from_env_or_defaults(),
            invites: InviteConfig::from_env_or_defaults(),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    parse_boolean_flag(env::var(name).ok(), default)
}

//-------------------------------------------------  WebhookConfig  ----------------------------------------------------
#[derive(Clone, Debug)]
pub struct WebhookConfig {
    pub hmac_checks: bool,
    /// Hex-encoded HMAC-SHA256 key shared with FareHarbor
    pub hmac_secret: Secret<String>,
    pub hmac_header: String,
    /// If supplied, `/webhook` calls are only accepted from these addresses.
    pub whitelist: Option<Vec<IpAddr>>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            hmac_checks: false,
            hmac_secret: Secret::default(),
            hmac_header: DEFAULT_HMAC_HEADER.to_string(),
            whitelist: None,
        }
    }
}

impl WebhookConfig {
    pub fn from_env_or_defaults() -> Self {
        let hmac_checks = env_flag("YCM_WEBHOOK_HMAC_CHECKS", false);
        let hmac_secret = Secret::new(env::var("YCM_WEBHOOK_HMAC_SECRET").unwrap_or_default());
        if hmac_checks && hmac_secret.is_empty() {
            error!(
                "🪛️ Webhook HMAC checks are enabled, but YCM_WEBHOOK_HMAC_SECRET is not set. Every webhook call will \
                 be rejected."
            );
        }
        if !hmac_checks {
            warn!("🪛️ Webhook HMAC checks are disabled. Set YCM_WEBHOOK_HMAC_CHECKS=1 in production.");
        }
        let hmac_header = env::var("YCM_WEBHOOK_HMAC_HEADER").ok().unwrap_or_else(|| DEFAULT_HMAC_HEADER.into());
        let whitelist = env::var("YCM_WEBHOOK_IP_WHITELIST").ok().and_then(|s| parse_whitelist(&s));
        match &whitelist {
            Some(whitelist) if whitelist.is_empty() => {
                warn!(
                    "🚨️ The webhook IP whitelist was configured, but is empty. The server will run, but won't \
                     authorise any incoming webhook calls."
                );
            },
            None => {
                info!("🪛️ No webhook IP whitelist is set.");
            },
            Some(v) => {
                let addrs = v.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ");
                info!("🪛️ Webhook IP whitelist: {addrs}");
            },
        }
        Self { hmac_checks, hmac_secret, hmac_header, whitelist }
    }
}

/// "none", "false" and "0" explicitly disable the whitelist. Invalid entries are skipped.
fn parse_whitelist(s: &str) -> Option<Vec<IpAddr>> {
    if ["none", "false", "0", ""].contains(&s.trim().to_lowercase().as_str()) {
        return None;
    }
    let addrs = s
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| {
            s.parse::<IpAddr>()
                .map_err(|e| warn!("🪛️ Ignoring invalid IP address ({s}) in YCM_WEBHOOK_IP_WHITELIST: {e}"))
                .ok()
        })
        .collect();
    Some(addrs)
}

//-------------------------------------------------   MailConfig   -----------------------------------------------------
#[derive(Clone, Debug)]
pub struct MailConfig {
    /// HTTP mail relay endpoint. If unset, emails are written to the log instead of being sent.
    pub relay_url: Option<String>,
    pub relay_token: Secret<String>,
    pub from: String,
    /// Receives the low balance alerts
    pub admin_email: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_url: None,
            relay_token: Secret::default(),
            from: DEFAULT_MAIL_FROM.to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
        }
    }
}

impl MailConfig {
    pub fn from_env_or_defaults() -> Self {
        let relay_url = env::var("YCM_MAIL_RELAY_URL").ok().filter(|s| !s.trim().is_empty());
        if relay_url.is_none() {
            warn!("🪛️ YCM_MAIL_RELAY_URL is not set. Emails will be logged, not sent.");
        }
        let relay_token = Secret::new(env::var("YCM_MAIL_RELAY_TOKEN").unwrap_or_default());
        let from = env::var("YCM_MAIL_FROM").ok().unwrap_or_else(|| DEFAULT_MAIL_FROM.into());
        let admin_email = env::var("YCM_ADMIN_EMAIL").ok().unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.into());
        Self { relay_url, relay_token, from, admin_email }
    }
}

//-------------------------------------------------  InviteConfig  -----------------------------------------------------
#[derive(Clone, Debug)]
pub struct InviteConfig {
    pub organization_name: String,
    /// Domain part of calendar event UIDs
    pub domain: String,
    /// Calendar invites are written in this timezone
    pub timezone: Tz,
    /// When set, every owner invite is delivered here instead of to the owners. Intended for staging deployments.
    pub recipient_override: Option<String>,
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            organization_name: DEFAULT_ORGANIZATION_NAME.to_string(),
            domain: DEFAULT_INVITE_DOMAIN.to_string(),
            timezone: DEFAULT_TIMEZONE,
            recipient_override: None,
        }
    }
}

impl InviteConfig {
    pub fn from_env_or_defaults() -> Self {
        let organization_name =
            env::var("YCM_ORGANIZATION_NAME").ok().unwrap_or_else(|| DEFAULT_ORGANIZATION_NAME.into());
        let domain = env::var("YCM_INVITE_DOMAIN").ok().unwrap_or_else(|| DEFAULT_INVITE_DOMAIN.into());
        let timezone = env::var("YCM_ORGANIZATION_TIMEZONE")
            .ok()
            .and_then(|s| {
                s.parse::<Tz>()
                    .map_err(|e| warn!("🪛️ Invalid YCM_ORGANIZATION_TIMEZONE ({s}). {e}. Using {DEFAULT_TIMEZONE}."))
                    .ok()
            })
            .unwrap_or(DEFAULT_TIMEZONE);
        let recipient_override = env::var("YCM_INVITE_RECIPIENT_OVERRIDE").ok().filter(|s| !s.trim().is_empty());
        if let Some(to) = &recipient_override {
            warn!("🪛️ YCM_INVITE_RECIPIENT_OVERRIDE is set. All owner invites will be sent to {to}.");
        }
        Self { organization_name, domain, timezone, recipient_override }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn whitelist_parsing() {
        assert_eq!(parse_whitelist("none"), None);
        assert_eq!(parse_whitelist("FALSE"), None);
        let list = parse_whitelist("10.0.0.1, not-an-ip,::1").unwrap();
        assert_eq!(list, vec!["10.0.0.1".parse::<IpAddr>().unwrap(), "::1".parse::<IpAddr>().unwrap()]);
        assert_eq!(parse_whitelist("garbage"), Some(vec![]));
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8460);
        assert!(config.run_migrations);
        assert_eq!(config.webhook.hmac_header, "X-Webhook-Signature");
        assert_eq!(config.invites.timezone, chrono_tz::America::New_York);
        assert_eq!(config.mail.admin_email, "brian@kokomoyachtclub.vip");
    }
}
