use anyhow::Result;
use catalyst_notify::resend::ResendMailer;
use catalyst_notify::smtp::SmtpMailer;
use catalyst_notify::{ContactMailSettings, ContactNotifier, Mailer};
use catalyst_storage::{ContentStore, MediaLibrary};
use chrono::Utc;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use catalyst_server::app;
use catalyst_server::config::{MailConfig, MailProvider, MediaBackend, ServerConfig};
use catalyst_server::state::AppState;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  catalyst-server [config.toml]    Start the server (default: config/server.toml)");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install default CryptoProvider: {e:?}"))?;

    catalyst_common::id::init(1, 1);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("catalyst=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("-h") | Some("--help") => {
            print_usage();
            Ok(())
        }
        other => run_server(other.unwrap_or("config/server.toml")).await,
    }
}

fn build_mailer(mail: &MailConfig) -> Result<Arc<dyn Mailer>> {
    let mailer: Arc<dyn Mailer> = match mail.provider {
        MailProvider::Resend => {
            let key = mail.api_key.as_deref().unwrap_or_default();
            Arc::new(ResendMailer::new(&mail.api_base, key)?)
        }
        MailProvider::Smtp => Arc::new(SmtpMailer::new(
            &mail.smtp.host,
            mail.smtp.port,
            mail.smtp.username.as_deref(),
            mail.smtp.password.as_deref(),
        )?),
    };
    Ok(mailer)
}

async fn run_server(config_path: &str) -> Result<()> {
    let config = ServerConfig::load(config_path)?;
    tracing::info!(
        config = %config_path,
        http_port = config.http_port,
        media_backend = ?config.media.backend,
        mail_enabled = config.mail.enabled,
        "catalyst-server starting"
    );

    let store = Arc::new(ContentStore::new(&config.database.url).await?);

    let media = match config.media.backend {
        MediaBackend::Local => MediaLibrary::local(
            Path::new(&config.media.local_root),
            store.clone(),
            &config.public_base_url,
        )?,
        MediaBackend::S3 => MediaLibrary::s3_from_env(
            &config.media.s3_bucket,
            store.clone(),
            &config.public_base_url,
        )?,
    };

    let contact_notifier = if config.mail.enabled {
        let mailer = build_mailer(&config.mail)?;
        tracing::info!(provider = %mailer.provider(), "Contact mail enabled");
        Some(Arc::new(ContactNotifier::new(
            mailer,
            ContactMailSettings {
                admin_recipients: config.mail.admin_recipients.clone(),
                notify_from: config.mail.notify_from.clone(),
                reply_from: config.mail.reply_from.clone(),
                site_name: config.mail.site_name.clone(),
            },
        )))
    } else {
        tracing::info!("Contact mail disabled");
        None
    };

    let jwt_secret = match &config.auth.jwt_secret {
        Some(secret) => Arc::new(secret.clone()),
        None => {
            let secret = catalyst_storage::auth::generate_token();
            tracing::warn!("No jwt_secret configured. A random secret was generated and will change on restart. Set [auth].jwt_secret or CATALYST_JWT_SECRET for production use.");
            Arc::new(secret)
        }
    };

    if config.auth.service_key.is_none() {
        tracing::info!("No service key configured, bulk import is limited to admin sessions");
    }

    match store.count_users().await {
        Ok(0) => {
            let password_hash =
                catalyst_storage::auth::hash_password(&config.auth.default_password)?;
            match store
                .create_user(&config.auth.default_username, &password_hash)
                .await
            {
                Ok(_) => {
                    tracing::info!(
                        username = %config.auth.default_username,
                        "Created default admin account"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create default admin account");
                }
            }
        }
        Ok(count) => {
            tracing::info!(
                count,
                "Users table already has accounts, skipping default admin creation"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to check users table");
        }
    }

    let http_port = config.http_port;
    let state = AppState {
        store,
        media: Arc::new(media),
        contact_notifier,
        start_time: Utc::now(),
        jwt_secret,
        service_key: config.auth.service_key.clone().map(Arc::new),
        token_expire_secs: config.auth.token_expire_secs,
        config: Arc::new(config),
    };

    let http_addr: SocketAddr = format!("0.0.0.0:{http_port}").parse()?;
    let http_listener = tokio::net::TcpListener::bind(http_addr).await?;
    tracing::info!(http = %http_addr, "Server started");

    axum::serve(http_listener, app::build_http_app(state))
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
            tracing::info!("Shutting down gracefully");
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
