use tracing_subscriber::EnvFilter;

use crate::config::Environment;

/// Installs the global tracing subscriber for `env`.
///
/// `local` logs human-readable lines at debug level, `dev` logs JSON at
/// debug level and `prod` logs JSON at info level. `RUST_LOG` overrides the
/// level in every environment. Records emitted through the `log` facade
/// (e.g. by sqlx) are forwarded into tracing.
pub fn init(env: Environment) -> anyhow::Result<()> {
    tracing_log::LogTracer::init()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(env)));

    match env {
        Environment::Local => {
            let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        Environment::Dev | Environment::Prod => {
            let subscriber = tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    Ok(())
}

fn default_directive(env: Environment) -> &'static str {
    match env {
        Environment::Local | Environment::Dev => "debug",
        Environment::Prod => "info",
    }
}
