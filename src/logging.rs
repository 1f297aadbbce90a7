//! Inicialización de logging.
//!
//! Las librerías del workspace emiten con `log`; el suscriptor de
//! `tracing-subscriber` recoge esos registros a través de su puente
//! `tracing-log`.

use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Instala el suscriptor global. Llamadas repetidas no hacen nada.
pub fn init_logging(config: &AppConfig, verbose: u8) {
    let filter = EnvFilter::try_new(config.log_level(verbose)).unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt().with_env_filter(filter)
                                             .with_writer(std::io::stderr)
                                             .with_target(verbose >= 2)
                                             .with_thread_ids(verbose >= 3)
                                             .with_line_number(verbose >= 3)
                                             .try_init()
                                             .is_ok();
    if installed {
        debug!("railflow started with verbosity level: {verbose}");
        trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
    }
}
