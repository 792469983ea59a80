use std::path::PathBuf;

use crate::generate::GeneratorOptions;

#[derive(Debug, clap::Parser)]
#[command(name = "serve")]
#[command(about = "Start the HTTP API")]
pub struct App {
    /// Port to listen on
    #[arg(short, long, env = "SITEGEN_PORT", default_value = "8000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "SITEGEN_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// SQLite database holding users and tasks
    #[arg(long, env = "SITEGEN_DATABASE", default_value = "data.db")]
    pub database: PathBuf,

    #[clap(flatten)]
    pub generator: GeneratorOptions,
}
