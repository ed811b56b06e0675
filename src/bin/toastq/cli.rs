use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use humantime::parse_duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Serialized toast scheduler demo", long_about = None)]
pub struct Cli {
    /// Chemin du fichier de configuration TOML.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Nombre de toasts de démonstration à mettre en file.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub count: Option<usize>,

    /// Durée d'affichage de chaque toast (ex. "2s").
    #[arg(long, value_parser = parse_duration)]
    pub duration: Option<Duration>,

    /// Délai entre deux mises en file (ex. "250ms").
    #[arg(long, value_parser = parse_duration)]
    pub gap: Option<Duration>,

    /// N'affiche rien à l'écran, enregistre seulement les transitions.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Utilise un layer JSON pour les logs (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Filtre de logs explicite (ex. "toastq=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
