use crate::config::{Config, Layout};
use crate::logger::AnalysisJournal;
use crate::requester::{CycleOutcome, SampleDownloader};
use crate::service::DashboardService;
use crate::terminal::TerminalDashboard;
use crate::upload::{parse_dropped_paths, SelectedFile};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_SAMPLE_FILE: &str = "traffic_data.csv";

#[derive(Parser, Debug)]
#[command(name = "zdashboard", version, about = "Tableau de bord du service de détection d'intrusions")]
pub struct Cli {
    /// Fichier de configuration à utiliser
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Adresse du service d'analyse (remplace la configuration)
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lance une analyse et affiche le résultat
    Analyze {
        /// Fichier CSV à analyser (jeu de données du serveur si absent)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Sections affichées
        #[arg(short, long, value_enum)]
        layout: Option<Layout>,

        /// Affichage final uniquement, sans animation
        #[arg(long)]
        plain: bool,
    },
    /// Télécharge le jeu de données d'exemple du serveur
    Sample {
        #[arg(short, long, default_value = DEFAULT_SAMPLE_FILE)]
        output: PathBuf,
    },
    /// Session interactive
    Session {
        #[arg(short, long, value_enum)]
        layout: Option<Layout>,
    },
    /// Affiche la configuration effective
    Config,
}

impl Cli {
    /// Applique les options globales à la configuration chargée
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        match &self.command {
            Command::Analyze { layout: Some(layout), .. } | Command::Session { layout: Some(layout) } => {
                config.layout = *layout;
            }
            _ => {}
        }
        if let Command::Analyze { plain: true, .. } = &self.command {
            config.counter_duration_ms = 0;
        }
    }
}

/// Une analyse, puis sortie. Renvoie `true` si l'analyse a réussi.
pub async fn run_analyze(config: &Config, file: Option<&Path>, plain: bool) -> anyhow::Result<bool> {
    let dashboard = TerminalDashboard::new();
    let mut service = DashboardService::from_config(dashboard.bind(config.layout.sections()), config)
        .with_journal(AnalysisJournal::from_config(config));

    if let Some(path) = file {
        let selected = SelectedFile::from_path(path).await?;
        service.upload().select_files(vec![selected]);
    }

    let refresh = (!plain).then(|| refresh_period(config));
    let outcome = analyze_and_show(&dashboard, &mut service, refresh).await;

    Ok(outcome.is_success())
}

fn refresh_period(config: &Config) -> Duration {
    config.frame_interval() * 3
}

/// Un cycle d'analyse, l'écran étant redessiné pendant l'animation des compteurs
async fn analyze_and_show(
    dashboard: &TerminalDashboard,
    service: &mut DashboardService,
    refresh: Option<Duration>,
) -> CycleOutcome {
    let refresh = refresh.map(|period| dashboard.spawn_refresh(period));

    let outcome = service.analyze().await;
    service.settle().await;

    if let Some(refresh) = refresh {
        refresh.abort();
        print!("\x1B[2J\x1B[1;1H");
    }
    dashboard.print();

    outcome
}

pub async fn run_sample(config: &Config, output: &Path) -> anyhow::Result<()> {
    let downloader = SampleDownloader::new(config.sample_url(), config.request_timeout());
    let size = downloader.download(output).await?;
    println!("Jeu de données enregistré dans {} ({} octets)", output.display(), size);
    Ok(())
}

/// Session interactive, dans l'esprit d'un invite de commandes
pub struct Session {
    config: Config,
    dashboard: TerminalDashboard,
    service: DashboardService,
    running: bool,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let dashboard = TerminalDashboard::new();
        let service = DashboardService::from_config(dashboard.bind(config.layout.sections()), &config)
            .with_journal(AnalysisJournal::from_config(&config));

        Self::with_service(config, dashboard, service)
    }

    /// Session sur un service déjà lié à `dashboard`
    pub fn with_service(config: Config, dashboard: TerminalDashboard, service: DashboardService) -> Self {
        Self {
            config,
            dashboard,
            service,
            running: true,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        println!("ZDashboard - Tapez 'help' pour la liste des commandes");
        self.dashboard.print();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while self.running {
            print!("zdashboard> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            self.process_command(line.trim()).await;
        }

        Ok(())
    }

    async fn process_command(&mut self, command: &str) {
        let (name, rest) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };

        match name {
            "" => {}
            "help" => show_help(),
            "select" => self.select(rest).await,
            "analyze" => self.analyze().await,
            "sample" => {
                let output = if rest.is_empty() { DEFAULT_SAMPLE_FILE } else { rest };
                if let Err(e) = run_sample(&self.config, Path::new(output)).await {
                    error!("Téléchargement impossible: {}", e);
                }
            }
            "status" => self.dashboard.print(),
            "exit" | "quit" => self.running = false,
            _ => self.try_drop(command).await,
        }
    }

    async fn select(&mut self, argument: &str) {
        let paths = parse_dropped_paths(argument);
        let files = self.load_files(&paths).await;

        // Seul `select` sans argument vide la sélection
        if !paths.is_empty() && files.is_empty() {
            println!("Aucun fichier lisible, sélection inchangée.");
            return;
        }
        self.service.upload().select_files(files);
        self.dashboard.print();
    }

    /// Une ligne composée uniquement de chemins existants est un glisser-déposer
    async fn try_drop(&mut self, line: &str) {
        let paths = parse_dropped_paths(line);
        if paths.is_empty() || !paths.iter().all(|path| path.is_file()) {
            println!("Commande non reconnue. Tapez 'help' pour la liste des commandes.");
            return;
        }

        let files = self.load_files(&paths).await;
        self.service.upload().drop_files(files);
        self.dashboard.print();
    }

    async fn load_files(&self, paths: &[PathBuf]) -> Vec<SelectedFile> {
        let mut files = Vec::new();
        for path in paths {
            match SelectedFile::from_path(path).await {
                Ok(file) => files.push(file),
                Err(e) => error!("Lecture de {} impossible: {}", path.display(), e),
            }
        }
        files
    }

    async fn analyze(&mut self) {
        let refresh = refresh_period(&self.config);
        let outcome = analyze_and_show(&self.dashboard, &mut self.service, Some(refresh)).await;
        if let CycleOutcome::Success(_) = outcome {
            info!("Analyse terminée");
        }
    }
}

fn show_help() {
    println!("\nCommandes disponibles:");
    println!("  select <fichier> - Choisit le fichier CSV à analyser");
    println!("  <fichier>        - Glisser-déposer un fichier dans le terminal");
    println!("  analyze          - Lance l'analyse");
    println!("  sample [fichier] - Télécharge le jeu de données d'exemple");
    println!("  status           - Affiche le tableau de bord");
    println!("  exit             - Quitte la session\n");
}
