mod analysis;
mod api;
mod config;
mod display;
mod logging;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::analysis::latest::{latest_results, DEFAULT_LATEST};
use crate::analysis::sampler::{generate_tickets, DEFAULT_QUANTITY};
use crate::analysis::simulator::{count_matches, MatchResult};
use crate::analysis::{analyse, compute_stats, load_draws};
use crate::config::AppConfig;
use crate::display::{display_columns, display_latest, display_matches, display_stats, display_tickets};
use sortematica_data::loader::DrawStore;
use sortematica_data::models::{normalize_lottery, Lottery, Ticket};
use sortematica_data::sniff::sniff_columns;

#[derive(Parser)]
#[command(name = "sortematica", about = "Estatísticas, palpites e simulador das loterias")]
struct Cli {
    /// Arquivo de configuração (padrão: sortematica.toml, se existir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Diretório das planilhas de resultados
    #[arg(long, global = true, env = "SORTEMATICA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Iniciar o servidor HTTP
    Serve {
        /// Endereço de escuta (ex: 0.0.0.0:10000)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Últimos resultados de uma loteria
    Latest {
        loteria: String,

        /// Número de concursos
        #[arg(short, long, default_value_t = DEFAULT_LATEST)]
        n: usize,
    },

    /// Frequências, TOP 10 e números mais atrasados
    Stats { loteria: String },

    /// Gerar palpites aleatórios
    Generate {
        loteria: String,

        /// Quantidade de jogos
        #[arg(short, long, default_value_t = DEFAULT_QUANTITY)]
        quantidade: usize,

        /// Dezenas por jogo (padrão: as da loteria)
        #[arg(short, long)]
        dezenas: Option<usize>,

        /// Seed para reprodutibilidade
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Contar acertos de jogos contra um sorteio
    Simulate {
        loteria: String,

        /// Dezenas sorteadas (ex: 1,2,3,4,5)
        #[arg(long, value_delimiter = ',', required = true)]
        drawn: Vec<u8>,

        /// Um jogo (ex: 1,2,9); repetir para vários jogos
        #[arg(long = "ticket", required = true)]
        tickets: Vec<String>,
    },

    /// Mostrar as colunas detectadas na planilha
    Columns { loteria: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Configuração inválida")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let command = cli.command;
    if !matches!(command, Command::Serve { .. }) {
        logging::init_logging_simple();
    }
    let store = DrawStore::new(&config.data_dir);

    match command {
        Command::Serve { bind } => {
            logging::init_logging();
            if let Some(bind) = bind {
                config.bind = bind;
            }
            api::serve(&config).await
        }
        Command::Latest { loteria, n } => cmd_latest(&store, &loteria, n),
        Command::Stats { loteria } => cmd_stats(&store, &loteria),
        Command::Generate {
            loteria,
            quantidade,
            dezenas,
            seed,
        } => cmd_generate(&loteria, quantidade, dezenas, seed),
        Command::Simulate {
            loteria,
            drawn,
            tickets,
        } => cmd_simulate(&loteria, &drawn, &tickets),
        Command::Columns { loteria } => cmd_columns(&store, &loteria),
    }
}

fn lottery_arg(loteria: &str) -> Result<Lottery> {
    Ok(normalize_lottery(loteria)?)
}

fn cmd_latest(store: &DrawStore, loteria: &str, n: usize) -> Result<()> {
    let lottery = lottery_arg(loteria)?;
    let results = latest_results(store, lottery, n)?;
    display_latest(lottery, &results);
    Ok(())
}

fn cmd_stats(store: &DrawStore, loteria: &str) -> Result<()> {
    let lottery = lottery_arg(loteria)?;
    let draws = load_draws(store, lottery)?;
    let analysis = analyse(&draws, lottery);
    let stats = compute_stats(&draws, lottery.max_number());
    display_stats(lottery, &analysis, &stats);
    Ok(())
}

fn cmd_generate(loteria: &str, quantidade: usize, dezenas: Option<usize>, seed: Option<u64>) -> Result<()> {
    let lottery = lottery_arg(loteria)?;
    let tickets = generate_tickets(lottery, quantidade, dezenas, seed)?;
    display_tickets(lottery, &tickets);
    Ok(())
}

fn check_range(numbers: &[u8], lottery: Lottery) -> Result<()> {
    if let Some(n) = numbers.iter().find(|&&n| !lottery.contains(n as i64)) {
        bail!("Dezena {} fora do intervalo (1-{})", n, lottery.max_number());
    }
    Ok(())
}

fn parse_ticket(raw: &str, lottery: Lottery) -> Result<Ticket> {
    let ticket = raw
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<u8>()
                .with_context(|| format!("Dezena inválida: '{}'", part))
        })
        .collect::<Result<Ticket>>()?;
    check_range(&ticket, lottery)?;
    Ok(ticket)
}

fn cmd_simulate(loteria: &str, drawn: &[u8], raw_tickets: &[String]) -> Result<()> {
    let lottery = lottery_arg(loteria)?;
    check_range(drawn, lottery).context("Dezenas sorteadas inválidas")?;
    let tickets = raw_tickets
        .iter()
        .map(|raw| parse_ticket(raw, lottery))
        .collect::<Result<Vec<_>>>()?;

    let results: Vec<MatchResult> = tickets
        .iter()
        .enumerate()
        .map(|(i, t)| MatchResult {
            jogo: i + 1,
            acertos: count_matches(t, drawn),
        })
        .collect();

    display_matches(drawn, &tickets, &results);
    Ok(())
}

fn cmd_columns(store: &DrawStore, loteria: &str) -> Result<()> {
    let lottery = lottery_arg(loteria)?;
    let table = store.load(lottery)?;
    let roles = sniff_columns(&table, lottery);
    display_columns(&table, &roles);
    Ok(())
}
