use clap::{Parser, ValueEnum};
use hexboard::{BoardGenerationParams, BoardSize, GeneratedBoard, generate_board, generate_boards};
use hexboard::validation::validate_board;
use std::path::PathBuf;

/// Генератор сбалансированных игровых полей
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Размер поля (перекрывает значение из конфигурации)
    #[arg(short, long, value_enum)]
    size: Option<SizeArg>,

    /// Число кандидатов поиска (перекрывает значение из конфигурации)
    #[arg(short = 'n', long)]
    candidates: Option<u32>,

    /// Сид генератора (перекрывает значение из конфигурации)
    #[arg(long)]
    seed: Option<u64>,

    /// Сколько полей сгенерировать
    #[arg(short, long, default_value_t = 1)]
    boards: usize,

    /// Путь для сохранения полей в JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SizeArg {
    Standard,
    Extended,
}

impl From<SizeArg> for BoardSize {
    fn from(value: SizeArg) -> Self {
        match value {
            SizeArg::Standard => BoardSize::Standard,
            SizeArg::Extended => BoardSize::Extended,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut params = match &cli.config {
        Some(path) => {
            println!("🔍 Загрузка конфигурации из {}...", path.display());
            BoardGenerationParams::from_toml_file(path)?
        }
        None => BoardGenerationParams::default(),
    };
    if let Some(size) = cli.size {
        params.board_size = size.into();
    }
    if let Some(candidates) = cli.candidates {
        params.candidate_count = candidates;
    }
    if cli.seed.is_some() {
        params.seed = cli.seed;
    }

    println!(
        "Генерация {} пол(я/ей) {:?}, кандидатов: {}...",
        cli.boards, params.board_size, params.candidate_count
    );
    let boards: Vec<GeneratedBoard> = if cli.boards > 1 {
        let base_seed = params.seed.unwrap_or_else(rand::random);
        generate_boards(&params, base_seed, cli.boards)
    } else {
        vec![generate_board(&params)]
    };

    for (i, board) in boards.iter().enumerate() {
        print_summary(i, board);
        let violations = validate_board(&board.tiles, board.board_size);
        for violation in &violations {
            tracing::error!(board = i, %violation, "invalid board");
        }
    }

    if let Some(path) = &cli.output {
        println!("Сохранение в {}", path.display());
        std::fs::write(path, serde_json::to_string_pretty(&boards)?)?;
    }

    println!("\nГотово!");
    Ok(())
}

fn print_summary(index: usize, board: &GeneratedBoard) {
    let metrics = &board.metrics;
    println!(
        "\n#{index} сид: {}, исход: {:?}, оценка: {}",
        board.seed.map_or_else(|| "-".to_string(), |s| s.to_string()),
        board.outcome,
        board.score.map_or_else(|| "-".to_string(), |s| s.to_string()),
    );
    println!(
        "   точки по ресурсам: {}",
        metrics
            .pip_totals_by_resource
            .iter()
            .filter(|(terrain, _)| !terrain.is_desert())
            .map(|(terrain, pips)| format!("{terrain}={pips}"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "   сильнейший перекрёсток: {}, средний: {:.2}, соседние 6/8: {}",
        metrics.strongest_intersection,
        metrics.average_intersection_value,
        if metrics.has_adjacent_six_eight { "да" } else { "нет" }
    );
    println!("   гаваней: {}", board.harbors.len());
}
