use std::process::ExitCode;
use std::time::Instant;

use clap::arg;
use clap::command;
use clap::ArgMatches;
use clap::Command;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;

use tracing_subscriber::EnvFilter;

use schach::chess_board::fen::INITIAL_POSITION;
use schach::chess_board::{ChessBoard, GameStatus};
use schach::engines::evaluation::verdict;
use schach::engines::worker::spawn_search;
use schach::engines::{evaluate, tracing_sink, white_relative, AlphaBetaEngine, Difficulty};
use schach::errors::ChessResult;

fn main() -> ExitCode {
    let matches = command!()
        .propagate_version(true)
        .arg(arg!(
            -d --debug "Turn debugging information on"
        ))
        .subcommand(
            Command::new("perft")
                .about("Run Perft test")
                .arg(arg!(-f --fen <FEN> "Board position").default_value(INITIAL_POSITION))
                .arg(
                    arg!(-x --depth <d> "depth")
                        .default_value("3")
                        .value_parser(clap::value_parser!(u8)),
                )
                .arg(
                    arg!(-m --moves <moves> "List of moves")
                        .num_args(1..)
                        .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("benchmark")
                .about("Runs a benchmark")
                .arg(arg!(-f --fen <FEN> "Board position").default_value(INITIAL_POSITION))
                .arg(
                    arg!(--"max-depth" <d> "Deepest search to time")
                        .default_value("4")
                        .value_parser(clap::value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("bestmove")
                .about("Search the best move of a position")
                .arg(arg!(-f --fen <FEN> "Board position").default_value(INITIAL_POSITION))
                .arg(
                    arg!(-x --depth <d> "Search depth in plies")
                        .value_parser(clap::value_parser!(u32))
                        .conflicts_with("level"),
                )
                .arg(arg!(-l --level <level> "easy, medium or hard")),
        )
        .subcommand(
            Command::new("eval")
                .about("Static evaluation of a position")
                .arg(arg!(-f --fen <FEN> "Board position").default_value(INITIAL_POSITION)),
        )
        .subcommand(
            Command::new("selfplay")
                .about("Let the engine play against itself")
                .arg(arg!(-l --level <level> "easy, medium or hard").default_value("easy"))
                .arg(
                    arg!(--"random-plies" <n> "Random opening plies before the engine takes over")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(--seed <seed> "Seed of the opening randomizer")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--"max-plies" <n> "Stop after this many plies")
                        .default_value("200")
                        .value_parser(clap::value_parser!(u32)),
                ),
        )
        .get_matches();

    init_tracing(matches.get_flag("debug"));

    let result = match matches.subcommand() {
        Some(("perft", arg_matches)) => perft(arg_matches),
        Some(("benchmark", arg_matches)) => benchmark(arg_matches),
        Some(("bestmove", arg_matches)) => bestmove(arg_matches),
        Some(("eval", arg_matches)) => eval(arg_matches),
        Some(("selfplay", arg_matches)) => selfplay(arg_matches),
        _ => {
            println!("{}", ChessBoard::standard().render_to_string());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn board_from_args(arg_matches: &ArgMatches) -> ChessResult<ChessBoard> {
    let fen = arg_matches
        .get_one::<String>("fen")
        .map(String::as_str)
        .unwrap_or(INITIAL_POSITION);
    ChessBoard::from_fen(fen)
}

fn perft(arg_matches: &ArgMatches) -> ChessResult<()> {
    let mut chess_board = board_from_args(arg_matches)?;
    let depth = arg_matches.get_one::<u8>("depth").copied().unwrap_or(3);
    let moves = arg_matches
        .get_many::<String>("moves")
        .unwrap_or_default()
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>();
    println!("Perft test for {} moves {:?} with depth {}", chess_board.to_fen(), moves, depth);

    for m in moves {
        let mut mv = chess_board.parse_legal_move(m)?;
        chess_board.make(&mut mv)?;
    }

    let mut result_moves: Vec<(String, u64)> = chess_board
        .perft_divide(depth)?
        .into_iter()
        .map(|(mv, count)| (mv.as_algebraic(), count))
        .collect();
    result_moves.sort();

    let mut num_nodes = 0;
    for (m, c) in result_moves {
        println!("{}: {}", m, c);
        num_nodes += c;
    }
    println!("\nNodes searched: {}", num_nodes);
    Ok(())
}

#[derive(Tabled)]
struct BenchmarkRow {
    ply: u32,
    score: i32,
    node_count: u64,
    elapsed_time: f32,
    knodes_per_sec: f32,
    best_move: String,
}

fn benchmark(arg_matches: &ArgMatches) -> ChessResult<()> {
    let chess_board = board_from_args(arg_matches)?;
    let max_depth = arg_matches.get_one::<u32>("max-depth").copied().unwrap_or(4);
    let mut table_rows = Vec::new();

    for depth in 1..=max_depth {
        let mut board = chess_board.copy();
        let mut engine = AlphaBetaEngine::new();
        let start_time = Instant::now();
        let Some(m) = engine.get_best_move(&mut board, depth, &mut |_| {})? else {
            println!("No best move found!");
            break;
        };
        let elapsed = start_time.elapsed();
        table_rows.push(BenchmarkRow {
            ply: depth,
            score: engine.best_value().unwrap_or_default(),
            node_count: engine.node_count(),
            elapsed_time: elapsed.as_secs_f32(),
            knodes_per_sec: engine.node_count() as f32 / elapsed.as_secs_f32().max(f32::EPSILON) / 1000f32,
            best_move: m.as_algebraic(),
        });
        if elapsed.as_secs() > 10 {
            break;
        }
    }
    println!("{}", Table::new(table_rows).with(Style::modern()));
    Ok(())
}

fn search_depth(arg_matches: &ArgMatches) -> ChessResult<u32> {
    if let Some(depth) = arg_matches.get_one::<u32>("depth") {
        return Ok(*depth);
    }
    match arg_matches.get_one::<String>("level") {
        Some(level) => Ok(level.parse::<Difficulty>()?.depth()),
        None => Ok(Difficulty::Medium.depth()),
    }
}

fn bestmove(arg_matches: &ArgMatches) -> ChessResult<()> {
    let board = board_from_args(arg_matches)?;
    let depth = search_depth(arg_matches)?;
    println!("{}", board.render_to_string());

    let outcome = spawn_search(board.copy(), depth).wait(tracing_sink)?;
    match (outcome.best_move, board.status()) {
        (Some(mv), _) => println!(
            "bestmove {} value {} nodes {} time {}ms",
            mv,
            outcome.value.unwrap_or_default(),
            outcome.nodes,
            outcome.elapsed.as_millis()
        ),
        (None, GameStatus::Checkmate { winner }) => println!("Checkmate, {} wins", winner),
        (None, _) => println!("Stalemate"),
    }
    Ok(())
}

fn eval(arg_matches: &ArgMatches) -> ChessResult<()> {
    let board = board_from_args(arg_matches)?;
    let score = white_relative(evaluate(&board), &board);
    println!("{}", board.render_to_string());
    println!("Evaluation (white's view): {}", score);
    println!("{}", verdict(score));
    Ok(())
}

fn selfplay(arg_matches: &ArgMatches) -> ChessResult<()> {
    let level = arg_matches
        .get_one::<String>("level")
        .map(String::as_str)
        .unwrap_or("easy")
        .parse::<Difficulty>()?;
    let random_plies = arg_matches.get_one::<u32>("random-plies").copied().unwrap_or(0);
    let seed = arg_matches.get_one::<u64>("seed").copied().unwrap_or(0);
    let max_plies = arg_matches.get_one::<u32>("max-plies").copied().unwrap_or(200);

    let mut rng = Pcg64::seed_from_u64(seed);
    let mut board = ChessBoard::standard();
    tracing::info!(%level, random_plies, seed, "starting self play");

    for ply in 0..max_plies {
        let mut mv = if ply < random_plies {
            let moves = board.generate_legal_moves();
            match moves.choose(&mut rng) {
                Some(mv) => mv.clone(),
                None => break,
            }
        } else {
            match spawn_search(board.copy(), level.depth()).wait(|line| tracing::debug!("{}", line))?.best_move {
                Some(mv) => mv,
                None => break,
            }
        };
        println!("{:>3}. {} {}", ply / 2 + 1, board.active_color, mv);
        board.make(&mut mv)?;
    }

    println!("{}", board.render_to_string());
    println!("{}", board.to_fen());
    match board.status() {
        GameStatus::Checkmate { winner } => println!("Checkmate, {} wins", winner),
        GameStatus::Stalemate => println!("Stalemate"),
        GameStatus::Ongoing => println!("Stopped after {} plies", board.ply()),
    }
    Ok(())
}
