use std::time::Instant;

use gridtrace::{
    config::Config,
    generators::Generator,
    replay::{Canvas, Speed},
    session::Session,
    solvers::Algorithm,
};

/// Headless run of every generator and algorithm combination.
/// Usage: profile [iterations] [rows] [cols]
fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Config::log_level_from_env())
        .init();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1);
    let rows = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(31);
    let cols = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(63);

    let config = Config {
        speed: Speed::Fast,
        ..Config::from_env()
    };
    let mut session = Session::new(rows, cols, config).map_err(std::io::Error::other)?;

    for _ in 0..num_iters {
        for generator in Generator::ALL {
            for algorithm in Algorithm::ALL {
                let walls = session
                    .generate_walls(generator)
                    .map_err(std::io::Error::other)?;

                let solve_start = Instant::now();
                let steps = session
                    .visualize(algorithm)
                    .map_err(std::io::Error::other)?;
                let solve_time = solve_start.elapsed();

                let mut canvas = Canvas::from_grid(session.grid());
                let replay_start = Instant::now();
                let state = session.run_to_end(&mut canvas);
                let replay_time = replay_start.elapsed();

                println!(
                    "{:<24} {:<32} walls {:>5} steps {:>6} solve {:>10.3?} replay {:>10.3?} {:?}",
                    generator.name(),
                    algorithm.to_string(),
                    walls.len(),
                    steps,
                    solve_time,
                    replay_time,
                    state
                );
            }
        }
    }
    Ok(())
}
