use gridtrace::{
    app::{App, Args},
    config::Config,
};

fn main() -> std::io::Result<()> {
    // The terminal is in raw mode, so logs go to a file
    let file_appender = tracing_appender::rolling::never(".", "gridtrace.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(Config::log_level_from_env())
        .init();

    let config = Config::from_env();
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(error) => {
            eprintln!("{error}");
            eprintln!("Usage: gridtrace [algorithm] [layout] [speed]");
            eprintln!("  algorithm: dijkstra | astar | bfs | dfs | greedy | jps | gol");
            eprintln!(
                "  layout:    open | random | recursive-division | recursive-backtracking | kruskals"
            );
            eprintln!("  speed:     slow | normal | fast");
            return Ok(());
        }
    };

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = App::default().run(&mut stdout, config, args);
    App::restore_terminal(&mut stdout)?;
    if let Err(error) = &result {
        tracing::error!("Exited with error: {}", error);
    }
    result
}
