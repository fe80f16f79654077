use log::LevelFilter;

pub mod tui;

fn main() -> std::io::Result<()> {
    // RUST_LOG=debug shows why moves are rejected, trace shows every commit.
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    tui::run()
}
